pub mod document;
pub mod okr;
pub mod score;
pub mod task;

pub use document::*;
pub use okr::*;
pub use score::*;
pub use task::*;
