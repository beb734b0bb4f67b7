pub mod event;
pub mod fields;
pub mod objective;
pub mod task;

pub use event::parse_event;
pub use objective::{okr_tag, parse_objectives};
pub use task::{extract_tasks, parse_task};
