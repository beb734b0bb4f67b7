pub mod commands;
pub mod daily;
pub mod habits;
pub mod okr;
pub mod score;
pub mod status;
pub mod tasks;

pub use commands::*;

use crate::error::OkrError;
use crate::output;

/// Print `result`'s error (if any) in the requested format and map to an exit code.
pub fn finish(result: Result<i32, OkrError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
