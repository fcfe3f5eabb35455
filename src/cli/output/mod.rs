//! Output formatting utilities for the CLI.

pub mod progress;
pub mod table;

use serde::Serialize;

/// Result of a command, renderable for people or as JSON
pub trait CommandOutput: Serialize {
    /// Terminal rendering
    fn to_human(&self) -> String;
    /// Machine-readable rendering for `--json`
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}
