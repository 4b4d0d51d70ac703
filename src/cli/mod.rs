//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use output::{CommandOutput, ProgressBarExt, TerminalProgress};
pub use types::Cli;

/// Report an error on stderr (or stdout as JSON) and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": chain,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
