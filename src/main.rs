//! Bubbaverse launcher entry point
//!
//! Parses the command line, runs the launcher and turns any failure into a
//! readable message. Errors stay on screen for the configured pause, since
//! the launcher is usually started by a browser into a console window that
//! closes on exit.

use bubbaverse_launcher::cli;
use bubbaverse_launcher::core::error::user_friendly_error;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();
    let config = cli.build_config();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    config.init_logging();

    match cli.execute_with_config(&config).await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            user_friendly_error(e).display();
            if let Some(pause) = config.error_pause {
                tokio::time::sleep(pause).await;
            }
            std::process::exit(1);
        }
    }
}
