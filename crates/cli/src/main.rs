//! `authbridge` command line client
//!
//! Logs in, inspects and ends sessions against an AuthBridge-compatible
//! backend, and issues arbitrary authenticated requests.

mod app;
mod commands;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match app::run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "authbridge failed");
            #[allow(clippy::print_stderr)]
            {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
