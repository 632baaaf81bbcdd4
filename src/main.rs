//! Tiffin subscription edit gateway
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────────┐
//! │  Client  │───▶│ JWT/Role │───▶│ Handlers │───▶│ Edit service │
//! │ (Bearer) │    │  guard   │    │          │    │  (upstream)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────────┘
//! ```
//!
//! Usage: `tiffin_edit_gateway [--env <name>]` loads `config/<name>.yaml`.

use std::process::ExitCode;
use std::sync::Arc;

use tiffin_edit_gateway::config::{AppConfig, env_from_args};
use tiffin_edit_gateway::edit::RemoteEditService;
use tiffin_edit_gateway::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let env = env_from_args(std::env::args().skip(1));

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("FATAL: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_logging(&config);
    tracing::info!(env = %env, "Starting subscription edit gateway");

    let edit_service = match RemoteEditService::from_config(&config.upstream) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Invalid upstream configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(base_url = %config.upstream.base_url, "Edit service: remote");

    if let Err(e) = tiffin_edit_gateway::run_server(&config, edit_service).await {
        tracing::error!("FATAL: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
