//! Binary error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use wanwatch_config::ConfigError;
use wanwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Invalid configuration")]
    #[diagnostic(
        code(wanwatch::config),
        help(
            "Check the config file and the UNTFY_* environment variables.\n\
             Run: wanwatch --print-config"
        )
    )]
    Config(#[from] ConfigError),

    #[error("Could not authenticate at the UniFi controller")]
    #[diagnostic(
        code(wanwatch::auth_failed),
        help(
            "Verify UNTFY_CONTROLLER_URL, UNTFY_CONTROLLER_USER and UNTFY_CONTROLLER_PW.\n\
             UniFi OS consoles need UNTFY_CONTROLLER_TYPE=\"UDM Pro\"."
        )
    )]
    Auth(#[from] CoreError),

    #[error("Could not set up the ntfy client")]
    #[diagnostic(code(wanwatch::ntfy_setup))]
    NtfySetup(#[from] wanwatch_api::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Auth(_) => exit_code::AUTH,
            Self::NtfySetup(_) => exit_code::GENERAL,
        }
    }
}
