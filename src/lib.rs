use miette::Diagnostic;
use thiserror::Error;

use crate::{
    config::{ConfigError, Inputs},
    state::RunType,
};

pub mod config;
pub mod jira;
pub mod state;

/// Exit code when the inputs are invalid. Nothing was sent.
pub const INVALID_CONFIG: u8 = 1;
/// Exit code when any issue could not be updated.
pub const REQUEST_FAILED: u8 = 2;

/// Validate `inputs` and then update every issue they name.
///
/// ## Errors
/// The first problem encountered, see [`Error::exit_code`] for how to report it.
pub async fn run(inputs: Inputs) -> Result<(), Error> {
    inputs.dump();
    let config = inputs.validate()?;
    let client = jira::client()?;
    jira::update_issues(&client, RunType::new(inputs.dry_run, &config)).await?;
    Ok(())
}

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Request(#[from] jira::Error),
}

impl Error {
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => INVALID_CONFIG,
            Error::Request(_) => REQUEST_FAILED,
        }
    }
}
