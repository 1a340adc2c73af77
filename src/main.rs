use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use jira_field_update::{
    config::{ConfigError, Inputs},
    run, Error,
};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let inputs = match Inputs::try_parse() {
        Ok(inputs) => inputs,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return report(ConfigError::from(err).into()),
    };

    match run(inputs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: Error) -> ExitCode {
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    ExitCode::from(code)
}
