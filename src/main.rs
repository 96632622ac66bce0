use std::io;
use std::process::ExitCode;

use linkq::console::Console;
use linkq::Config;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let config = match std::env::var("LINKQ_CONFIG") {
        Ok(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, path = %path, "unable to load config");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => Config::from_env(),
    };
    tracing::debug!(?config, "starting console");

    let stdout = io::stdout();
    let mut console = match Console::new(config, stdout.lock()) {
        Ok(console) => console,
        Err(e) => {
            tracing::error!(error = %e, "unable to create console");
            return ExitCode::FAILURE;
        }
    };

    let result = match std::env::args().nth(1) {
        Some(path) => console.run_file(path),
        None => console.run(io::stdin().lock()),
    };

    match result {
        Ok(summary) if summary.errors == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            tracing::warn!(
                commands = summary.commands,
                errors = summary.errors,
                "some commands failed"
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "console aborted");
            ExitCode::FAILURE
        }
    }
}
