use std::process::ExitCode;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use solicitud_pdf::{GenerationError, GenerationRequest, GenerationResult};

const DEFAULT_LOG_FILTER: &str = "info,mongodb=warn";

/// Renders a stored credit application into a PDF report.
///
/// The single argument is a JSON object such as
/// `{"solicitud_id": "...", "incluir_convenio": true, "incluir_firmantes": false}`.
/// The outcome is printed to stdout as JSON; logs go to stderr.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON object with `solicitud_id` and the optional generation settings.
    params: Option<String>,
}

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
            ) =>
        {
            err.exit()
        }
        Err(err) => {
            log::debug!("Rejected command line: {}", err);
            return reject(GenerationError::MissingArgument);
        }
    };

    let Some(params) = cli.params else {
        return reject(GenerationError::MissingArgument);
    };

    let request = match GenerationRequest::from_json(&params) {
        Ok(request) => request,
        Err(err) => return reject(err),
    };

    print_result(&solicitud_pdf::run(&request))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints an argument error and exits non-zero before any work is done.
fn reject(err: GenerationError) -> ExitCode {
    log::error!("[{}] {}", err.kind(), err);
    print_result(&GenerationResult::failed(err.to_string()));
    ExitCode::FAILURE
}

fn print_result(result: &GenerationResult) -> ExitCode {
    match result.to_json_pretty() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: failed to serialize result: {}", err);
            ExitCode::FAILURE
        }
    }
}
