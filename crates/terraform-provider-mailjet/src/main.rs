// # terraform-provider-mailjet - Provider plugin host
//
// Thin integration layer: all sender logic lives in mailjet-core.
//
// The host is responsible for:
// 1. Reading one JSON request from stdin
// 2. Resolving the provider configuration (once per request)
// 3. Dispatching the operation to the registered resource or data source
// 4. Writing one JSON response (state + diagnostics) to stdout
//
// ## Configuration
//
// - `MJ_APIKEY_PUBLIC`: Public API key, when the provider block omits it
// - `MJ_APIKEY_PRIVATE`: Private API key, when the provider block omits it
// - `MAILJET_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// Logs go to stderr; stdout only carries the response.
//
// ## Protocol
//
// This binary does NOT implement the Terraform plugin protocol (gRPC over a
// handshake). It speaks a one-shot JSON protocol instead: one request per
// process, tagged by `operation` (`schema`, `validate`, `plan`, `create`,
// `read`, `update`, `delete`, `import`, `read_data_source`). Terraform cannot
// load it as a provider; it is meant for scripting and for embedding the
// provider logic behind another plugin host.
//
// ## Example
//
// ```bash
// export MJ_APIKEY_PUBLIC=...
// export MJ_APIKEY_PRIVATE=...
//
// echo '{"operation":"read","type":"mailjet_sender","state":{"id":42}}' \
//     | terraform-provider-mailjet
// ```

mod dispatch;
mod protocol;

use anyhow::{Context, Result};
use dispatch::Dispatcher;
use mailjet_client::MailjetClientFactory;
use protocol::{Request, Response};
use std::env;
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Environment variable selecting the log level
const ENV_LOG_LEVEL: &str = "MAILJET_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// - 0: A response was written (it may carry error diagnostics)
/// - 1: Configuration or request error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HostExitCode {
    /// Response written
    Success = 0,
    /// Configuration or malformed request
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<HostExitCode> for ExitCode {
    fn from(code: HostExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Parse the log level setting
fn log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            ENV_LOG_LEVEL,
            raw
        ),
    }
}

/// Read and decode the request from stdin
fn read_request() -> Result<Request> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read the request from stdin")?;
    serde_json::from_str(&input).context("Malformed request")
}

/// Encode the response to stdout
fn write_response(response: &Response) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, response).context("Failed to encode the response")?;
    writeln!(stdout).context("Failed to write the response")?;
    stdout.flush().context("Failed to flush stdout")
}

fn main() -> ExitCode {
    let level = match log_level(&env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string())) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return HostExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostExitCode::ConfigError.into();
    }

    let request = match read_request() {
        Ok(request) => request,
        Err(e) => {
            error!("{:#}", e);
            return HostExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostExitCode::RuntimeError.into();
        }
    };

    let (response, code) = rt.block_on(async {
        let Request {
            provider,
            operation,
        } = request;

        match Dispatcher::configure(provider, &operation, &MailjetClientFactory) {
            Ok(dispatcher) => (dispatcher.handle(operation).await, HostExitCode::Success),
            Err(diagnostic) => {
                error!("{}", diagnostic);
                (Response::failure(diagnostic), HostExitCode::ConfigError)
            }
        }
    });

    if response.has_error() {
        info!("Operation finished with {} diagnostic(s)", response.diagnostics.len());
    }

    if let Err(e) = write_response(&response) {
        error!("{:#}", e);
        return HostExitCode::RuntimeError.into();
    }

    code.into()
}
