//! oemhook CLI
//!
//! Builds OEM hook requests, renders responses, and runs operations end to
//! end against the simulated modem.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use oemhook::catalog::{self, Layout, OperationKind, OperationSpec, Revision};
use oemhook::protocol::{self, Payload, ParamValue, Response};
use oemhook::transport::{self, SimulatedModem};
use oemhook::{Config, HookError, Operation, Result, Session};

/// oemhook CLI
#[derive(Parser, Debug)]
#[command(name = "oemhook-cli")]
#[command(about = "Build, send and render modem OEM hook commands")]
#[command(version)]
struct Args {
    /// Command set revision (legacy, aligned, strings)
    #[arg(short, long, value_parser = parse_revision)]
    revision: Option<Revision>,

    /// Reply timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List known operations
    Catalog,

    /// Encode an operation and print the request payload
    Encode {
        /// Operation name, e.g. set-fast-dormancy-timer
        operation: String,

        /// Parameter values in declared order
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Render a response the way the dialog shows it
    Format {
        /// Failure description reported with the response
        #[arg(long)]
        failure: Option<String>,

        /// Byte result, one hex byte per value
        #[arg(long, num_args = 1.., conflicts_with = "strings")]
        bytes: Option<Vec<String>>,

        /// String result
        #[arg(long, num_args = 1..)]
        strings: Option<Vec<String>>,
    },

    /// Send an operation to the simulated modem and print the report
    Run {
        /// Operation name, e.g. get-atr
        operation: String,

        /// Parameter values in declared order
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    let mut builder = Config::builder().reply_timeout_ms(args.timeout_ms);
    if let Some(revision) = args.revision {
        builder = builder.revision(revision);
    }
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Reports go to stdout, logs to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = catalog::validate_builtin() {
        tracing::error!("Built-in catalog is invalid: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = execute(&config, args.revision.is_some(), args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn execute(config: &Config, revision_pinned: bool, command: Commands) -> Result<()> {
    match command {
        Commands::Catalog => {
            for spec in catalog::entries() {
                if revision_pinned && spec.operation.revision != config.revision {
                    continue;
                }
                println!("{}", describe(spec));
            }
        }
        Commands::Encode { operation, params } => {
            let spec = resolve(config, revision_pinned, &operation)?;
            let values = parse_params(spec, &params)?;
            let command = protocol::encode_spec(spec, &values)?;
            println!("{}", command);
        }
        Commands::Format {
            failure,
            bytes,
            strings,
        } => {
            let result = match (bytes, strings) {
                (Some(bytes), _) => Some(Payload::Bytes(parse_bytes(&bytes)?)),
                (None, Some(strings)) => Some(Payload::Strings(strings)),
                (None, None) => None,
            };
            let response = Response { failure, result };
            print!("{}", protocol::format_response(&response));
        }
        Commands::Run { operation, params } => {
            let spec = resolve(config, revision_pinned, &operation)?;
            let values = parse_params(spec, &params)?;

            let (events_tx, events_rx) = transport::event_channel();
            let modem = SimulatedModem::spawn(config, events_tx)?;
            let mut session = Session::new(config.clone(), modem, events_rx);

            let report = session.run(spec.operation, &values)?;
            print!("{}", report.text);
        }
    }

    Ok(())
}

/// Find the catalog row for a named operation
///
/// Without an explicit revision, fall back to the first revision that has
/// the operation when the configured one does not.
fn resolve(config: &Config, revision_pinned: bool, name: &str) -> Result<&'static OperationSpec> {
    let kind = OperationKind::from_name(name)
        .ok_or_else(|| HookError::Config(format!("unknown operation '{}'", name)))?;

    let preferred = Operation::new(kind, config.revision);
    if let Some(spec) = preferred.spec() {
        return Ok(spec);
    }
    if revision_pinned {
        return Err(HookError::Config(format!("{} is not in the catalog", preferred)));
    }

    catalog::entries()
        .iter()
        .find(|spec| spec.operation.kind == kind)
        .ok_or_else(|| HookError::Config(format!("{} is not in the catalog", kind)))
}

/// Parse text by the row's declared kinds; extra values are read as ints so
/// the encoder reports the count mismatch
fn parse_params(spec: &OperationSpec, params: &[String]) -> Result<Vec<ParamValue>> {
    params
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let (name, kind) = match spec.params.get(index) {
                Some(declared) => (declared.name, declared.kind),
                None => ("extra", catalog::ParamKind::Int),
            };
            ParamValue::parse(kind, text).ok_or_else(|| {
                HookError::Config(format!(
                    "parameter {} must be {}, got '{}'",
                    name, kind, text
                ))
            })
        })
        .collect()
}

fn parse_bytes(values: &[String]) -> Result<Vec<u8>> {
    values
        .iter()
        .map(|text| parse_byte(text).ok_or_else(|| {
            HookError::Config(format!("'{}' is not a hex byte", text))
        }))
        .collect()
}

/// One byte as one or two hex digits, with an optional single `0x` prefix
fn parse_byte(text: &str) -> Option<u8> {
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if hex.is_empty() || hex.len() > 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}

fn parse_revision(text: &str) -> std::result::Result<Revision, String> {
    Revision::from_name(text).ok_or_else(|| format!("unknown revision '{}'", text))
}

fn describe(spec: &OperationSpec) -> String {
    let params: Vec<String> = spec
        .params
        .iter()
        .map(|p| format!("{}:{}", p.name, p.kind))
        .collect();
    let layout = match spec.layout {
        Layout::Binary { size } => format!("{} bytes", size),
        Layout::Tokens(tokens) => format!("{} token(s)", 1 + tokens.len()),
    };
    format!(
        "{:<24} {:<8} code=0x{:02x} {:<10} [{}]  {}",
        spec.operation.kind,
        spec.operation.revision,
        spec.code,
        layout,
        params.join(", "),
        spec.summary
    )
}
