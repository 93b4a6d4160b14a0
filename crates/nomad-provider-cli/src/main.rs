// crates/nomad-provider-cli/src/main.rs
// ============================================================================
// Module: Nomad Provider CLI Entry Point
// Description: Command dispatcher for provider configuration workflows.
// Purpose: Resolve provider blocks offline and probe the configured agent.
// Dependencies: clap, nomad-provider-config, serde_json, thiserror, tracing.
// ============================================================================

//! ## Overview
//! `nomad-provider` loads a TOML provider block, applies environment
//! defaults, and resolves it into a configured Nomad API client. `resolve`
//! prints the resolved record with secrets redacted, `regions` issues a live
//! request through the client, and `options` documents the provider block.
//!
//! Diagnostics go to stderr through a `tracing` subscriber filtered by
//! `NOMAD_PROVIDER_LOG`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use nomad_provider_config::ConfigResolver;
use nomad_provider_config::OPTION_DESCRIPTORS;
use nomad_provider_config::OptionDescriptor;
use nomad_provider_config::ProviderConfig;
use nomad_provider_config::ProviderOptions;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "NOMAD_PROVIDER_LOG";

/// Filter used when `NOMAD_PROVIDER_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "nomad-provider", version, about = "Resolve Nomad provider configuration")]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a provider block and print the configuration with secrets redacted.
    Resolve(ConfigArgs),
    /// Resolve a provider block and list the regions known to the cluster.
    Regions(ConfigArgs),
    /// Describe every option accepted in a provider block.
    Options(OptionsArgs),
}

/// Arguments for commands that read a provider block.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Path to the TOML provider block.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
}

/// Arguments for the `options` command.
#[derive(Args, Debug)]
struct OptionsArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Output format for descriptive commands.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Plain text, one option per block.
    Text,
    /// JSON array.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying the message shown to the user.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve(args) => command_resolve(&args),
        Commands::Regions(args) => command_regions(&args),
        Commands::Options(args) => command_options(&args),
    }
}

/// Installs the stderr log subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `resolve`.
fn command_resolve(args: &ConfigArgs) -> CliResult<ExitCode> {
    let resolved = resolve_provider(&args.config, &ConfigResolver::from_process_env())?;
    write_json(&resolved.config().redacted_json())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `regions`.
fn command_regions(args: &ConfigArgs) -> CliResult<ExitCode> {
    let resolved = resolve_provider(&args.config, &ConfigResolver::from_process_env())?;
    let regions = resolved
        .client()
        .regions()
        .map_err(|err| CliError::new(format!("failed to list regions: {err}")))?;
    for region in regions {
        write_stdout_line(&region).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `options`.
fn command_options(args: &OptionsArgs) -> CliResult<ExitCode> {
    match args.format {
        OutputFormat::Text => write_stdout_line(&render_options_text(OPTION_DESCRIPTORS))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
        OutputFormat::Json => write_json(&options_json(OPTION_DESCRIPTORS))?,
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Loads a provider block and resolves it with `resolver`.
fn resolve_provider(path: &Path, resolver: &ConfigResolver<'_>) -> CliResult<ProviderConfig> {
    debug!(path = %path.display(), "loading provider options");
    let options = ProviderOptions::load(path, resolver.env()).map_err(|err| {
        CliError::new(format!("invalid provider options in {}: {err}", path.display()))
    })?;
    resolver
        .resolve(&options)
        .map_err(|err| CliError::new(err.to_string()))
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders option descriptors as plain text.
fn render_options_text(descriptors: &[OptionDescriptor]) -> String {
    let mut blocks = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let mut block = format!("{} ({})", descriptor.name, descriptor.kind.as_str());
        if descriptor.required {
            block.push_str(" required");
        }
        if descriptor.sensitive {
            block.push_str(" sensitive");
        }
        block.push_str("\n  ");
        block.push_str(descriptor.description);
        if let Some(env) = descriptor.env_default {
            block.push_str("\n  default from: ");
            block.push_str(env);
        }
        if !descriptor.conflicts_with.is_empty() {
            block.push_str("\n  conflicts with: ");
            block.push_str(&descriptor.conflicts_with.join(", "));
        }
        blocks.push(block);
    }
    blocks.join("\n\n")
}

/// Renders option descriptors as a JSON array.
fn options_json(descriptors: &[OptionDescriptor]) -> Value {
    Value::Array(
        descriptors
            .iter()
            .map(|descriptor| {
                json!({
                    "name": descriptor.name,
                    "kind": descriptor.kind.as_str(),
                    "required": descriptor.required,
                    "env_default": descriptor.env_default,
                    "conflicts_with": descriptor.conflicts_with,
                    "sensitive": descriptor.sensitive,
                    "description": descriptor.description,
                })
            })
            .collect(),
    )
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a JSON value to stdout in pretty form.
fn write_json(value: &Value) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render json: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
