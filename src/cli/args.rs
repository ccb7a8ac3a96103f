//! Command-line argument parsing for the queryflow CLI.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Deployment;
use crate::models::Timeout;

/// Processor source for a single execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Registered processor id
    Id(String),
    /// JSON file holding a Processor descriptor
    File(PathBuf),
}

/// Options of a single processor execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteArgs {
    pub target: Target,
    pub input: Value,
    pub timeout: Option<Timeout>,
    pub stream: bool,
    pub deployment: Option<Deployment>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Execute one processor
    Execute(ExecuteArgs),
    /// Run a sequence loaded from a JSON file
    Sequence {
        path: PathBuf,
        input: Value,
        deployment: Option<Deployment>,
    },
}

/// Invalid command line.
#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("--input is not valid JSON: {0}")]
    InvalidInput(String),

    #[error("Specify exactly one of --processor-id, --processor or --sequence")]
    TargetRequired,

    #[error("--stream cannot be combined with --sequence")]
    StreamWithSequence,

    #[error("--timeout applies to single executions; set per-step timeouts in the sequence file")]
    TimeoutWithSequence,
}

pub const USAGE: &str = "\
Usage: queryflow [OPTIONS] (--processor-id <ID> | --processor <FILE> | --sequence <FILE>)

Options:
  --processor-id <ID>   Execute a processor registered on the service
  --processor <FILE>    Execute the processor described in a JSON file
  --sequence <FILE>     Run the sequence described in a JSON file
  --input <JSON>        Input object (default: {})
  --timeout <DURATION>  ISO-8601 execution timeout, e.g. PT30S
  --stream              Print server-sent events as they arrive
  --sandbox             Use the sandbox API instead of inference
  -V, --version         Print version
  -h, --help            Print this help

Environment:
  QF_HOST, QF_KEY, QF_DEPLOYMENT, RUST_LOG";

/// Parse command-line arguments (including the program name).
///
/// # Examples
///
/// ```
/// use queryflow::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["queryflow".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut targets = Vec::new();
    let mut sequence = None;
    let mut input = None;
    let mut timeout = None;
    let mut stream = false;
    let mut deployment = None;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--stream" => stream = true,
            "--sandbox" => deployment = Some(Deployment::Sandbox),
            "--processor-id" => targets.push(Target::Id(value_for(&arg, &mut args)?)),
            "--processor" => targets.push(Target::File(value_for(&arg, &mut args)?.into())),
            "--sequence" => sequence = Some(PathBuf::from(value_for(&arg, &mut args)?)),
            "--timeout" => timeout = Some(Timeout::from(value_for(&arg, &mut args)?)),
            "--input" => {
                let raw = value_for(&arg, &mut args)?;
                let value = serde_json::from_str(&raw)
                    .map_err(|e| ArgsError::InvalidInput(e.to_string()))?;
                input = Some(value);
            }
            _ => return Err(ArgsError::UnknownArgument(arg)),
        }
    }

    let input = input.unwrap_or_else(|| Value::Object(Default::default()));

    match (sequence, targets.len()) {
        (Some(path), 0) => {
            if stream {
                return Err(ArgsError::StreamWithSequence);
            }
            if timeout.is_some() {
                return Err(ArgsError::TimeoutWithSequence);
            }
            Ok(CliCommand::Sequence {
                path,
                input,
                deployment,
            })
        }
        (None, 1) => Ok(CliCommand::Execute(ExecuteArgs {
            target: targets.remove(0),
            input,
            timeout,
            stream,
            deployment,
        })),
        _ => Err(ArgsError::TargetRequired),
    }
}

fn value_for<I>(flag: &str, args: &mut I) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}
