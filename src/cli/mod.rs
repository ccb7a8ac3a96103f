//! CLI module for the `queryflow` binary.
//!
//! Parses arguments and drives a [`QueryFlowClient`] for one command:
//!
//! ```ignore
//! use queryflow::cli::{parse_args, run_command, CliCommand};
//!
//! let command = parse_args(std::env::args())?;
//! run_command(&client, command, &mut std::io::stdout()).await?;
//! ```
//!
//! Output goes to the supplied writer so the commands can be exercised
//! without a terminal.

pub mod args;

pub use args::{parse_args, ArgsError, CliCommand, ExecuteArgs, Target, USAGE};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use futures_util::StreamExt;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

use crate::client::QueryFlowClient;
use crate::models::{Processor, ProcessorRef, Sequence};
use crate::traits::HttpClient;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a parsed command against `client`, writing results to `out`.
///
/// A failed sequence is returned as a report wrapping
/// [`SequenceError`](crate::error::SequenceError), so the caller can
/// downcast it and print the failing response body.
pub async fn run_command<C, W>(
    client: &QueryFlowClient<C>,
    command: CliCommand,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient,
    W: Write,
{
    match command {
        CliCommand::Version => writeln!(out, "queryflow {}", VERSION)?,
        CliCommand::Help => writeln!(out, "{}", USAGE)?,
        CliCommand::Execute(args) => run_execute(client, args, out).await?,
        CliCommand::Sequence { path, input, .. } => {
            run_sequence(client, &path, input, out).await?
        }
    }
    Ok(())
}

async fn run_execute<C, W>(
    client: &QueryFlowClient<C>,
    args: ExecuteArgs,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient,
    W: Write,
{
    let processor = match args.target {
        Target::Id(id) => ProcessorRef::Id(id),
        Target::File(path) => ProcessorRef::Entity(
            Processor::from_path(&path)
                .wrap_err_with(|| format!("Cannot load processor from {}", path.display()))?,
        ),
    };

    if args.stream {
        let mut stream = client
            .execute_stream(processor, &args.input, args.timeout.as_ref())
            .await?;
        while let Some(item) = stream.next().await {
            writeln!(out, "{}", item?)?;
            out.flush()?;
        }
    } else {
        let result = client
            .execute(processor, &args.input, args.timeout.as_ref())
            .await?;
        write_json(out, &result)?;
    }
    Ok(())
}

async fn run_sequence<C, W>(
    client: &QueryFlowClient<C>,
    path: &Path,
    input: Value,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient,
    W: Write,
{
    let sequence = Sequence::from_path(path)
        .wrap_err_with(|| format!("Cannot load sequence from {}", path.display()))?;
    let result = client.execute_sequence(&sequence, input).await?;
    write_json(out, &result)
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::config::ClientConfig;
    use crate::error::SequenceError;
    use crate::traits::Response;
    use bytes::Bytes;
    use serde_json::json;

    fn client() -> QueryFlowClient<MockHttpClient> {
        QueryFlowClient::with_http_client(
            ClientConfig::new("http://qf.test", "key"),
            MockHttpClient::new(),
        )
    }

    fn execute_args(target: Target, stream: bool) -> CliCommand {
        CliCommand::Execute(ExecuteArgs {
            target,
            input: json!({"q": "hi"}),
            timeout: None,
            stream,
            deployment: None,
        })
    }

    #[tokio::test]
    async fn test_version_output() {
        let mut out = Vec::new();
        run_command(&client(), CliCommand::Version, &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("queryflow {}\n", VERSION)
        );
    }

    #[tokio::test]
    async fn test_execute_prints_pretty_json() {
        let client = client();
        client.http_client().set_response(
            "http://qf.test/v2/inference/abc",
            MockResponse::Success(Response::json_body(&json!({"answer": 42}))),
        );

        let mut out = Vec::new();
        run_command(&client, execute_args(Target::Id("abc".into()), false), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"answer\": 42\n}\n");
    }

    #[tokio::test]
    async fn test_execute_stream_prints_each_chunk() {
        let client = client();
        client.http_client().set_response(
            "http://qf.test/v2/inference/abc",
            MockResponse::Stream(vec![Bytes::from("data: Hel"), Bytes::from("data: lo")]),
        );

        let mut out = Vec::new();
        run_command(&client, execute_args(Target::Id("abc".into()), true), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hel\nlo\n");
        assert_eq!(client.http_client().open_streams(), 0);
    }

    #[tokio::test]
    async fn test_execute_processor_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "template", "config": {{"text": "hi"}}}}"#).unwrap();

        let client = client();
        client.http_client().set_response(
            "http://qf.test/v2/inference/",
            MockResponse::Success(Response::json_body(&json!("ok"))),
        );

        let mut out = Vec::new();
        run_command(
            &client,
            execute_args(Target::File(file.path().to_path_buf()), false),
            &mut out,
        )
        .await
        .unwrap();

        let requests = client.http_client().get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].request.body.to_json().unwrap()["processor"]["type"],
            json!("template")
        );
    }

    #[tokio::test]
    async fn test_missing_processor_file_is_reported() {
        let mut out = Vec::new();
        let err = run_command(
            &client(),
            execute_args(Target::File("/nonexistent/processor.json".into()), false),
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Cannot load processor"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_sequence_failure_downcasts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"steps": [{{"processor": "bad"}}]}}"#).unwrap();

        let client = client();
        client.http_client().set_response(
            "http://qf.test/v2/inference/bad",
            MockResponse::Success(Response::new(422, "unprocessable input")),
        );

        let mut out = Vec::new();
        let report = run_command(
            &client,
            CliCommand::Sequence {
                path: file.path().to_path_buf(),
                input: json!({}),
                deployment: None,
            },
            &mut out,
        )
        .await
        .unwrap_err();

        let err = report.downcast_ref::<SequenceError>().unwrap();
        assert_eq!(err.body(), Some("unprocessable input"));
        assert!(out.is_empty());
    }
}
