use queryflow::cli::{self, CliCommand};
use queryflow::client::QueryFlowClient;
use queryflow::config::{ClientConfig, Deployment};
use queryflow::error::SequenceError;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match cli::parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };

    // Version and help need no configuration
    match command {
        CliCommand::Version => {
            println!("queryflow {}", cli::VERSION);
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        _ => {}
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(deployment) = deployment_override(&command) {
        config = config.with_deployment(deployment);
    }
    tracing::debug!(?config, "Client configured");

    let client = QueryFlowClient::new(config);
    let mut stdout = std::io::stdout();
    match cli::run_command(&client, command, &mut stdout).await {
        Ok(()) => Ok(()),
        Err(report) => match report.downcast_ref::<SequenceError>() {
            Some(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
            None => Err(report),
        },
    }
}

fn deployment_override(command: &CliCommand) -> Option<Deployment> {
    match command {
        CliCommand::Execute(args) => args.deployment,
        CliCommand::Sequence { deployment, .. } => *deployment,
        CliCommand::Version | CliCommand::Help => None,
    }
}
