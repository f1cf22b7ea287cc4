mod commands;
mod narration;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ship")]
#[command(
    about = "Ship a Spring Boot WAR and its database to AWS Elastic Beanstalk",
    long_about = None
)]
struct Cli {
    /// Show debug logs (external commands, polling)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, provision and deploy the application
    Deploy(commands::deploy::DeployArgs),
    /// Show the persisted deployment settings
    Config {
        /// Project directory
        #[arg(long, env = "SHIPFLOW_PROJECT_DIR", default_value = ".")]
        project_dir: PathBuf,
    },
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // logs go to stderr so stdout stays readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Deploy(args) => commands::deploy::handle(args).await,
        Commands::Config { project_dir } => commands::config::handle(&project_dir),
        Commands::Version => {
            println!("shipflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
