use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use portfolio_chat::{config, gateway};

#[derive(Parser)]
#[command(name = "portfolio-chat")]
#[command(about = "Personal-portfolio chat backend over a hosted LLM API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat gateway server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show runtime status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let mut config = config::load()?;
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(bind) = bind {
                config.gateway.bind = bind;
            }
            gateway::run(config).await
        }
        Commands::Status => {
            println!("portfolio-chat v{}", env!("CARGO_PKG_VERSION"));
            println!("status: idle");
            Ok(())
        }
    }
}
