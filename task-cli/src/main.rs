use clap::Parser;
use std::path::PathBuf;
use task_cli::{Session, Settings};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Track tasks for the length of a terminal session")]
struct Cli {
    /// TOML file with session defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let settings = Settings::load(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(?settings, "starting session");
    let stdin = std::io::stdin();
    let mut session = Session::new(settings, std::io::stdout());
    session.run(stdin.lock())
}
