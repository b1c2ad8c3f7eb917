use clap::Parser;
use rosterbot::config::{Cli, Config};
use rosterbot::{init, logging, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = Config::new(&cli)?;
    logging::init(config.log_level)?;

    let clients = init(&config).await?;
    run(clients).await?;

    Ok(())
}
