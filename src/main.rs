use anyhow::Result;
use lancamento_mensal::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // configuration first: it decides the log level
    let config = Config::from_env()?;

    logger::init(config.verbose_logging);

    App::initialize(config).await?.run().await?;

    Ok(())
}
