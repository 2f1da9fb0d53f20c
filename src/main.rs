use sitelog::commands::Cli;
use sitelog::libs::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init();
    Cli::menu().await
}
