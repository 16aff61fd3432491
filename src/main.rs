use clap::Parser;
use rawg_gateway::application::{config::Args, startup};
use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = dotenvy::dotenv()
        && !error.not_found()
    {
        eprintln!("failed to load .env: {error}");
        std::process::exit(1);
    }

    let args = Args::parse();
    if let Err(error) = startup::run(args).await {
        error!("server failed: {error}");
        std::process::exit(1);
    }
}
