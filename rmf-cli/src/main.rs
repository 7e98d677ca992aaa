use clap::Parser;
use rmf_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    rmf_telemetry::init_from_env("rmf")?;

    rmf_cli::run(Cli::parse()).await
}
