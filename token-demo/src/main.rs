use token_demo::{load_demo_config, Demo, Timeline};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_demo_config()?;
    let timeline = if config.real_sleep {
        Timeline::Real
    } else {
        Timeline::simulated()
    };
    tracing::info!(
        ttl_seconds = config.ttl_seconds,
        scenario = ?config.scenario,
        real_sleep = config.real_sleep,
        "starting token demo"
    );

    let demo = Demo::new(&config, timeline);
    if config.scenario.includes_expiry() {
        demo.run_expiry().await?;
    }
    if config.scenario.includes_tamper() {
        demo.run_tamper()?;
    }

    Ok(())
}
