use prayerwall::{make_router, run_app, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prayerwall=debug,tower_http=debug".into()),
        )
        .init();

    let router = make_router();
    if let Err(error) = run_app(router, config).await {
        tracing::error!("Error: {:#}", error);
        return Err(error);
    }
    Ok(())
}
