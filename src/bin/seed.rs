use prayerwall::{init_db, seed::seed, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prayerwall=info".into()),
        )
        .init();

    let pool = init_db(&config.database_url).await?;
    let summary = seed(&pool).await?;
    println!(
        "Seeded {} users, {} prayers, {} comments, {} reactions",
        summary.users, summary.prayers, summary.comments, summary.reactions
    );
    Ok(())
}
