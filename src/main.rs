use bitdotio::{BitDotIo, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db_name = config
        .database
        .clone()
        .ok_or_else(|| anyhow::anyhow!("BITDOTIO_DATABASE is not set"))?;

    let client = BitDotIo::from_config(&config);
    let pool = client
        .create_pool_with_max_connections(&db_name, config.max_connections)
        .await?;

    let greeting: (String,) = sqlx::query_as("select 'Hello, world!'")
        .fetch_one(&pool)
        .await?;
    tracing::info!(database = %db_name, "Query succeeded");
    println!("{}", greeting.0);

    client.close_pool(&db_name).await?;
    Ok(())
}
