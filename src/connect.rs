use crate::DbOpts;
use anyhow::Context;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

/// A live connection and the task driving it.
pub struct PgConnection {
    pub client: Client,
    driver: JoinHandle<()>,
}

/// Connect to PostgreSQL and spawn the connection task.
pub async fn connect(opts: &DbOpts) -> anyhow::Result<PgConnection> {
    tracing::info!("Connecting to {}", opts.target());

    let (client, connection) = opts
        .to_pg_config()
        .connect(NoTls)
        .await
        .with_context(|| format!("Connection failed for {}", opts.target()))?;

    let driver = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    let conn = PgConnection { client, driver };
    let check = conn.client.simple_query("SELECT 1").await;
    if let Err(e) = check {
        conn.close().await;
        return Err(e).with_context(|| format!("Connection check failed for {}", opts.target()));
    }

    tracing::info!("Connected to {}@{}:{}", opts.dbname, opts.host, opts.port);
    Ok(conn)
}

impl PgConnection {
    /// Close the connection and wait for its task to finish.
    pub async fn close(self) {
        let PgConnection { client, driver } = self;
        drop(client);
        if let Err(e) = driver.await {
            tracing::warn!("PostgreSQL connection task ended abnormally: {}", e);
        }
    }
}
