use crate::sql::base::{
    adapter::{DatabaseKind, SqlAdapter},
    error::{ConnectorError, DbError},
    row::DbRow,
};
use async_trait::async_trait;
use model::records::row_set::RowSet;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::future::Future;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct PgAdapter {
    config: Config,
}

impl PgAdapter {
    pub fn new(url: &str) -> Result<Self, ConnectorError> {
        let config = url
            .parse::<Config>()
            .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        Ok(PgAdapter { config })
    }

    /// Opens a client, negotiating TLS as the URL's `sslmode` asks.
    /// `prefer` falls back to a plain connection when the handshake fails.
    pub async fn connect(&self) -> Result<Client, ConnectorError> {
        match self.config.get_ssl_mode() {
            SslMode::Disable => self.connect_plain().await,
            SslMode::Prefer => match self.connect_tls().await {
                Ok(client) => Ok(client),
                Err(error) => {
                    warn!(%error, "Postgres TLS handshake failed, retrying without TLS");
                    self.connect_plain().await
                }
            },
            _ => self.connect_tls().await,
        }
    }

    async fn connect_tls(&self) -> Result<Client, ConnectorError> {
        let tls = MakeTlsConnector::new(TlsConnector::builder().build()?);
        let (client, connection) = self.config.connect(tls).await?;
        Ok(drive(client, connection))
    }

    async fn connect_plain(&self) -> Result<Client, ConnectorError> {
        let (client, connection) = self.config.connect(NoTls).await?;
        Ok(drive(client, connection))
    }
}

/// Spawns the task that drives `connection`; it ends once `client` is dropped.
fn drive<C>(client: Client, connection: C) -> Client
where
    C: Future<Output = Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    client
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn query_rows(&self, sql: &str) -> Result<RowSet, DbError> {
        // The client, and with it the connection task, is dropped on return.
        let mut client = self.connect().await?;
        let tx = client.build_transaction().read_only(true).start().await?;

        let statement = tx.prepare(sql).await?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let rows = tx.query(&statement, &[]).await?;
        let mut result = RowSet::new(columns.clone());
        for row in &rows {
            result.push(DbRow::PostgresRow(row).values(&columns)?);
        }

        tx.commit().await?;
        debug!("Fetched {} rows from Postgres", result.len());
        Ok(result)
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }
}
