use crate::sql::base::{
    adapter::{DatabaseKind, SqlAdapter},
    error::{ConnectorError, DbError},
    row::DbRow,
};
use async_trait::async_trait;
use model::records::row_set::RowSet;
use mysql_async::{Conn, Opts, Row as MySqlRow, TxOpts, prelude::*};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct MySqlAdapter {
    opts: Opts,
}

impl MySqlAdapter {
    pub fn new(url: &str) -> Result<Self, ConnectorError> {
        let opts = Opts::from_url(url).map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        Ok(MySqlAdapter { opts })
    }
}

#[async_trait]
impl SqlAdapter for MySqlAdapter {
    async fn query_rows(&self, sql: &str) -> Result<RowSet, DbError> {
        let mut conn = Conn::new(self.opts.clone()).await?;
        let result = read_in_transaction(&mut conn, sql).await;

        if let Err(err) = conn.disconnect().await {
            warn!(%err, "MySQL disconnect failed");
        }
        result
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::MySql
    }
}

async fn read_in_transaction(conn: &mut Conn, sql: &str) -> Result<RowSet, DbError> {
    let mut tx_opts = TxOpts::default();
    tx_opts.with_readonly(Some(true));
    let mut tx = conn.start_transaction(tx_opts).await?;

    let result = {
        let mut query = tx.query_iter(sql).await?;
        let columns: Vec<String> = query
            .columns_ref()
            .iter()
            .map(|col| col.name_str().into_owned())
            .collect();
        let rows: Vec<MySqlRow> = query.collect().await?;

        let mut result = RowSet::new(columns.clone());
        for row in &rows {
            result.push(DbRow::MySqlRow(row).values(&columns)?);
        }
        result
    };

    tx.commit().await?;
    debug!("Fetched {} rows from MySQL", result.len());
    Ok(result)
}
