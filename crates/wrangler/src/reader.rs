use crate::{coercion, error::WranglerError, options::QueryOptions};
use async_trait::async_trait;
use connectors::adapter::Adapter;
use model::records::frame::Frame;
use tracing::debug;

/// Runs a query and returns its result shaped by the reader options.
#[async_trait]
pub trait FrameReader {
    async fn read_frame(&self, sql: &str, options: &QueryOptions) -> Result<Frame, WranglerError>;
}

#[async_trait]
impl FrameReader for Adapter {
    async fn read_frame(&self, sql: &str, options: &QueryOptions) -> Result<Frame, WranglerError> {
        let rows = self.get_sql().query_rows(sql).await?;
        debug!("Shaping {} rows into a frame", rows.len());
        Ok(coercion::apply(rows.into_frame(), options)?)
    }
}
