use crate::error::CliError;
use connectors::{adapter::Adapter, spec::ConnectionSpec};
use tracing::{error, info};

/// Resolves `conn`, opens the database it names and runs a trivial query.
pub async fn test_connection(conn: &str) -> Result<ConnectionSpec, CliError> {
    let spec = ConnectionSpec::resolve(conn.trim())?;
    info!("Pinging {spec}");

    let adapter = Adapter::from_spec(&spec)?;
    let sql = adapter.get_sql();
    sql.ping().await.map_err(|err| {
        error!("Ping of {spec} failed: {err}");
        CliError::Database(err)
    })?;

    info!("{:?} database at {spec} is reachable", sql.kind());
    Ok(spec)
}
