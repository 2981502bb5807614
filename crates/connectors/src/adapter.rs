use crate::{
    error::AdapterError,
    spec::ConnectionSpec,
    sql::{
        base::adapter::SqlAdapter, mysql::adapter::MySqlAdapter, postgres::adapter::PgAdapter,
        sqlite::adapter::SqliteAdapter,
    },
};

#[derive(Debug, Clone)]
pub enum Adapter {
    Sqlite(SqliteAdapter),
    MySql(MySqlAdapter),
    Postgres(PgAdapter),
}

impl Adapter {
    pub fn from_spec(spec: &ConnectionSpec) -> Result<Self, AdapterError> {
        let adapter = match spec {
            ConnectionSpec::Sqlite(path) => Adapter::Sqlite(SqliteAdapter::new(path)),
            ConnectionSpec::Postgres(_) => Adapter::Postgres(PgAdapter::new(&spec.driver_url())?),
            ConnectionSpec::MySql(_) => Adapter::MySql(MySqlAdapter::new(&spec.driver_url())?),
        };
        Ok(adapter)
    }

    pub fn get_sql(&self) -> &(dyn SqlAdapter + Send + Sync) {
        match self {
            Adapter::Sqlite(adapter) => adapter,
            Adapter::MySql(adapter) => adapter,
            Adapter::Postgres(adapter) => adapter,
        }
    }
}
