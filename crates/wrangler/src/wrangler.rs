use crate::{
    error::WranglerError,
    metadata::{self, OptionSet},
    options::{self, EffectiveOptions, FetchOptions},
    reader::FrameReader,
    timezone,
};
use connectors::{adapter::Adapter, spec::ConnectionSpec};
use model::records::frame::Frame;
use std::path::Path;
use tracing::{debug, info};

/// Fetches query results as frames, shaped by options embedded in the SQL
/// and by the caller.
///
/// A wrangler built from an empty connection string can still read SQL
/// files and extract their options, but cannot fetch.
pub struct DbWrangler<R = Adapter> {
    reader: Option<R>,
    options: OptionSet,
    last_options: Option<EffectiveOptions>,
}

impl DbWrangler<Adapter> {
    /// Resolves `connect_string` (a URL, a file holding a URL, or a SQLite
    /// database path) and prepares a connection for it.
    pub fn new(connect_string: &str) -> Result<Self, WranglerError> {
        let connect_string = connect_string.trim();
        if connect_string.is_empty() {
            debug!("No connection string; fetching is disabled");
            return Ok(Self::disconnected());
        }

        let spec = ConnectionSpec::resolve(connect_string)?;
        let adapter = Adapter::from_spec(&spec)?;
        info!("Wrangler connected to {spec}");

        Ok(DbWrangler {
            reader: Some(adapter),
            options: OptionSet::new(),
            last_options: None,
        })
    }
}

impl<R> DbWrangler<R> {
    pub fn disconnected() -> Self {
        DbWrangler {
            reader: None,
            options: OptionSet::new(),
            last_options: None,
        }
    }

    /// Uses `reader` in place of a database adapter.
    pub fn with_reader(reader: R) -> Self {
        DbWrangler {
            reader: Some(reader),
            ..Self::disconnected()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.reader.is_some()
    }

    /// Options extracted by the last [`read_sql_file`](Self::read_sql_file).
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// The merged options of the last fetch.
    pub fn last_options(&self) -> Option<&EffectiveOptions> {
        self.last_options.as_ref()
    }

    /// Returns the file's text unchanged and keeps its extracted options.
    pub async fn read_sql_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<String, WranglerError> {
        let path = path.as_ref();
        let sql = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| WranglerError::SqlFile {
                path: path.to_path_buf(),
                source,
            })?;

        self.options = metadata::extract(&sql);
        debug!(
            "Read '{}' with {} metadata options",
            path.display(),
            self.options.len()
        );
        Ok(sql)
    }
}

impl<R: FrameReader + Send + Sync> DbWrangler<R> {
    /// Runs `sql` and returns its result.
    ///
    /// Options come from the metadata block in `sql`, each replaced by the
    /// matching non-empty caller option. A timezone option converts the
    /// zone-aware columns of the result once it is read.
    pub async fn fetch(&mut self, sql: &str, overrides: FetchOptions) -> Result<Frame, WranglerError> {
        if self.reader.is_none() {
            return Err(WranglerError::NotConnected);
        }

        let effective = options::merge(sql, metadata::extract(sql), overrides)?;
        self.last_options = Some(effective.clone());

        let reader = self.reader.as_ref().ok_or(WranglerError::NotConnected)?;
        let mut frame = reader.read_frame(sql, &effective.query).await?;

        if let Some(tz) = effective.timezone {
            timezone::convert_frame(&mut frame, tz)?;
        }

        info!(
            "Fetched {} rows x {} columns",
            frame.num_rows(),
            frame.columns.len()
        );
        Ok(frame)
    }

    /// Reads a SQL file and fetches it.
    pub async fn fetch_file(
        &mut self,
        path: impl AsRef<Path>,
        overrides: FetchOptions,
    ) -> Result<Frame, WranglerError> {
        let sql = self.read_sql_file(path).await?;
        self.fetch(&sql, overrides).await
    }
}
