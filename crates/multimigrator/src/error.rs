//! Error types for multimigrator.

use thiserror::Error;

/// Result type alias for multimigrator operations.
pub type MultimigratorResult<T> = Result<T, MultimigratorError>;

/// Error types for the scheduler, discovery, filtered-FS, and manifest layers.
#[derive(Debug, Error)]
pub enum MultimigratorError {
    /// Migrations root is not a directory.
    #[error("migrations root is not a directory: {0}")]
    NotADirectory(String),

    /// No `order.yml`/`order.yaml` found at the migrations root.
    #[error("no order.yml or order.yaml found under {0}")]
    MissingManifest(String),

    /// `order.yml`/`order.yaml` failed to parse, or `schema_ordering` was empty.
    #[error("invalid ordering manifest: {0}")]
    InvalidManifest(String),

    /// Legacy directory layout: a manifest entry has no matching subdirectory.
    #[error("schema '{0}' has no corresponding migrations subdirectory")]
    MissingSchemaDirectory(String),

    /// The `--level` argument does not name a schema in the manifest.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// A migration filename's embedded schema index disagrees with the manifest position
    /// of the schema its name matched.
    #[error("file '{file}' has schema index {found}, but schema '{schema}' is at manifest position {expected}")]
    WrongSchemaIndex {
        file: String,
        schema: String,
        expected: u32,
        found: u32,
    },

    /// Two migration files in one schema produced the same `(effective_version, direction)`.
    #[error("duplicate migration for schema '{schema}' at effective version {version} ({direction})")]
    DuplicateMigration {
        schema: String,
        version: u64,
        direction: &'static str,
    },

    /// A filtered filesystem view was constructed with an empty root.
    #[error("invalid root directory: root must not be empty")]
    InvalidRoot,

    /// A path passed to the filtered filesystem view was not a declared name.
    #[error("path not found: {0}")]
    NotExist(String),

    /// A path passed to the filtered filesystem view was not a valid relative path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A schema's source driver reports no migrations at all.
    #[error("schema '{0}' has no migrations")]
    NoFirstVersion(String),

    /// A schema's first `Version()` probe found a dirty row and the caller asked to refuse it.
    #[error("schema '{schema}' is marked dirty at version {version}; refusing to proceed")]
    DirtyState { schema: String, version: i64 },

    /// I/O error reading migration files or the manifest.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Database error from the underlying Postgres driver.
    #[error(transparent)]
    Db(#[from] tokio_postgres::Error),

    /// Pool checkout error.
    #[cfg(feature = "pool")]
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Any other error, not otherwise classified.
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for MultimigratorError {
    fn from(e: deadpool_postgres::PoolError) -> Self {
        MultimigratorError::Pool(e.to_string())
    }
}
