//! # multimigrator
//!
//! An interleaved multi-schema SQL migration scheduler for PostgreSQL.
//!
//! A single migrations root holds the files for several schemata, declared in a manifest
//! (`order.yml`/`order.yaml`) that fixes their application order. Each schema tracks its own
//! applied version in its own tracking table, but migrations across schemata that share an
//! effective version are interleaved deterministically rather than applied schema-by-schema, so
//! that a later schema can depend on an earlier one's migration at the same logical step. See
//! [`scheduler`] for the core algorithm and [`assembly::up`] for the entry point that wires a
//! migrations root and a database connection together and runs it.

pub mod assembly;
pub mod codegen;
mod discovery;
pub mod error;
pub mod manifest;
mod parse;
mod pathsfs;
pub mod scheduler;
pub mod source;
pub mod target;

pub use assembly::up;
pub use error::{MultimigratorError, MultimigratorResult};
pub use manifest::{LoadedManifest, ManifestLayout, OrderingManifest};
pub use scheduler::{apply_migrations, MigratorPart};

#[cfg(feature = "pool")]
mod pool_entry {
    use crate::error::MultimigratorResult;
    use std::path::Path;

    /// Pooled convenience wrapper around [`crate::up`]: checks out a connection from `pool` and
    /// runs the scheduler on it, returning the connection to the pool when done. Mirrors the
    /// `_pool`-suffixed entry points `pgorm::migrate` exposes alongside its bare-client
    /// functions.
    pub async fn up_pool(
        root_dir: impl AsRef<Path>,
        schemata: &[String],
        target_schema: &str,
        pool: &deadpool_postgres::Pool,
        refuse_dirty: bool,
    ) -> MultimigratorResult<usize> {
        let mut client = pool.get().await?;
        crate::up(root_dir, schemata, target_schema, &mut client, refuse_dirty).await
    }
}

#[cfg(feature = "pool")]
pub use pool_entry::up_pool;
