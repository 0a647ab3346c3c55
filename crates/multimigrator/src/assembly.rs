//! Migrator assembly and the scheduler's entry point.
//!
//! Builds one [`SourceDriver`]/[`DbTarget`] pair per in-scope schema and drives them with
//! [`apply_migrations`].

use crate::discovery::discover_flat;
use crate::error::{MultimigratorError, MultimigratorResult};
use crate::scheduler::{apply_migrations, MigratorPart};
use crate::source::SourceDriver;
use crate::target::DbTarget;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio_postgres::Client;

/// One schema's migrator: a source driver over its files, paired with its own tracking table.
/// Every schema in a run borrows the same connection in turn; the scheduler never drives two
/// schemata concurrently, so a `RefCell` is enough to share it without an async lock.
struct PerSchemaMigrator<'c> {
    source: SourceDriver,
    target: DbTarget,
    client: Rc<RefCell<&'c mut Client>>,
    first_version: u64,
    refuse_dirty: bool,
}

impl<'c> MigratorPart for PerSchemaMigrator<'c> {
    fn first_version(&self) -> u64 {
        self.first_version
    }

    fn next_version(&self, after: u64) -> Option<u64> {
        self.source.next(after)
    }

    async fn applied_version(&mut self) -> MultimigratorResult<u64> {
        let guard = self.client.borrow();
        match self.target.version(&**guard).await? {
            None => Ok(0),
            Some((version, dirty)) => {
                if dirty && self.refuse_dirty {
                    return Err(MultimigratorError::DirtyState {
                        schema: self.source.schema_name().to_string(),
                        version,
                    });
                }
                Ok(version as u64)
            }
        }
    }

    async fn step(&mut self, version: u64) -> MultimigratorResult<()> {
        let (sql, _identifier) = self.source.read_up(version)?;
        let mut guard = self.client.borrow_mut();
        self.target.apply_step(&mut **guard, version, &sql).await
    }
}

/// Top-level entry point: scans `root_dir` for migrations belonging to `schemata[0..=target]`
/// (in manifest order) and applies every migration at or below the target schema.
///
/// When `refuse_dirty` is set, a schema whose tracking table is marked dirty aborts the whole run
/// with [`MultimigratorError::DirtyState`] instead of treating its last recorded version as
/// applied.
///
/// Returns the number of migration steps applied.
pub async fn up(
    root_dir: impl AsRef<Path>,
    schemata: &[String],
    target_schema: &str,
    client: &mut Client,
    refuse_dirty: bool,
) -> MultimigratorResult<usize> {
    let root_dir = root_dir.as_ref();
    let root_dir: PathBuf = if root_dir.is_absolute() {
        root_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(root_dir)
    };

    let target_index = schemata
        .iter()
        .position(|s| s.eq_ignore_ascii_case(target_schema))
        .ok_or_else(|| MultimigratorError::SchemaNotFound(target_schema.to_string()))?;

    let in_scope = &schemata[..=target_index];
    let grouped = discover_flat(&root_dir, in_scope)?;
    let client = Rc::new(RefCell::new(client));

    let mut parts = Vec::with_capacity(in_scope.len());
    for (i, schema_name) in in_scope.iter().enumerate() {
        let schema_index = (i + 1) as u32;
        let files = grouped.get(schema_name).cloned().unwrap_or_default();

        let source = SourceDriver::open(schema_name, schema_index, &root_dir, files)?;
        let first_version = source
            .first()
            .ok_or_else(|| MultimigratorError::NoFirstVersion(schema_name.clone()))?;

        let target = DbTarget::new(schema_name)?;
        {
            let guard = client.borrow();
            target.ensure_table(&**guard).await?;
        }

        parts.push(PerSchemaMigrator {
            source,
            target,
            client: client.clone(),
            first_version,
            refuse_dirty,
        });
    }

    apply_migrations(&mut parts).await
}
