//! Source driver: a per-schema view over migration files, keyed by effective version.
//!
//! Combines a [`PathsFs`] (the files this schema is allowed to see) with the filename parser to
//! answer `First`/`Next`/`Prev`/`ReadUp`/`ReadDown` for one schema's migrations.

use crate::error::MultimigratorError;
use crate::parse::{self, Direction, Migration};
use crate::pathsfs::PathsFs;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Clone)]
struct VersionEntry {
    up: Option<Migration>,
    down: Option<Migration>,
}

/// A per-schema source driver over a filtered filesystem view.
#[derive(Debug)]
pub struct SourceDriver {
    schema_name: String,
    fs: PathsFs,
    by_version: BTreeMap<u64, VersionEntry>,
}

impl SourceDriver {
    /// Builds a source driver for `schema_name` (at 1-based `schema_index`) over the file names
    /// `discovery::discover_flat` assigned to it.
    pub fn open(
        schema_name: &str,
        schema_index: u32,
        root: impl AsRef<Path>,
        file_names: Vec<String>,
    ) -> Result<Self, MultimigratorError> {
        let fs = PathsFs::new(root, file_names.clone())?;

        let mut by_version: BTreeMap<u64, VersionEntry> = BTreeMap::new();
        for file_name in &file_names {
            let Some(m) = parse::parse_for_schema(file_name, schema_name, schema_index)? else {
                continue;
            };
            let entry = by_version.entry(m.effective_version).or_default();
            let slot = match m.direction {
                Direction::Up => &mut entry.up,
                Direction::Down => &mut entry.down,
            };
            if slot.is_some() {
                return Err(MultimigratorError::DuplicateMigration {
                    schema: schema_name.to_string(),
                    version: m.effective_version,
                    direction: m.direction.as_str(),
                });
            }
            *slot = Some(m);
        }

        Ok(SourceDriver {
            schema_name: schema_name.to_string(),
            fs,
            by_version,
        })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Smallest known effective version, or `None` if this schema has no migrations.
    pub fn first(&self) -> Option<u64> {
        self.by_version.keys().next().copied()
    }

    /// Smallest known effective version strictly greater than `version`, or `None`.
    pub fn next(&self, version: u64) -> Option<u64> {
        self.by_version
            .range((std::ops::Bound::Excluded(version), std::ops::Bound::Unbounded))
            .next()
            .map(|(v, _)| *v)
    }

    /// Largest known effective version strictly less than `version`, or `None`.
    pub fn prev(&self, version: u64) -> Option<u64> {
        self.by_version
            .range((std::ops::Bound::Unbounded, std::ops::Bound::Excluded(version)))
            .next_back()
            .map(|(v, _)| *v)
    }

    /// Reads the up-migration body and identifier for `version`.
    pub fn read_up(&self, version: u64) -> Result<(String, String), MultimigratorError> {
        let entry = self.by_version.get(&version).and_then(|e| e.up.as_ref());
        let Some(m) = entry else {
            return Err(MultimigratorError::NotExist(format!(
                "no up migration at version {version} in schema '{}'",
                self.schema_name
            )));
        };
        let sql = self.fs.read_to_string(&m.raw)?;
        Ok((sql, m.identifier.clone()))
    }

    /// Reads the down-migration body and identifier for `version`, if one exists.
    pub fn read_down(&self, version: u64) -> Result<Option<(String, String)>, MultimigratorError> {
        let Some(m) = self.by_version.get(&version).and_then(|e| e.down.as_ref()) else {
            return Ok(None);
        };
        let sql = self.fs.read_to_string(&m.raw)?;
        Ok(Some((sql, m.identifier.clone())))
    }

    /// All known effective versions, ascending.
    pub fn versions(&self) -> Vec<u64> {
        self.by_version.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("multimigrator-source-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn first_next_prev_walk_the_version_list() {
        let dir = make_temp_dir("walk");
        let files = vec![
            "0001_01_customer_Create.up.sql",
            "0002_01_customer_AddCol.up.sql",
            "0003_01_customer_AddIdx.up.sql",
        ];
        for f in &files {
            fs::write(dir.join(f), "-- noop").unwrap();
        }

        let driver = SourceDriver::open(
            "customer",
            1,
            &dir,
            files.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();

        assert_eq!(driver.first(), Some(101));
        assert_eq!(driver.next(101), Some(201));
        assert_eq!(driver.next(201), Some(301));
        assert_eq!(driver.next(301), None);
        assert_eq!(driver.prev(301), Some(201));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn duplicate_migration_is_rejected() {
        let dir = make_temp_dir("dup");
        let files = vec![
            "0001_01_customer_Create.up.sql",
            "0001_01_customer_CreateAgain.up.sql",
        ];
        for f in &files {
            fs::write(dir.join(f), "-- noop").unwrap();
        }

        let err = SourceDriver::open(
            "customer",
            1,
            &dir,
            files.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap_err();
        assert!(matches!(err, MultimigratorError::DuplicateMigration { .. }));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn read_up_returns_body_and_identifier() {
        let dir = make_temp_dir("readup");
        fs::write(dir.join("0001_01_customer_Create.up.sql"), "CREATE TABLE t();").unwrap();

        let driver = SourceDriver::open(
            "customer",
            1,
            &dir,
            vec!["0001_01_customer_Create.up.sql".to_string()],
        )
        .unwrap();

        let (sql, identifier) = driver.read_up(101).unwrap();
        assert_eq!(sql, "CREATE TABLE t();");
        assert_eq!(identifier, "Create");

        fs::remove_dir_all(dir).unwrap();
    }
}
