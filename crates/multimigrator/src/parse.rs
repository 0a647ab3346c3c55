//! Filename tuple parser.
//!
//! Decodes `<globalVersion>_<schemaIndex>_<schemaName>_<identifier>.(up|down).<ext>` into a
//! [`Migration`], validating that the embedded schema index agrees with the schema's declared
//! position in the ordering manifest.

use crate::error::MultimigratorError;
use regex::Regex;

/// Direction of a migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// A single migration file, decoded from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The concatenation of the global version and schema index digit groups.
    pub effective_version: u64,
    pub identifier: String,
    pub direction: Direction,
    pub raw: String,
}

/// Builds the regex that matches migration filenames belonging to one named schema: one literal,
/// escaped regex per schema rather than a single generic pattern, since schema names and
/// identifiers can both contain underscores.
fn schema_regex(schema_name: &str) -> Regex {
    let pattern = format!(
        "^([0-9]+)_([0-9]+)_({})_(.*)\\.(up|down)\\.(.*)$",
        regex::escape(schema_name)
    );
    Regex::new(&pattern).expect("generated schema regex is valid")
}

/// Parses a single migration filename against one declared schema name and its 1-based manifest
/// index. Returns `Ok(None)` when the name doesn't match this schema at all (the caller should
/// try the next schema, per the decreasing-name-length rule in [`crate::discovery`]).
pub fn parse_for_schema(
    file_name: &str,
    schema_name: &str,
    schema_index: u32,
) -> Result<Option<Migration>, MultimigratorError> {
    let Some(caps) = schema_regex(schema_name).captures(file_name) else {
        return Ok(None);
    };

    let global_version_str = &caps[1];
    let schema_index_str = &caps[2];

    let found_index: u32 = schema_index_str
        .parse()
        .map_err(|_| MultimigratorError::Other(format!("malformed schema index in {file_name}")))?;
    if found_index != schema_index {
        return Err(MultimigratorError::WrongSchemaIndex {
            file: file_name.to_string(),
            schema: schema_name.to_string(),
            expected: schema_index,
            found: found_index,
        });
    }

    let effective_version: u64 = format!("{global_version_str}{schema_index_str}")
        .parse()
        .map_err(|_| MultimigratorError::Other(format!("malformed version in {file_name}")))?;

    let direction = match &caps[5] {
        "up" => Direction::Up,
        "down" => Direction::Down,
        other => {
            return Err(MultimigratorError::Other(format!(
                "unknown direction '{other}' in {file_name}"
            )));
        }
    };

    Ok(Some(Migration {
        effective_version,
        identifier: caps[4].to_string(),
        direction,
        raw: file_name.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_up_migration() {
        let m = parse_for_schema("0001_01_customer_Create.up.sql", "customer", 1)
            .unwrap()
            .unwrap();
        assert_eq!(m.effective_version, 101);
        assert_eq!(m.identifier, "Create");
        assert_eq!(m.direction, Direction::Up);
    }

    #[test]
    fn identifier_may_contain_underscores() {
        let m = parse_for_schema("0001_02_manifest_Create_new.up.sql", "manifest", 2)
            .unwrap()
            .unwrap();
        assert_eq!(m.effective_version, 102);
        assert_eq!(m.identifier, "Create_new");
        assert_eq!(m.direction, Direction::Up);
    }

    #[test]
    fn wrong_schema_index_is_an_error() {
        let err = parse_for_schema("0001_02_indexing_Create_new.up.sql", "indexing", 3).unwrap_err();
        assert!(matches!(err, MultimigratorError::WrongSchemaIndex { .. }));
    }

    #[test]
    fn non_matching_schema_name_returns_none() {
        let result = parse_for_schema("0001_01_customer_Create.up.sql", "other", 1).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn down_direction_is_recognized() {
        let m = parse_for_schema("0002_01_customer_Drop.down.sql", "customer", 1)
            .unwrap()
            .unwrap();
        assert_eq!(m.direction, Direction::Down);
    }
}
