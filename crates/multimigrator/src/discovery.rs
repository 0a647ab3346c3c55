//! Flat-directory file discovery.
//!
//! Given a migrations root containing files for every schema side by side, groups file names by
//! the schema they belong to. Schemata are matched in decreasing name-length order so one schema
//! name being a prefix of another (`abcd` vs `abcde`) can't misclassify files.

use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Builds the membership-test regex for one schema: `^\d+_\d+_<name>_[^.]+\.(up|down)\.sql$`.
fn membership_regex(schema_name: &str) -> Regex {
    let pattern = format!(
        r"^[0-9]+_[0-9]+_{}_[^.]+\.(?:up|down)\.sql$",
        regex::escape(schema_name)
    );
    Regex::new(&pattern).expect("generated membership regex is valid")
}

/// Scans `root` (a flat directory) and returns `schemaName -> [fileName]` for every schema in
/// `schemata`, in manifest order. Files matching no schema are silently skipped (they may belong
/// to a future or disabled schema).
pub fn discover_flat(root: &Path, schemata: &[String]) -> std::io::Result<BTreeMap<String, Vec<String>>> {
    // Schemata must be tried in order of decreasing name length so a shorter name can't swallow
    // a longer one that starts with the same prefix.
    let mut order: Vec<usize> = (0..schemata.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(schemata[i].len()));
    let regexes: Vec<(usize, Regex)> = order
        .into_iter()
        .map(|i| (i, membership_regex(&schemata[i])))
        .collect();

    let mut out: BTreeMap<String, Vec<String>> =
        schemata.iter().map(|s| (s.clone(), Vec::new())).collect();

    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();

    for name in names {
        for (i, re) in &regexes {
            if re.is_match(&name) {
                out.get_mut(&schemata[*i]).unwrap().push(name.clone());
                break;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("multimigrator-discovery-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn disambiguates_prefix_schema_names() {
        let dir = make_temp_dir("prefix");
        for f in [
            "001_100_abcd_Start.up.sql",
            "002_100_abcd_Amend.up.sql",
            "001_200_abcde_Start.up.sql",
        ] {
            fs::write(dir.join(f), "-- noop").unwrap();
        }

        let schemata = vec!["abcd".to_string(), "abcde".to_string()];
        let grouped = discover_flat(&dir, &schemata).unwrap();

        assert_eq!(
            grouped["abcd"],
            vec!["001_100_abcd_Start.up.sql", "002_100_abcd_Amend.up.sql"]
        );
        assert_eq!(grouped["abcde"], vec!["001_200_abcde_Start.up.sql"]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unmatched_files_are_silently_skipped() {
        let dir = make_temp_dir("unmatched");
        fs::write(dir.join("not_a_migration.txt"), "").unwrap();
        fs::write(dir.join("0001_01_known_Create.up.sql"), "-- noop").unwrap();

        let schemata = vec!["known".to_string()];
        let grouped = discover_flat(&dir, &schemata).unwrap();

        assert_eq!(grouped["known"], vec!["0001_01_known_Create.up.sql"]);

        fs::remove_dir_all(dir).unwrap();
    }
}
