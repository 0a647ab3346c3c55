//! Generates a `SchemaLevel` enum from an ordering manifest.
//!
//! Builds a Rust source string: `SCHEMA_NAMES`, a `SchemaLevel` newtype, `MAXIMUM_SCHEMA_LEVEL`,
//! a fallible `schema_name`, and a sentinel error for out-of-range values.

use crate::error::MultimigratorError;

/// Converts a schema name into a `SCREAMING_SNAKE_CASE` associated-const identifier.
fn screaming_snake(name: &str) -> String {
    name.chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Renders a `SchemaLevel`-style integer-backed enumeration for `schemata` into a single Rust
/// source file, to be written under the caller's `module_name`.
///
/// Returns an error if `schemata` is empty, since there is no sensible `MAXIMUM_SCHEMA_LEVEL`.
pub fn generate_schema_level(module_name: &str, schemata: &[String]) -> Result<String, MultimigratorError> {
    if schemata.is_empty() {
        return Err(MultimigratorError::InvalidManifest(
            "cannot generate a schema level enum with no schemata".to_string(),
        ));
    }

    let error_name = format!("Invalid{module_name}");

    let mut out = String::new();
    out.push_str("// Generated by multimigrator codegen. Do not edit by hand.\n\n");
    out.push_str("use std::fmt;\n\n");

    out.push_str("pub const SCHEMA_NAMES: &[&str] = &[");
    for (i, name) in schemata.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('"');
        out.push_str(name);
        out.push('"');
    }
    out.push_str("];\n\n");

    out.push_str(&format!("#[derive(Debug, Clone, Copy, PartialEq, Eq)]\npub struct {error_name};\n\n"));
    out.push_str(&format!("impl fmt::Display for {error_name} {{\n"));
    out.push_str("    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {\n");
    out.push_str("        f.write_str(\"invalid schema level\")\n");
    out.push_str("    }\n}\n\n");
    out.push_str(&format!("impl std::error::Error for {error_name} {{}}\n\n"));

    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]\n");
    out.push_str(&format!("pub struct {module_name}(pub u32);\n\n"));

    out.push_str(&format!("impl {module_name} {{\n"));
    for (i, name) in schemata.iter().enumerate() {
        out.push_str(&format!(
            "    pub const {}: {module_name} = {module_name}({});\n",
            screaming_snake(name),
            i + 1
        ));
    }
    out.push_str(&format!(
        "    pub const MAXIMUM_SCHEMA_LEVEL: {module_name} = {module_name}({});\n\n",
        schemata.len()
    ));

    out.push_str(&format!("    pub fn schema_name(self) -> Result<&'static str, {error_name}> {{\n"));
    out.push_str("        match self.0 {\n");
    for (i, name) in schemata.iter().enumerate() {
        out.push_str(&format!("            {} => Ok(\"{name}\"),\n", i + 1));
    }
    out.push_str(&format!("            _ => Err({error_name}),\n"));
    out.push_str("        }\n    }\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl fmt::Display for {module_name} {{\n"));
    out.push_str("    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {\n");
    out.push_str("        match self.schema_name() {\n");
    out.push_str("            Ok(name) => f.write_str(name),\n");
    out.push_str(&format!(
        "            Err(_) => write!(f, \"{module_name}({{}})\", self.0),\n"
    ));
    out.push_str("        }\n    }\n}\n");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_associated_const_per_schema_in_declared_order() {
        let schemata = vec!["customer".to_string(), "manifest_new".to_string()];
        let rendered = generate_schema_level("SchemaLevel", &schemata).unwrap();
        assert!(rendered.contains("pub struct SchemaLevel(pub u32);"));
        assert!(rendered.contains("pub const CUSTOMER: SchemaLevel = SchemaLevel(1);"));
        assert!(rendered.contains("pub const MANIFEST_NEW: SchemaLevel = SchemaLevel(2);"));
        assert!(rendered.contains("pub const MAXIMUM_SCHEMA_LEVEL: SchemaLevel = SchemaLevel(2);"));
    }

    #[test]
    fn schema_name_is_fallible_and_backed_by_a_sentinel_error() {
        let schemata = vec!["indexing".to_string()];
        let rendered = generate_schema_level("SchemaLevel", &schemata).unwrap();
        assert!(rendered.contains("pub struct InvalidSchemaLevel;"));
        assert!(rendered.contains("pub fn schema_name(self) -> Result<&'static str, InvalidSchemaLevel> {"));
        assert!(rendered.contains("1 => Ok(\"indexing\"),"));
        assert!(rendered.contains("_ => Err(InvalidSchemaLevel),"));
    }

    #[test]
    fn display_falls_back_to_debug_tuple_form_for_unknown_values() {
        let schemata = vec!["customer".to_string()];
        let rendered = generate_schema_level("SchemaLevel", &schemata).unwrap();
        assert!(rendered.contains("Err(_) => write!(f, \"SchemaLevel({})\", self.0),"));
    }

    #[test]
    fn empty_schemata_is_rejected() {
        let err = generate_schema_level("SchemaLevel", &[]).unwrap_err();
        assert!(matches!(err, MultimigratorError::InvalidManifest(_)));
    }

    #[test]
    fn screaming_snake_preserves_underscores() {
        assert_eq!(screaming_snake("manifest_new"), "MANIFEST_NEW");
        assert_eq!(screaming_snake("customer"), "CUSTOMER");
    }
}
