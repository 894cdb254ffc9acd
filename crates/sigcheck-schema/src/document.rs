//! # Schema Documents
//!
//! Schemas authored as JSON or YAML data, classified into the closed
//! [`Schema`] union before use. Classification is where an unrecognized
//! shape can appear, so it fails fast here rather than at validation time.
//!
//! | Document | Schema |
//! |----------|--------|
//! | `null` | `Any` |
//! | `"int"`, `"Circle"` | `Type` (builtin or registered class) |
//! | `[s, ...]` | list sequence |
//! | `{"list": [s, ...]}` | list sequence |
//! | `{"tuple": [s, ...]}` | tuple sequence |
//! | `{"dict": [[k, v], ...]}` | mapping (entry count kept as written) |
//! | `{"all": [s, ...]}` | `AndChecker` |
//! | `{"any": [s, ...]}` | `OrChecker` |
//!
//! Errors carry a slash-separated path to the offending node, e.g.
//! `/dict/0/1/any/2`.

use serde_json::Value as Json;
use sigcheck_core::{CoreError, TypeRegistry};
use thiserror::Error;

use crate::schema::{Schema, SequenceKind};

/// Error classifying a schema document.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The text was not valid JSON.
    #[error("invalid JSON schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// The text was not valid YAML.
    #[error("invalid YAML schema document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A type name did not resolve.
    #[error("at '{path}': {source}")]
    Type {
        /// Path to the node.
        path: String,
        /// Resolution failure.
        source: CoreError,
    },

    /// The node matches no schema shape.
    #[error("unsupported schema at '{path}': {reason}")]
    Unsupported {
        /// Path to the node.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// An unclassified schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Json,
}

impl SchemaDocument {
    /// Wrap an already-parsed document.
    pub fn new(root: Json) -> Self {
        Self { root }
    }

    /// Parse JSON text.
    ///
    /// # Errors
    ///
    /// `SchemaLoadError::Json` on malformed text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Parse YAML text.
    ///
    /// # Errors
    ///
    /// `SchemaLoadError::Yaml` on malformed text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaLoadError> {
        Ok(Self::new(serde_yaml::from_str(text)?))
    }

    /// The raw document.
    pub fn as_json(&self) -> &Json {
        &self.root
    }

    /// Classify into a [`Schema`], resolving type names through `registry`.
    ///
    /// # Errors
    ///
    /// `SchemaLoadError::Type` for unknown type names,
    /// `SchemaLoadError::Unsupported` for unrecognized shapes.
    pub fn to_schema(&self, registry: &TypeRegistry) -> Result<Schema, SchemaLoadError> {
        classify(&self.root, registry, "")
    }
}

fn unsupported(path: &str, reason: impl Into<String>) -> SchemaLoadError {
    SchemaLoadError::Unsupported {
        path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        reason: reason.into(),
    }
}

fn classify(node: &Json, registry: &TypeRegistry, path: &str) -> Result<Schema, SchemaLoadError> {
    match node {
        Json::Null => Ok(Schema::Any),
        Json::String(name) => registry
            .resolve(name)
            .map(Schema::Type)
            .map_err(|source| SchemaLoadError::Type {
                path: if path.is_empty() { "/".to_string() } else { path.to_string() },
                source,
            }),
        Json::Array(items) => Ok(Schema::Sequence {
            kind: SequenceKind::List,
            elements: classify_all(items, registry, path)?,
        }),
        Json::Object(map) => {
            let mut entries = map.iter();
            let (Some((key, body)), None) = (entries.next(), entries.next()) else {
                return Err(unsupported(
                    path,
                    format!("expected a single-key object, found {} keys", map.len()),
                ));
            };
            let path = format!("{path}/{key}");
            let Json::Array(items) = body else {
                return Err(unsupported(&path, "expected an array"));
            };
            match key.as_str() {
                "list" => Ok(Schema::list(classify_all(items, registry, &path)?)),
                "tuple" => Ok(Schema::tuple(classify_all(items, registry, &path)?)),
                "all" => Ok(Schema::all_of(classify_all(items, registry, &path)?)),
                "any" => Ok(Schema::any_of(classify_all(items, registry, &path)?)),
                "dict" => classify_entries(items, registry, &path).map(Schema::Mapping),
                other => Err(unsupported(&path, format!("unknown schema form '{other}'"))),
            }
        }
        Json::Bool(_) | Json::Number(_) => Err(unsupported(
            path,
            format!("a literal {node} is not a schema"),
        )),
    }
}

fn classify_all(
    items: &[Json],
    registry: &TypeRegistry,
    path: &str,
) -> Result<Vec<Schema>, SchemaLoadError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| classify(item, registry, &format!("{path}/{i}")))
        .collect()
}

fn classify_entries(
    items: &[Json],
    registry: &TypeRegistry,
    path: &str,
) -> Result<Vec<(Schema, Schema)>, SchemaLoadError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry_path = format!("{path}/{i}");
            match item {
                Json::Array(pair) if pair.len() == 2 => Ok((
                    classify(&pair[0], registry, &format!("{entry_path}/0"))?,
                    classify(&pair[1], registry, &format!("{entry_path}/1"))?,
                )),
                _ => Err(unsupported(&entry_path, "expected a [key, value] pair")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigcheck_core::ValueType;

    fn load(text: &str) -> Result<Schema, SchemaLoadError> {
        SchemaDocument::from_json_str(text)?.to_schema(&TypeRegistry::new())
    }

    #[test]
    fn classifies_every_form() {
        assert!(matches!(load("null").unwrap(), Schema::Any));
        assert!(matches!(load(r#""int""#).unwrap(), Schema::Type(ValueType::Int)));
        assert_eq!(load(r#"["int"]"#).unwrap().to_string(), "[int]");
        assert_eq!(load(r#"{"tuple": ["int", "str"]}"#).unwrap().to_string(), "(int, str)");
        assert_eq!(load(r#"{"dict": [["str", ["int"]]]}"#).unwrap().to_string(), "{str: [int]}");
        assert_eq!(
            load(r#"{"any": [{"all": ["int", "object"]}, null]}"#).unwrap().to_string(),
            "OrChecker(AndChecker(int, object), any)"
        );
    }

    #[test]
    fn dict_entry_count_is_preserved() {
        let schema = load(r#"{"dict": []}"#).unwrap();
        assert!(matches!(schema, Schema::Mapping(ref e) if e.is_empty()));
    }

    #[test]
    fn unknown_type_reports_path() {
        let err = load(r#"{"tuple": ["int", "Hexagon"]}"#).unwrap_err();
        assert_eq!(err.to_string(), "at '/tuple/1': unknown type name: 'Hexagon'");
    }

    #[test]
    fn unsupported_shapes_fail_fast() {
        for text in [
            "42",
            "true",
            r#"{"set": ["int"]}"#,
            r#"{"list": "int"}"#,
            r#"{"list": [], "tuple": []}"#,
            r#"{"dict": [["str"]]}"#,
        ] {
            let err = load(text).unwrap_err();
            assert!(
                matches!(err, SchemaLoadError::Unsupported { .. }),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn registered_classes_resolve() {
        let mut registry = TypeRegistry::new();
        registry.declare("Shape", None).unwrap();
        let doc = SchemaDocument::from_yaml_str("list:\n  - Shape\n").unwrap();
        assert_eq!(doc.as_json(), &serde_json::json!({"list": ["Shape"]}));
        let schema = doc.to_schema(&registry).unwrap();
        assert_eq!(schema.to_string(), "[Shape]");
    }
}
