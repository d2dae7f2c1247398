//! Schema management for document structure definition.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::{Result, WolfError};
use crate::schema::field::{FieldEntry, FieldOptions};

/// Ordered set of fields governing one index.
///
/// A schema is immutable once defined. Exactly one field is the unique key; changing
/// the schema of an existing index requires a full rebuild.
///
/// # Examples
///
/// ```
/// use wolfsearch::schema::{FieldOptions, Schema};
///
/// let schema = Schema::define(vec![
///     ("title", FieldOptions::text()),
///     ("content", FieldOptions::text()),
///     ("path", FieldOptions::id()),
/// ])
/// .unwrap();
///
/// assert_eq!(schema.unique_key(), "path");
/// assert_eq!(schema.field_names(), vec!["title", "content", "path"]);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct Schema {
    fields: Vec<FieldEntry>,
    by_name: AHashMap<String, usize>,
    unique_key: usize,
}

/// Serialized form of a schema: the ordered field declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SchemaDef {
    fields: Vec<(String, FieldOptions)>,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = WolfError;

    fn try_from(def: SchemaDef) -> Result<Self> {
        Schema::define(def.fields)
    }
}

impl From<Schema> for SchemaDef {
    fn from(schema: Schema) -> Self {
        SchemaDef {
            fields: schema
                .fields
                .iter()
                .map(|f| (f.name().to_string(), f.options().clone()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("unique_key", &self.unique_key())
            .finish()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name() == b.name() && a.options() == b.options())
    }
}

impl Schema {
    /// Validate and bind a set of field declarations.
    ///
    /// Fails with a schema error when a field name is empty or repeated, or when the
    /// number of unique-key fields is not exactly one.
    pub fn define<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, FieldOptions)>,
        S: Into<String>,
    {
        let mut entries = Vec::new();
        let mut by_name = AHashMap::new();

        for (name, options) in fields {
            let name = name.into();

            if name.is_empty() {
                return Err(WolfError::schema("Field name cannot be empty"));
            }
            if by_name.contains_key(&name) {
                return Err(WolfError::schema(format!("Field '{name}' already exists")));
            }

            by_name.insert(name.clone(), entries.len());
            entries.push(FieldEntry::new(name, options)?);
        }

        if entries.is_empty() {
            return Err(WolfError::schema("Schema must have at least one field"));
        }

        let unique: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_unique())
            .map(|(i, _)| i)
            .collect();

        let unique_key = match unique.as_slice() {
            [only] => *only,
            [] => return Err(WolfError::schema("Schema must declare a unique key field")),
            _ => {
                return Err(WolfError::schema(format!(
                    "Schema declares {} unique key fields, expected exactly one",
                    unique.len()
                )));
            }
        };

        Ok(Schema {
            fields: entries,
            by_name,
            unique_key,
        })
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Look up a field, failing with an invalid field error if it is not declared.
    pub fn require_field(&self, name: &str) -> Result<&FieldEntry> {
        self.field(name)
            .ok_or_else(|| WolfError::invalid_field(name.to_string()))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Name of the unique key field.
    pub fn unique_key(&self) -> &str {
        self.fields[self.unique_key].name()
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.fields.iter().filter(|f| f.is_indexed())
    }

    pub fn stored_fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.fields.iter().filter(|f| f.is_stored())
    }

    /// Analyzer for an indexed field.
    pub fn analyzer(&self, name: &str) -> Option<&Arc<dyn Analyzer>> {
        self.field(name).and_then(|f| f.analyzer())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Incremental schema construction; validation happens in [`SchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldOptions)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        SchemaBuilder { fields: Vec::new() }
    }

    pub fn add_field<S: Into<String>>(mut self, name: S, options: FieldOptions) -> Self {
        self.fields.push((name.into(), options));
        self
    }

    pub fn build(self) -> Result<Schema> {
        Schema::define(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn site_fields() -> Vec<(&'static str, FieldOptions)> {
        vec![
            ("title", FieldOptions::text()),
            ("content", FieldOptions::text()),
            ("path", FieldOptions::id()),
        ]
    }

    #[test]
    fn test_define_valid_schema() {
        let schema = Schema::define(site_fields()).unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.unique_key(), "path");
        assert!(schema.has_field("content"));
        assert!(!schema.has_field("author"));
        assert_eq!(schema.indexed_fields().count(), 3);
        assert_eq!(schema.stored_fields().count(), 3);
        assert_eq!(schema.analyzer("title").unwrap().name(), "stemming");
    }

    #[test]
    fn test_requires_exactly_one_unique_key() {
        let none = Schema::define(vec![("title", FieldOptions::text())]);
        assert_eq!(none.unwrap_err().kind(), ErrorKind::Schema);

        let two = Schema::define(vec![("a", FieldOptions::id()), ("b", FieldOptions::id())]);
        assert_eq!(two.unwrap_err().kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_names() {
        let empty = Schema::define(vec![("", FieldOptions::id())]);
        assert_eq!(empty.unwrap_err().kind(), ErrorKind::Schema);

        let dup = Schema::define(vec![
            ("path", FieldOptions::id()),
            ("path", FieldOptions::text()),
        ]);
        assert_eq!(dup.unwrap_err().kind(), ErrorKind::Schema);

        let nothing: Vec<(String, FieldOptions)> = Vec::new();
        assert!(Schema::define(nothing).is_err());
    }

    #[test]
    fn test_require_field() {
        let schema = Schema::define(site_fields()).unwrap();
        assert!(schema.require_field("title").is_ok());
        assert_eq!(
            schema.require_field("author").unwrap_err().kind(),
            ErrorKind::InvalidField
        );
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let schema = Schema::define(site_fields()).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let restored: Schema = serde_json::from_str(&json).unwrap();

        assert_eq!(schema, restored);
        assert_eq!(restored.field_names(), vec!["title", "content", "path"]);
        assert_eq!(restored.analyzer("path").unwrap().name(), "keyword");
    }

    #[test]
    fn test_invalid_schema_json_is_rejected() {
        let json = r#"{"fields":[["title",{"stored":true,"indexed":true,"analyzer":"stemming","unique":false}]]}"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());
    }

    #[test]
    fn test_builder() {
        let schema = Schema::builder()
            .add_field("id", FieldOptions::id())
            .add_field("body", FieldOptions::text().stored(false))
            .build()
            .unwrap();

        assert_eq!(schema.unique_key(), "id");
        assert!(!schema.field("body").unwrap().is_stored());
    }
}
