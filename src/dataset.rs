//! The in-memory Pokédex.
//!
//! The dataset is loaded once at startup from a JSON document shaped like:
//!
//! ```text
//! { "pokemon": [ { "name": "Bulbasaur", "type": ["Grass", "Poison"], ... }, ... ] }
//! ```
//!
//! Only `name` and `type` are interpreted. Every other field is carried through
//! untouched and serialized back in the order it was read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::DatasetError;

// =============================================================================
// Type Tags
// =============================================================================

/// Type tags served by `GET /types`.
///
/// This list is fixed; dataset records are not validated against it.
pub const TYPE_TAGS: [&str; 18] = [
    "Bug", "Dark", "Dragon", "Electric", "Fairy", "Fighting", "Fire", "Flying", "Ghost", "Grass",
    "Ground", "Ice", "Normal", "Poison", "Psychic", "Rock", "Steel", "Water",
];

// =============================================================================
// Records
// =============================================================================

/// A single Pokédex entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CreatureRecord {
    name: String,
    types: Vec<String>,
    fields: Map<String, Value>,
}

impl CreatureRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// The full record as loaded, including passthrough fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// String form of the type collection, tags joined with `,`.
    pub fn type_string(&self) -> String {
        self.types.join(",")
    }
}

impl TryFrom<Map<String, Value>> for CreatureRecord {
    type Error = DatasetError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let name = match fields.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(invalid("`name` must be a string")),
            None => return Err(invalid("missing `name` field")),
        };

        let types = match fields.get("type") {
            Some(Value::Array(tags)) => tags
                .iter()
                .map(|tag| match tag {
                    Value::String(tag) => Ok(tag.clone()),
                    _ => Err(invalid(format!("`type` of '{}' must contain only strings", name))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(invalid(format!("`type` of '{}' must be an array", name))),
            None => return Err(invalid(format!("'{}' is missing `type` field", name))),
        };

        Ok(Self {
            name,
            types,
            fields,
        })
    }
}

fn invalid(message: impl Into<String>) -> DatasetError {
    DatasetError::InvalidRecord {
        message: message.into(),
    }
}

impl Serialize for CreatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

// =============================================================================
// Query
// =============================================================================

/// Filters for `GET /pokemon`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatureQuery {
    /// Case-insensitive substring of the name. An empty string still filters
    /// (and matches everything).
    pub name: Option<String>,

    /// Case-sensitive substring of the type string form. Empty means absent.
    pub type_tag: Option<String>,
}

impl CreatureQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_tag: None,
        }
    }

    pub fn by_type(type_tag: impl Into<String>) -> Self {
        Self {
            name: None,
            type_tag: Some(type_tag.into()),
        }
    }

    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }
}

// =============================================================================
// Dataset
// =============================================================================

#[derive(Deserialize)]
struct PokedexFile {
    pokemon: Vec<CreatureRecord>,
}

/// Ordered, immutable collection of records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CreatureRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<CreatureRecord>) -> Self {
        Self { records }
    }

    /// Parse a Pokédex document.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let file: PokedexFile = serde_json::from_str(json)?;
        Ok(Self::from_records(file.pokemon))
    }

    /// Read and parse a Pokédex file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn records(&self) -> &[CreatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply the name filter, then the type filter, preserving dataset order.
    pub fn query(&self, query: &CreatureQuery) -> Vec<&CreatureRecord> {
        let mut matches: Vec<&CreatureRecord> = self.records.iter().collect();

        if let Some(name) = query.name.as_deref() {
            let needle = name.to_lowercase();
            matches.retain(|record| record.name.to_lowercase().contains(&needle));
        }

        // Type matching is case-sensitive, unlike the name filter.
        if let Some(tag) = query.type_tag.as_deref().filter(|tag| !tag.is_empty()) {
            matches.retain(|record| record.type_string().contains(tag));
        }

        matches
    }
}

// =============================================================================
// Tests
// =============================================================================
