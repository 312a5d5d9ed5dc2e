//! Schema definitions consumed by the fixture engine.
//!
//! A [`Schema`] is a read-only snapshot of the models the engine generates
//! fixtures for. It is usually built in code by a schema provider, or loaded
//! from the `models` section of a YAML fixture file.
//!
//! ## YAML Format
//!
//! ```yaml
//! models:
//!   - name: User
//!     fields:
//!       - name: id
//!         type: id
//!         unique: true
//!       - name: name
//!         type: string
//!       - name: posts
//!         relation: Post
//!         list: true
//!   - name: Post
//!     operations:
//!       create: insertPost
//!       update: patchPost
//!     fields:
//!       - name: id
//!         type: id
//!         unique: true
//!       - name: author
//!         relation: User
//! ```
//!
//! A field declares either a scalar `type` or a `relation` target model.
//! Store operation names default to `create<Model>` and `update<Model>`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Field declares neither or both of `type` and `relation`
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

// ============================================================================
// Field Types
// ============================================================================

/// Declared type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Identifier field. Unique identifiers come from the pluggable
    /// identifier generator.
    Id,
    /// Short text
    String,
    /// 32-bit integer
    Int,
    /// Floating point number
    Float,
    /// Boolean
    Boolean,
    /// Calendar date and time (UTC)
    DateTime,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id => "id",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::DateTime => "date_time",
        };
        f.write_str(name)
    }
}

/// What a field holds: a scalar value or a relation to another model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar value of the given type
    Scalar(ScalarType),
    /// Relation to the named model
    Relation(String),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::Relation(model) => write!(f, "relation({model})"),
        }
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Field metadata supplied by the schema provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDescriptor", into = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Scalar type or relation target
    pub kind: FieldKind,

    /// Whether values must be unique across instances of the model
    pub unique: bool,

    /// Whether the field holds a list (relations only have meaning here)
    pub list: bool,
}

impl FieldDescriptor {
    /// Create a scalar field.
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar(scalar),
            unique: false,
            list: false,
        }
    }

    /// Create a single-valued relation field pointing at `model`.
    pub fn relation(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Relation(model.into()),
            unique: false,
            list: false,
        }
    }

    /// Create a unique identifier field.
    pub fn id(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::Id).unique()
    }

    /// Mark the field as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field as a list.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Whether this is a scalar field.
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, FieldKind::Scalar(_))
    }

    /// Scalar type of the field, if it is a scalar.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self.kind {
            FieldKind::Scalar(scalar) => Some(scalar),
            FieldKind::Relation(_) => None,
        }
    }

    /// Target model of the field, if it is a relation.
    pub fn relation_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Relation(model) => Some(model),
            FieldKind::Scalar(_) => None,
        }
    }
}

/// On-disk shape of a field: `type` and `relation` are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFieldDescriptor {
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    field_type: Option<ScalarType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relation: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    unique: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    list: bool,
}

impl TryFrom<RawFieldDescriptor> for FieldDescriptor {
    type Error = SchemaError;

    fn try_from(raw: RawFieldDescriptor) -> Result<Self, Self::Error> {
        let kind = match (raw.field_type, raw.relation) {
            (Some(scalar), None) => FieldKind::Scalar(scalar),
            (None, Some(model)) => FieldKind::Relation(model),
            (Some(_), Some(_)) => {
                return Err(SchemaError::InvalidField {
                    field: raw.name,
                    reason: "declares both `type` and `relation`".to_string(),
                })
            }
            (None, None) => {
                return Err(SchemaError::InvalidField {
                    field: raw.name,
                    reason: "declares neither `type` nor `relation`".to_string(),
                })
            }
        };
        Ok(Self {
            name: raw.name,
            kind,
            unique: raw.unique,
            list: raw.list,
        })
    }
}

impl From<FieldDescriptor> for RawFieldDescriptor {
    fn from(field: FieldDescriptor) -> Self {
        let (field_type, relation) = match field.kind {
            FieldKind::Scalar(scalar) => (Some(scalar), None),
            FieldKind::Relation(model) => (None, Some(model)),
        };
        Self {
            name: field.name,
            field_type,
            relation,
            unique: field.unique,
            list: field.list,
        }
    }
}

/// Store operation names for a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOperations {
    /// Operation creating one instance from its scalar fields
    pub create: String,
    /// Operation connecting the relations of one instance
    pub update: String,
}

impl StoreOperations {
    /// Default operation names for a model: `create<Model>` / `update<Model>`.
    pub fn for_model(model: &str) -> Self {
        Self {
            create: format!("create{model}"),
            update: format!("update{model}"),
        }
    }
}

/// Model metadata supplied by the schema provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,

    /// Store operations; defaulted from the model name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operations: Option<StoreOperations>,
}

impl ModelDescriptor {
    /// Create a model with default store operation names.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
            operations: None,
        }
    }

    /// Override the store operation names.
    pub fn with_operations(mut self, create: impl Into<String>, update: impl Into<String>) -> Self {
        self.operations = Some(StoreOperations {
            create: create.into(),
            update: update.into(),
        });
        self
    }

    /// Store operation names for this model.
    pub fn operations(&self) -> StoreOperations {
        self.operations
            .clone()
            .unwrap_or_else(|| StoreOperations::for_model(&self.name))
    }

    /// The field used to address instances in the store: the first unique
    /// `id` field.
    pub fn identifier_field(&self) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.unique && f.scalar_type() == Some(ScalarType::Id))
    }
}

fn default_version() -> u32 {
    1
}

/// Schema snapshot: models in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Schema version
    pub version: u32,

    /// Model definitions
    pub models: Vec<ModelDescriptor>,

    /// Cached model lookup
    model_map: HashMap<String, usize>,
}

impl Schema {
    /// Create a schema from a list of models.
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        let mut schema = Self {
            version: default_version(),
            models,
            model_map: HashMap::new(),
        };
        schema.build_model_map();
        schema
    }

    /// Build the internal model lookup map.
    fn build_model_map(&mut self) {
        self.model_map = self
            .models
            .iter()
            .enumerate()
            .map(|(idx, model)| (model.name.clone(), idx))
            .collect();
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.model_map
            .get(name)
            .and_then(|&idx| self.models.get(idx))
    }

    /// Get all model names in declaration order.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}
