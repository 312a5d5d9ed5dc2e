//! YAML fixture files: schema plus static per-model definitions.
//!
//! ```yaml
//! version: 1
//! seed: 7
//! models:
//!   - name: User
//!     fields:
//!       - name: id
//!         type: id
//!         unique: true
//!       - name: role
//!         type: string
//!       - name: posts
//!         relation: Post
//!         list: true
//!   - name: Post
//!     fields:
//!       - name: id
//!         type: id
//!         unique: true
//!       - name: author
//!         relation: User
//! definitions:
//!   User:
//!     amount: 3
//!     fields:
//!       role: admin
//!       posts: { type: AT_MAX, value: 2 }
//! ```

use crate::constraint::{FieldOverride, Overrides};
use crate::schema::{ModelDescriptor, Schema, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn default_version() -> u32 {
    1
}

/// Static definition of one model's fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionConfig {
    /// Number of instances; the engine default applies when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<usize>,

    /// Fixed values or constraints applied to every instance
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldOverride>,
}

impl DefinitionConfig {
    /// The configured fields as a factory result.
    pub fn overrides(&self) -> Overrides {
        self.fields
            .iter()
            .fold(Overrides::new(), |acc, (name, value)| {
                acc.set(name.clone(), value.clone())
            })
    }
}

/// Contents of a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Seed used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Models in declaration order
    pub models: Vec<ModelDescriptor>,

    /// Per-model definitions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, DefinitionConfig>,
}

impl FixtureConfig {
    /// Load a fixture file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a fixture file from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Schema snapshot of the configured models.
    pub fn schema(&self) -> Schema {
        let mut schema = Schema::new(self.models.clone());
        schema.version = self.version;
        schema
    }
}
