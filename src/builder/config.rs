//! Serde shapes of form definitions, loaded from JSON or YAML.

use crate::core::value::Value;
use crate::error::ConfigError;
use crate::fields::base::FieldBase;
use crate::fields::selectable::VariantsConfig;
use crate::validators::{RuleConfig, RuleRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as Json};

/// Data every fillable field accepts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub name: String,
    pub label: String,
    pub description: String,
    pub placeholder: String,
    pub value: Value,
    pub default: Value,
    #[serde(deserialize_with = "scalar_map")]
    pub attributes: IndexMap<String, String>,
    pub meta: Map<String, Json>,
    pub validators: Vec<RuleConfig>,
    pub variants: VariantsConfig,
}

impl FieldConfig {
    /// Copies the common data onto `base`, resolving validator rules.
    pub fn apply(self, base: &mut FieldBase, rules: &RuleRegistry) -> Result<(), ConfigError> {
        base.set_name(self.name)
            .set_label(self.label)
            .set_description(self.description)
            .set_placeholder(self.placeholder)
            .set_value(self.value)
            .set_default(self.default)
            .set_attributes(self.attributes)
            .set_meta(self.meta);
        for rule in rules.build_all(&self.validators)? {
            base.add_validator_rule(rule);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub name: String,
    pub prefix: String,
    pub title: String,
    pub collapsed: bool,
    pub is_multi: bool,
    /// Literal child definitions, each carrying its own `type`.
    pub fields: Vec<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub action: String,
    pub method: Option<String>,
    pub encoding: Option<String>,
    #[serde(deserialize_with = "scalar_map")]
    pub attributes: IndexMap<String, String>,
    pub template: Option<String>,
    pub fields: Vec<Json>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(v) => v,
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
        }
    }
}

/// Attribute maps hold scalars; numbers and booleans are kept as text.
fn scalar_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, value.into_text()))
        .collect())
}
