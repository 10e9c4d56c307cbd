use crate::core::value::Value;
use crate::fields::base::FieldBase;
use crate::fields::traits::Fillable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

/// Options as written in a definition: a list of `{label, value}` pairs or
/// bare strings, or a `value: label` mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariantsConfig {
    List(Vec<VariantEntry>),
    Map(IndexMap<String, String>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariantEntry {
    Pair(SelectOption),
    Plain(String),
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<VariantsConfig> for Vec<SelectOption> {
    fn from(config: VariantsConfig) -> Self {
        match config {
            VariantsConfig::List(entries) => entries
                .into_iter()
                .map(|entry| match entry {
                    VariantEntry::Pair(option) => option,
                    VariantEntry::Plain(value) => SelectOption::new(value.clone(), value),
                })
                .collect(),
            VariantsConfig::Map(map) => map
                .into_iter()
                .map(|(value, label)| SelectOption::new(label, value))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    Select,
    Radio,
    /// Several options may be picked; the value is a list.
    Checkbox,
}

impl SelectKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::Select => "fields/select",
            Self::Radio => "fields/radio",
            Self::Checkbox => "fields/checkbox",
        }
    }
}

/// Select, radio group and checkbox set. Options keep declaration order; no
/// uniqueness is enforced.
#[derive(Debug, Clone)]
pub struct Selectable {
    base: FieldBase,
    kind: SelectKind,
    variants: Vec<SelectOption>,
}

impl Selectable {
    pub fn new(kind: SelectKind, name: impl Into<String>) -> Self {
        Self {
            base: FieldBase::new(name),
            kind,
            variants: Vec::new(),
        }
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::new(SelectKind::Select, name)
    }

    pub fn radio(name: impl Into<String>) -> Self {
        Self::new(SelectKind::Radio, name)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(SelectKind::Checkbox, name)
    }

    pub fn kind(&self) -> SelectKind {
        self.kind
    }

    pub fn with_variants(mut self, variants: Vec<SelectOption>) -> Self {
        self.variants = variants;
        self
    }

    pub fn set_variants(&mut self, variants: Vec<SelectOption>) -> &mut Self {
        self.variants = variants;
        self
    }

    pub fn variants(&self) -> &[SelectOption] {
        &self.variants
    }

    pub fn is_selected(&self, option: &SelectOption) -> bool {
        self.base
            .value()
            .items()
            .iter()
            .any(|item| *item == option.value)
    }
}

impl Fillable for Selectable {
    fn base(&self) -> &FieldBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }

    fn type_tag(&self) -> &str {
        self.kind.tag()
    }

    fn template(&self) -> &str {
        self.kind.template()
    }

    fn set_value(&mut self, value: Value) {
        let value = match (self.kind, value) {
            (SelectKind::Checkbox, Value::Text(text)) => Value::List(vec![text]),
            (_, other) => other,
        };
        self.base.set_value(value);
    }

    fn as_selectable(&self) -> Option<&Selectable> {
        Some(self)
    }

    fn as_selectable_mut(&mut self) -> Option<&mut Selectable> {
        Some(self)
    }

    fn extend_snapshot(&self, out: &mut Map<String, Json>) {
        let variants = self
            .variants
            .iter()
            .map(|option| {
                serde_json::json!({
                    "label": option.label,
                    "value": option.value,
                    "selected": self.is_selected(option),
                })
            })
            .collect();
        out.insert("variants".into(), Json::Array(variants));
    }
}
