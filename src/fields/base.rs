use crate::core::dotted_path::{full_name, to_dotted};
use crate::core::value::Value;
use crate::validators::{ValidatorRule, run_rules};
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

/// State shared by every fillable field variant.
#[derive(Debug, Clone, Default)]
pub struct FieldBase {
    name: String,
    prefix: String,
    label: String,
    description: String,
    placeholder: String,
    value: Value,
    default: Value,
    attributes: IndexMap<String, String>,
    meta: Map<String, Json>,
    validators: Vec<Box<dyn ValidatorRule>>,
    error: Option<String>,
}

impl FieldBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn meta(&self) -> &Map<String, Json> {
        &self.meta
    }

    pub fn validators(&self) -> &[Box<dyn ValidatorRule>] {
        &self.validators
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn full_name(&self) -> String {
        full_name(&self.prefix, &self.name)
    }

    pub fn dot_path(&self) -> String {
        to_dotted(&self.full_name())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = value.into();
        self
    }

    pub fn set_default(&mut self, default: impl Into<Value>) -> &mut Self {
        self.default = default.into();
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    pub fn set_attributes(&mut self, attributes: IndexMap<String, String>) -> &mut Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn set_meta(&mut self, meta: Map<String, Json>) -> &mut Self {
        self.meta = meta;
        self
    }

    pub fn add_validator_rule(&mut self, rule: Box<dyn ValidatorRule>) -> &mut Self {
        self.validators.push(rule);
        self
    }

    /// Runs every rule in order without stopping at the first failure.
    /// The error from a previous call is discarded.
    pub fn validate(&mut self, value: &Value) -> bool {
        let failures = run_rules(&self.validators, value);
        if failures.is_empty() {
            self.error = None;
            true
        } else {
            self.error = Some(failures.join(" "));
            false
        }
    }

    /// Drops per-use state so the field can serve as a fresh template.
    pub fn reset(&mut self) {
        self.value = Value::None;
        self.error = None;
    }

    /// `key="value"` pairs, both sides HTML-escaped.
    pub fn attributes_html(&self) -> String {
        self.attributes
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", escape_html(key), escape_html(value)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn snapshot(&self) -> Map<String, Json> {
        let mut out = Map::new();
        out.insert("name".into(), Json::String(self.name.clone()));
        out.insert("prefix".into(), Json::String(self.prefix.clone()));
        out.insert("full_name".into(), Json::String(self.full_name()));
        out.insert("dot_path".into(), Json::String(self.dot_path()));
        out.insert("label".into(), Json::String(self.label.clone()));
        out.insert("description".into(), Json::String(self.description.clone()));
        out.insert("placeholder".into(), Json::String(self.placeholder.clone()));
        out.insert("value".into(), self.value.to_json());
        out.insert("default".into(), self.default.to_json());
        out.insert(
            "attributes".into(),
            Json::Object(
                self.attributes
                    .iter()
                    .map(|(key, value)| (key.clone(), Json::String(value.clone())))
                    .collect(),
            ),
        );
        out.insert("attributes_html".into(), Json::String(self.attributes_html()));
        out.insert("meta".into(), Json::Object(self.meta.clone()));
        out.insert(
            "validators".into(),
            Json::Array(
                self.validators
                    .iter()
                    .map(|rule| serde_json::json!({ "rule": rule.name(), "params": rule.params() }))
                    .collect(),
            ),
        );
        out.insert(
            "error".into(),
            self.error.clone().map(Json::String).unwrap_or(Json::Null),
        );
        out
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
