use crate::builder::FieldFactory;
use crate::builder::config::FormConfig;
use crate::core::dotted_path::to_dotted;
use crate::core::validation::FormValidator;
use crate::core::value::FormValues;
use crate::error::{ConfigError, RenderError};
use crate::fields::node::{Node, bind_values, collect_fillable, collect_fillable_mut};
use crate::fields::traits::Fillable;
use crate::view::View;
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const FORM_TEMPLATE: &str = "form/form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    Get,
    #[default]
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            _ => Err(ConfigError::InvalidMethod(raw.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Multipart,
    UrlEncoded,
    Plain,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multipart => "multipart/form-data",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
            Self::Plain => "text/plain",
        }
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "multipart/form-data" => Ok(Self::Multipart),
            "application/x-www-form-urlencoded" => Ok(Self::UrlEncoded),
            "text/plain" => Ok(Self::Plain),
            _ => Err(ConfigError::InvalidEncoding(raw.to_string())),
        }
    }
}

/// Root container: top-level fields and groups plus submission metadata.
#[derive(Debug, Clone)]
pub struct Form {
    action: String,
    method: Method,
    encoding: Encoding,
    fields: Vec<Node>,
    attributes: IndexMap<String, String>,
    template: String,
    factory: Arc<FieldFactory>,
}

impl Form {
    pub fn new(factory: Arc<FieldFactory>) -> Self {
        Self {
            action: String::new(),
            method: Method::default(),
            encoding: Encoding::default(),
            fields: Vec::new(),
            attributes: IndexMap::new(),
            template: FORM_TEMPLATE.to_string(),
            factory,
        }
    }

    /// Builds the form and its whole field tree from a definition.
    pub fn from_config(
        factory: Arc<FieldFactory>,
        config: FormConfig,
    ) -> Result<Self, ConfigError> {
        let mut form = Self::new(factory);
        form.action = config.action;
        if let Some(method) = config.method {
            form.set_method(&method)?;
        }
        if let Some(encoding) = config.encoding {
            form.encoding = encoding.parse()?;
        }
        if let Some(template) = config.template {
            form.template = template;
        }
        form.attributes = config.attributes;
        form.fields = form.factory.build_many(config.fields)?;
        Ok(form)
    }

    pub fn from_json(factory: Arc<FieldFactory>, data: Json) -> Result<Self, ConfigError> {
        let config: FormConfig = serde_json::from_value(data)?;
        Self::from_config(factory, config)
    }

    pub fn from_yaml_str(factory: Arc<FieldFactory>, source: &str) -> Result<Self, ConfigError> {
        let config: FormConfig = serde_yaml::from_str(source)?;
        Self::from_config(factory, config)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn fields(&self) -> &[Node] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Node] {
        &mut self.fields
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn factory(&self) -> &Arc<FieldFactory> {
        &self.factory
    }

    /// Accepts `get` or `post` in any case.
    pub fn set_method(&mut self, method: &str) -> Result<&mut Self, ConfigError> {
        self.method = method.parse()?;
        Ok(self)
    }

    pub fn set_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.action = action.into();
        self
    }

    pub fn set_encoding(&mut self, encoding: Encoding) -> &mut Self {
        self.encoding = encoding;
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    pub fn set_template(&mut self, template: impl Into<String>) -> &mut Self {
        self.template = template.into();
        self
    }

    /// Builds a field through the factory and appends it.
    pub fn add_field(&mut self, type_tag: &str, data: Json) -> Result<&mut Node, ConfigError> {
        let node = self.factory.build(type_tag, data)?;
        Ok(self.push(node))
    }

    pub fn push(&mut self, node: impl Into<Node>) -> &mut Node {
        let index = self.fields.len();
        self.fields.push(node.into());
        &mut self.fields[index]
    }

    /// Distributes a submission over the field tree.
    pub fn set_value(&mut self, values: &FormValues) -> Result<&mut Self, ConfigError> {
        bind_values(&mut self.fields, values)?;
        Ok(self)
    }

    /// First fillable leaf whose dot path matches `name`, given in dot or
    /// bracket form.
    pub fn field(&self, name: &str) -> Option<&dyn Fillable> {
        let target = to_dotted(name);
        let mut leaves = Vec::new();
        collect_fillable(&self.fields, &mut leaves);
        leaves.into_iter().find(|leaf| leaf.dot_path() == target)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut dyn Fillable> {
        let target = to_dotted(name);
        let mut leaves = Vec::new();
        collect_fillable_mut(&mut self.fields, &mut leaves);
        leaves.into_iter().find(|leaf| leaf.dot_path() == target)
    }

    pub fn validator(&mut self, values: FormValues) -> FormValidator<'_> {
        FormValidator::new(&mut self.fields, values)
    }

    /// Copy of the definition with every value and error cleared, for a
    /// second submission.
    pub fn fresh_clone(&self) -> Self {
        Self {
            fields: self.fields.iter().map(Node::fresh_clone).collect(),
            ..self.clone()
        }
    }

    pub fn serialize(&self) -> Json {
        let mut out = Map::new();
        out.insert("action".into(), Json::String(self.action.clone()));
        out.insert("method".into(), Json::String(self.method.as_str().into()));
        out.insert("encoding".into(), Json::String(self.encoding.as_str().into()));
        out.insert(
            "attributes".into(),
            Json::Object(
                self.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), Json::String(v.clone())))
                    .collect(),
            ),
        );
        out.insert("template".into(), Json::String(self.template.clone()));
        out.insert(
            "fields".into(),
            Json::Array(self.fields.iter().map(Node::serialize).collect()),
        );
        Json::Object(out)
    }

    pub fn render(&self, view: &View, template: Option<&str>) -> Result<String, RenderError> {
        view.render(&self.template, template, "form", self.serialize())
    }
}
