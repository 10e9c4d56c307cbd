pub mod config;
pub mod registry;

use crate::core::value::FormValues;
use crate::error::ConfigError;
use crate::fields::boolean::Boolean;
use crate::fields::button::Button;
use crate::fields::group::Group;
use crate::fields::html::Html;
use crate::fields::input::{INPUT_KINDS, Input};
use crate::fields::node::{Node, bind_values, collect_fillable, collect_fillable_mut};
use crate::fields::selectable::{SelectKind, Selectable};
use crate::fields::textarea::Textarea;
use crate::fields::traits::Fillable;
use crate::validators::{RuleConfig, RuleRegistry, ValidatorRule};
use config::{FieldConfig, GroupConfig, HtmlConfig};
use registry::{FieldConstructor, TypeRegistry};
use serde_json::{Map, Value as Json, json};
use std::sync::Arc;

/// An element handed to [`FieldFactory::build_many`]: a literal definition
/// (with a `type` key) or an already built node.
#[derive(Debug)]
pub enum FieldEntry {
    Config(Json),
    Built(Node),
}

impl From<Json> for FieldEntry {
    fn from(config: Json) -> Self {
        Self::Config(config)
    }
}

impl From<Node> for FieldEntry {
    fn from(node: Node) -> Self {
        Self::Built(node)
    }
}

/// Turns type tags and definition data into field trees.
///
/// Owns the type registry and the validator rule registry. Build one at
/// application start, register any extra types, then share it.
#[derive(Debug, Clone)]
pub struct FieldFactory {
    types: TypeRegistry,
    rules: RuleRegistry,
}

impl FieldFactory {
    /// Factory with the built-in field types and rules.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register_builtin_types();
        factory
    }

    /// Factory with no field types; built-in rules are still available.
    pub fn empty() -> Self {
        Self {
            types: TypeRegistry::new(),
            rules: RuleRegistry::new(),
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn rule_registry(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Resolves validator definitions into rule instances.
    pub fn rules(
        &self,
        configs: &[RuleConfig],
    ) -> Result<Vec<Box<dyn ValidatorRule>>, ConfigError> {
        self.rules.build_all(configs)
    }

    /// Registers or replaces a field type. Application types should carry a
    /// package prefix, e.g. `filesystems::path`.
    pub fn register_type<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&FieldFactory, Json) -> Result<Node, ConfigError> + Send + Sync + 'static,
    {
        let tag = tag.into();
        tracing::debug!(field_type = %tag, "registered field type");
        let constructor: FieldConstructor = Arc::new(constructor);
        self.types.insert(tag, constructor);
    }

    pub fn register_rule<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&RuleConfig) -> Result<Box<dyn ValidatorRule>, ConfigError> + Send + Sync + 'static,
    {
        self.rules.register(tag, constructor);
    }

    fn register_builtin_types(&mut self) {
        self.register_type("input", |factory: &FieldFactory, data: Json| {
            let mut field = Input::new("");
            fill(factory, field.base_mut(), data)?;
            Ok(Node::field(field))
        });
        self.register_type("textarea", |factory: &FieldFactory, data: Json| {
            let mut field = Textarea::new("");
            fill(factory, field.base_mut(), data)?;
            Ok(Node::field(field))
        });
        self.register_type("bool", |factory: &FieldFactory, data: Json| {
            let mut field = Boolean::new("");
            fill(factory, field.base_mut(), data)?;
            Ok(Node::field(field))
        });
        self.register_type("button", |factory: &FieldFactory, data: Json| {
            let mut field = Button::new("");
            fill(factory, field.base_mut(), data)?;
            Ok(Node::field(field))
        });
        for kind in [SelectKind::Select, SelectKind::Radio, SelectKind::Checkbox] {
            self.register_type(kind.tag(), move |factory: &FieldFactory, data: Json| {
                let mut config: FieldConfig = serde_json::from_value(data)?;
                let mut field = Selectable::new(kind, "");
                field.set_variants(std::mem::take(&mut config.variants).into());
                config.apply(field.base_mut(), factory.rule_registry())?;
                // re-set through the variant so a checkbox normalizes to a list
                let value = field.value().clone();
                Fillable::set_value(&mut field, value);
                Ok(Node::field(field))
            });
        }
        self.register_type("html", |_: &FieldFactory, data: Json| {
            let config: HtmlConfig = serde_json::from_value(data)?;
            Ok(Node::Html(Html::new(config.value).with_name(config.name)))
        });
        self.register_type("group", |factory: &FieldFactory, data: Json| {
            Ok(Node::Group(factory.build_group(data)?))
        });
    }

    fn build_group(&self, data: Json) -> Result<Group, ConfigError> {
        let config: GroupConfig = serde_json::from_value(data)?;
        let mut group = Group::new(config.name)
            .with_title(config.title)
            .with_collapsed(config.collapsed);
        if config.is_multi {
            group = group.multi();
        }
        for node in self.build_many(config.fields)? {
            group.add(node)?;
        }
        group.set_prefix(&config.prefix)?;
        Ok(group)
    }

    /// Builds one node. Registered tags win; the shorthand input kinds
    /// (`text`, `email`, ...) fall back to `input` with a matching `type`
    /// attribute.
    pub fn build(&self, type_tag: &str, data: Json) -> Result<Node, ConfigError> {
        let data = if data.is_null() {
            Json::Object(Map::new())
        } else {
            data
        };
        let (constructor, data) = match self.types.get(type_tag) {
            Some(constructor) => (constructor, data),
            None if INPUT_KINDS.contains(&type_tag) => match self.types.get("input") {
                Some(constructor) => (constructor, with_input_type(data, type_tag)),
                None => return Err(ConfigError::UnknownType(type_tag.to_string())),
            },
            None => {
                tracing::warn!(field_type = %type_tag, "unknown field type");
                return Err(ConfigError::UnknownType(type_tag.to_string()));
            }
        };
        let node = constructor(self, data).map_err(|source| ConfigError::Construction {
            type_tag: type_tag.to_string(),
            source: Box::new(source),
        })?;
        tracing::debug!(field_type = %type_tag, name = node.name(), "built field");
        Ok(node)
    }

    /// Builds literal definitions and passes built nodes through, keeping
    /// order.
    pub fn build_many<E>(
        &self,
        entries: impl IntoIterator<Item = E>,
    ) -> Result<Vec<Node>, ConfigError>
    where
        E: Into<FieldEntry>,
    {
        entries
            .into_iter()
            .map(|entry| match entry.into() {
                FieldEntry::Built(node) => Ok(node),
                FieldEntry::Config(config) => {
                    let tag = config
                        .get("type")
                        .and_then(Json::as_str)
                        .ok_or(ConfigError::MissingType)?
                        .to_string();
                    self.build(&tag, config)
                }
            })
            .collect()
    }

    /// Binds submitted values onto `fields`.
    pub fn set_values(&self, fields: &mut [Node], values: &FormValues) -> Result<(), ConfigError> {
        bind_values(fields, values)
    }

    /// Fillable leaves of `fields`, groups flattened.
    pub fn fillable<'a>(&self, fields: &'a [Node]) -> Vec<&'a dyn Fillable> {
        let mut out = Vec::new();
        collect_fillable(fields, &mut out);
        out
    }

    pub fn fillable_mut<'a>(&self, fields: &'a mut [Node]) -> Vec<&'a mut dyn Fillable> {
        let mut out = Vec::new();
        collect_fillable_mut(fields, &mut out);
        out
    }

    pub fn text(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("text", data)
    }

    pub fn textarea(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("textarea", data)
    }

    pub fn select(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("select", data)
    }

    pub fn radio(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("radio", data)
    }

    pub fn checkbox(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("checkbox", data)
    }

    pub fn hidden(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("hidden", data)
    }

    pub fn file(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("file", data)
    }

    pub fn submit(&self, data: Json) -> Result<Node, ConfigError> {
        self.build("submit", data)
    }

    pub fn group(&self, title: &str, name: &str, fields: Vec<Json>) -> Result<Node, ConfigError> {
        self.build("group", json!({ "title": title, "name": name, "fields": fields }))
    }
}

impl Default for FieldFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a [`FieldConfig`] to a freshly constructed field.
pub fn fill(
    factory: &FieldFactory,
    base: &mut crate::fields::base::FieldBase,
    data: Json,
) -> Result<(), ConfigError> {
    let config: FieldConfig = serde_json::from_value(data)?;
    config.apply(base, factory.rule_registry())
}

fn with_input_type(mut data: Json, kind: &str) -> Json {
    if let Json::Object(map) = &mut data {
        let attributes = map
            .entry("attributes")
            .or_insert_with(|| Json::Object(Map::new()));
        if !attributes.is_object() {
            *attributes = Json::Object(Map::new());
        }
        if let Json::Object(attributes) = attributes {
            attributes.insert("type".into(), Json::String(kind.to_string()));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::{FieldEntry, FieldFactory, fill};
    use crate::core::value::{FormValues, Value};
    use crate::error::ConfigError;
    use crate::fields::custom::CustomField;
    use crate::fields::input::Input;
    use crate::fields::node::Node;
    use crate::fields::traits::Fillable;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unknown_type_is_rejected() {
        let factory = FieldFactory::new();
        assert!(matches!(
            factory.build("not_a_type", json!({})),
            Err(ConfigError::UnknownType(tag)) if tag == "not_a_type"
        ));
    }

    #[test]
    fn shorthand_tags_build_inputs() {
        let factory = FieldFactory::new();
        let node = factory.build("email", json!({"name": "mail"})).unwrap();
        let field = node.as_field().unwrap();
        assert_eq!(field.type_tag(), "input");
        assert_eq!(field.base().attribute("type"), Some("email"));

        let node = factory
            .build("password", json!({"name": "pw", "attributes": {"class": "wide"}}))
            .unwrap();
        let field = node.as_field().unwrap();
        assert_eq!(field.base().attribute("type"), Some("password"));
        assert_eq!(field.base().attribute("class"), Some("wide"));

        let node = factory.hidden(json!(null)).unwrap();
        assert_eq!(node.as_field().unwrap().base().attribute("type"), Some("hidden"));
    }

    #[test]
    fn builtin_types_pick_templates() {
        let factory = FieldFactory::new();
        for (tag, template) in [
            ("input", "fields/input"),
            ("textarea", "fields/textarea"),
            ("bool", "fields/boolean"),
            ("button", "fields/button"),
            ("select", "fields/select"),
            ("radio", "fields/radio"),
            ("checkbox", "fields/checkbox"),
        ] {
            let node = factory.build(tag, json!({"name": "f"})).unwrap();
            assert_eq!(node.as_field().unwrap().template(), template, "tag: {tag}");
        }
        let html = factory.build("html", json!({"value": "<hr>"})).unwrap();
        assert!(matches!(&html, Node::Html(block) if block.value() == "<hr>"));
    }

    #[test]
    fn selectable_reads_variants_and_value() {
        let factory = FieldFactory::new();
        let node = factory
            .select(json!({
                "name": "color",
                "value": "g",
                "variants": {"r": "Red", "g": "Green"},
            }))
            .unwrap();
        let select = node.as_field().unwrap().as_selectable().unwrap();
        assert_eq!(select.variants().len(), 2);
        assert_eq!(select.variants()[1].label, "Green");
        assert_eq!(select.value(), &Value::from("g"));
    }

    #[test]
    fn bad_data_is_wrapped_with_cause() {
        let factory = FieldFactory::new();
        let err = factory.build("text", json!({"name": ["not", "a", "string"]})).unwrap_err();
        match &err {
            ConfigError::Construction { type_tag, source } => {
                assert_eq!(type_tag, "text");
                assert!(matches!(source.as_ref(), ConfigError::Data(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = factory
            .build("text", json!({"validators": [{"rule": "nope"}]}))
            .unwrap_err();
        assert!(matches!(err.root_cause(), ConfigError::UnknownRule(_)));
    }

    #[test]
    fn unnamed_multi_group_fails_at_build() {
        let factory = FieldFactory::new();
        let err = factory
            .build("group", json!({"is_multi": true, "fields": [{"type": "text", "name": "a"}]}))
            .unwrap_err();
        assert!(matches!(err.root_cause(), ConfigError::UnnamedMultiGroup));
    }

    #[test]
    fn groups_build_nested_children() {
        let factory = FieldFactory::new();
        let node = factory
            .group(
                "Address",
                "address",
                vec![
                    json!({"type": "text", "name": "city"}),
                    json!({"type": "group", "name": "geo", "fields": [{"type": "number", "name": "lat"}]}),
                ],
            )
            .unwrap();
        let group = node.as_group().unwrap();
        assert_eq!(group.title(), "Address");
        let paths: Vec<String> = group.fields_array().iter().map(|f| f.dot_path()).collect();
        assert_eq!(paths, vec!["address.city", "address.geo.lat"]);
    }

    #[test]
    fn build_many_mixes_literals_and_built_nodes() {
        let factory = FieldFactory::new();
        let nodes = factory
            .build_many([
                FieldEntry::from(json!({"type": "text", "name": "a"})),
                FieldEntry::from(Node::field(Input::new("b"))),
            ])
            .unwrap();
        let names: Vec<&str> = nodes.iter().map(Node::name).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert!(matches!(
            factory.build_many([json!({"name": "no_type"})]),
            Err(ConfigError::MissingType)
        ));
    }

    #[test]
    fn custom_types_register_at_runtime() {
        let mut factory = FieldFactory::new();
        factory.register_type("filesystems::path", |factory: &FieldFactory, data| {
            let mut field = CustomField::new("", "filesystems::path", "filesystems::fields/path");
            fill(factory, field.base_mut(), data)?;
            Ok(Node::field(field))
        });
        let node = factory
            .build("filesystems::path", json!({"name": "root", "validators": [{"rule": "required"}]}))
            .unwrap();
        let field = node.as_field().unwrap();
        assert_eq!(field.template(), "filesystems::fields/path");
        assert_eq!(field.base().validators().len(), 1);
        assert!(factory.types().contains("filesystems::path"));
    }

    #[test]
    fn registered_tag_overrides_shorthand() {
        let mut factory = FieldFactory::new();
        factory.register_type("email", |_: &FieldFactory, _| {
            Ok(Node::field(CustomField::new("mail", "email", "fields/email")))
        });
        let node = factory.build("email", json!({})).unwrap();
        assert_eq!(node.as_field().unwrap().template(), "fields/email");
    }

    #[test]
    fn repeated_list_pairs_bind_to_checkbox() {
        let factory = FieldFactory::new();
        let mut nodes = factory
            .build_many([json!({"type": "checkbox", "name": "tags", "variants": ["a", "b", "c"]})])
            .unwrap();
        let values = FormValues::from_pairs([("tags[]", "a"), ("tags[]", "c")]);
        factory.set_values(&mut nodes, &values).unwrap();

        let checkbox = nodes[0].as_field().unwrap();
        assert_eq!(checkbox.value(), &Value::List(vec!["a".into(), "c".into()]));
        let selected: Vec<bool> = checkbox.serialize()["variants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|option| option["selected"] == true)
            .collect();
        assert_eq!(selected, vec![true, false, true]);
    }

    #[test]
    fn set_values_binds_by_dot_path() {
        let factory = FieldFactory::new();
        let mut nodes = factory
            .build_many([
                json!({"type": "text", "name": "name"}),
                json!({"type": "group", "name": "user", "fields": [{"type": "email", "name": "email"}]}),
                json!({"type": "checkbox", "name": "tags"}),
            ])
            .unwrap();
        factory
            .set_values(
                &mut nodes,
                &FormValues::from_json(json!({
                    "name": "Alice",
                    "user": {"email": "a@b.c"},
                    "tags": ["x", "y"],
                })),
            )
            .unwrap();
        let values: Vec<Value> = factory
            .fillable(&nodes)
            .iter()
            .map(|f| f.value().clone())
            .collect();
        assert_eq!(
            values,
            vec![
                Value::from("Alice"),
                Value::from("a@b.c"),
                Value::List(vec!["x".into(), "y".into()]),
            ]
        );
    }
}
