use crate::core::dotted_path::{full_name, to_dotted};
use crate::core::value::FormValues;
use crate::error::{ConfigError, RenderError};
use crate::fields::node::{Node, bind_values, collect_fillable, collect_fillable_mut};
use crate::fields::traits::Fillable;
use crate::view::View;
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

pub const GROUP_TEMPLATE: &str = "fields/group";

/// Ordered set of fields and nested groups under one name.
///
/// A multi-group is a repeatable template: its `fields` are never filled
/// directly. Each repetition is an independent sub-group, named by its index
/// (`"0"`, `"1"`, ...), built from fresh clones of the template fields.
#[derive(Debug, Clone, Default)]
pub struct Group {
    name: String,
    prefix: String,
    title: String,
    collapsed: bool,
    is_multi: bool,
    fields: Vec<Node>,
    sub_groups: IndexMap<String, Group>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Marks the group repeatable. Sub-groups appear once a prefix is
    /// assigned or values are bound.
    pub fn multi(mut self) -> Self {
        self.is_multi = true;
        self
    }

    pub fn with_field(mut self, node: impl Into<Node>) -> Result<Self, ConfigError> {
        self.add(node)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_multi(&self) -> bool {
        self.is_multi
    }

    pub fn fields(&self) -> &[Node] {
        &self.fields
    }

    pub fn sub_groups(&self) -> Option<&IndexMap<String, Group>> {
        self.is_multi.then_some(&self.sub_groups)
    }

    pub fn sub_group(&self, index: &str) -> Option<&Group> {
        self.sub_groups.get(index)
    }

    pub fn sub_group_mut(&mut self, index: &str) -> Option<&mut Group> {
        self.sub_groups.get_mut(index)
    }

    /// Drops every repetition.
    pub fn clear_sub_groups(&mut self) {
        self.sub_groups.clear();
    }

    pub fn full_name(&self) -> String {
        full_name(&self.prefix, &self.name)
    }

    pub fn dot_path(&self) -> String {
        to_dotted(&self.full_name())
    }

    /// Reassigns the prefix and cascades the new full name to every child.
    /// A multi-group also re-prefixes its repetitions and rebuilds
    /// repetition `"0"` from the template.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<&mut Self, ConfigError> {
        if self.is_multi && self.name.is_empty() {
            return Err(ConfigError::UnnamedMultiGroup);
        }
        self.prefix = prefix.to_string();
        let own = self.full_name();
        for child in &mut self.fields {
            child.set_prefix(&own)?;
        }
        if self.is_multi {
            for sub in self.sub_groups.values_mut() {
                sub.set_prefix(&own)?;
            }
            let first = self.create_sub_group("0", &FormValues::new())?;
            self.sub_groups.insert("0".to_string(), first);
        }
        Ok(self)
    }

    /// Appends a child under this group's full name. On a multi-group the
    /// child also joins every existing repetition as a fresh clone.
    pub fn add(&mut self, node: impl Into<Node>) -> Result<&mut Self, ConfigError> {
        let mut node = node.into();
        let own = self.full_name();
        node.set_prefix(&own)?;
        for sub in self.sub_groups.values_mut() {
            sub.add(node.fresh_clone())?;
        }
        self.fields.push(node);
        Ok(self)
    }

    /// Binds the full submitted mapping.
    ///
    /// A plain group hands it to its children, which look up their own dot
    /// paths. A multi-group takes the entry at its own dot path as the
    /// repetition map (see [`Group::set_repetitions`]).
    pub fn set_value(&mut self, values: &FormValues) -> Result<&mut Self, ConfigError> {
        if self.is_multi {
            let repetitions = values.subtree(&self.dot_path());
            self.set_repetitions(&repetitions)?;
        } else {
            bind_values(&mut self.fields, values)?;
        }
        Ok(self)
    }

    /// Builds one repetition per entry of `repetitions` (index -> values
    /// relative to that repetition). A repetition already present at an
    /// index is replaced. Indices missing from `repetitions` are kept.
    pub fn set_repetitions(&mut self, repetitions: &FormValues) -> Result<&mut Self, ConfigError> {
        for (index, values) in repetitions.entries() {
            let sub = self.create_sub_group(index, &values)?;
            self.sub_groups.insert(index.to_string(), sub);
        }
        Ok(self)
    }

    fn create_sub_group(&self, index: &str, values: &FormValues) -> Result<Group, ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::UnnamedMultiGroup);
        }
        let mut sub = Group {
            name: index.to_string(),
            prefix: self.full_name(),
            title: self.title.clone(),
            ..Group::default()
        };
        for template in &self.fields {
            sub.add(template.fresh_clone())?;
        }
        let rooted = FormValues::nested_at(&sub.dot_path(), values);
        sub.set_value(&rooted)?;
        tracing::debug!(group = %self.dot_path(), index, "materialized sub-group");
        Ok(sub)
    }

    /// Fillable leaves: nested groups are replaced by their leaves, and a
    /// multi-group yields the leaves of each repetition in index order.
    pub fn fields_array(&self) -> Vec<&dyn Fillable> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    pub fn fields_array_mut(&mut self) -> Vec<&mut dyn Fillable> {
        let mut out = Vec::new();
        self.collect_leaves_mut(&mut out);
        out
    }

    pub(crate) fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a dyn Fillable>) {
        if self.is_multi {
            for sub in self.sub_groups.values() {
                sub.collect_leaves(out);
            }
        } else {
            collect_fillable(&self.fields, out);
        }
    }

    pub(crate) fn collect_leaves_mut<'a>(&'a mut self, out: &mut Vec<&'a mut dyn Fillable>) {
        if self.is_multi {
            for sub in self.sub_groups.values_mut() {
                sub.collect_leaves_mut(out);
            }
        } else {
            collect_fillable_mut(&mut self.fields, out);
        }
    }

    /// Deep copy with every value and error cleared, repetitions included.
    pub fn fresh_clone(&self) -> Group {
        Group {
            name: self.name.clone(),
            prefix: self.prefix.clone(),
            title: self.title.clone(),
            collapsed: self.collapsed,
            is_multi: self.is_multi,
            fields: self.fields.iter().map(Node::fresh_clone).collect(),
            sub_groups: self
                .sub_groups
                .iter()
                .map(|(index, sub)| (index.clone(), sub.fresh_clone()))
                .collect(),
        }
    }

    pub fn serialize(&self) -> Json {
        let mut out = Map::new();
        out.insert("type".into(), Json::String("group".into()));
        out.insert("template".into(), Json::String(GROUP_TEMPLATE.into()));
        out.insert("name".into(), Json::String(self.name.clone()));
        out.insert("prefix".into(), Json::String(self.prefix.clone()));
        out.insert("full_name".into(), Json::String(self.full_name()));
        out.insert("dot_path".into(), Json::String(self.dot_path()));
        out.insert("title".into(), Json::String(self.title.clone()));
        out.insert("collapsed".into(), Json::Bool(self.collapsed));
        out.insert("is_multi".into(), Json::Bool(self.is_multi));
        out.insert(
            "fields".into(),
            Json::Array(self.fields.iter().map(Node::serialize).collect()),
        );
        let sub_groups = if self.is_multi {
            Json::Object(
                self.sub_groups
                    .iter()
                    .map(|(index, sub)| (index.clone(), sub.serialize()))
                    .collect(),
            )
        } else {
            Json::Null
        };
        out.insert("sub_groups".into(), sub_groups);
        Json::Object(out)
    }

    pub fn render(&self, view: &View, template: Option<&str>) -> Result<String, RenderError> {
        view.render(GROUP_TEMPLATE, template, "group", self.serialize())
    }
}
