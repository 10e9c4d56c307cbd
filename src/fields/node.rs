use crate::core::value::FormValues;
use crate::error::{ConfigError, RenderError};
use crate::fields::group::Group;
use crate::fields::html::Html;
use crate::fields::traits::Fillable;
use crate::view::View;
use serde_json::Value as Json;

/// One element of a form tree.
#[derive(Debug, Clone)]
pub enum Node {
    Field(Box<dyn Fillable>),
    Html(Html),
    Group(Group),
}

impl Node {
    pub fn field(field: impl Fillable + 'static) -> Self {
        Self::Field(Box::new(field))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Field(field) => field.name(),
            Self::Html(html) => html.name(),
            Self::Group(group) => group.name(),
        }
    }

    pub fn type_tag(&self) -> &str {
        match self {
            Self::Field(field) => field.type_tag(),
            Self::Html(_) => "html",
            Self::Group(_) => "group",
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Self::Field(field) => field.full_name(),
            Self::Html(html) => html.full_name(),
            Self::Group(group) => group.full_name(),
        }
    }

    pub fn dot_path(&self) -> String {
        crate::core::dotted_path::to_dotted(&self.full_name())
    }

    /// Fails only for an unnamed multi-group.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<(), ConfigError> {
        match self {
            Self::Field(field) => field.set_prefix(prefix),
            Self::Html(html) => html.set_prefix(prefix),
            Self::Group(group) => {
                group.set_prefix(prefix)?;
            }
        }
        Ok(())
    }

    pub fn is_fillable(&self) -> bool {
        matches!(self, Self::Field(_))
    }

    pub fn as_field(&self) -> Option<&dyn Fillable> {
        match self {
            Self::Field(field) => Some(field.as_ref()),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut dyn Fillable> {
        match self {
            Self::Field(field) => Some(field.as_mut()),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn serialize(&self) -> Json {
        match self {
            Self::Field(field) => field.serialize(),
            Self::Html(html) => html.serialize(),
            Self::Group(group) => group.serialize(),
        }
    }

    pub fn render(&self, view: &View, template: Option<&str>) -> Result<String, RenderError> {
        match self {
            Self::Field(field) => field.render(view, template),
            Self::Html(html) => Ok(html.render()),
            Self::Group(group) => group.render(view, template),
        }
    }

    /// Deep copy with values and errors cleared.
    pub fn fresh_clone(&self) -> Self {
        match self {
            Self::Field(field) => Self::Field(field.fresh_clone()),
            Self::Html(html) => Self::Html(html.clone()),
            Self::Group(group) => Self::Group(group.fresh_clone()),
        }
    }
}

impl From<Box<dyn Fillable>> for Node {
    fn from(field: Box<dyn Fillable>) -> Self {
        Self::Field(field)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Html> for Node {
    fn from(html: Html) -> Self {
        Self::Html(html)
    }
}

// ---------------------------------------------------------------------------
// Tree walks
// ---------------------------------------------------------------------------

/// Fillable leaves in tree order. Groups are replaced by their own leaves;
/// multi-groups contribute the leaves of their repetitions.
pub fn collect_fillable<'a>(nodes: &'a [Node], out: &mut Vec<&'a dyn Fillable>) {
    for node in nodes {
        match node {
            Node::Field(field) => out.push(field.as_ref()),
            Node::Group(group) => group.collect_leaves(out),
            Node::Html(_) => {}
        }
    }
}

pub fn collect_fillable_mut<'a>(nodes: &'a mut [Node], out: &mut Vec<&'a mut dyn Fillable>) {
    for node in nodes {
        match node {
            Node::Field(field) => out.push(field.as_mut()),
            Node::Group(group) => group.collect_leaves_mut(out),
            Node::Html(_) => {}
        }
    }
}

/// Binds submitted values onto `nodes`: fillable fields by their dot path,
/// groups through [`Group::set_value`] with the whole mapping.
pub fn bind_values(nodes: &mut [Node], values: &FormValues) -> Result<(), ConfigError> {
    for node in nodes {
        match node {
            Node::Field(field) => {
                let path = field.dot_path();
                let value = values.value(&path);
                tracing::trace!(path = %path, ?value, "binding value");
                field.set_value(value);
            }
            Node::Group(group) => {
                group.set_value(values)?;
            }
            Node::Html(_) => {}
        }
    }
    Ok(())
}
