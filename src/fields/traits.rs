use crate::core::value::Value;
use crate::error::RenderError;
use crate::fields::base::FieldBase;
use crate::fields::selectable::Selectable;
use crate::validators::ValidatorRule;
use crate::view::View;
use serde_json::{Map, Value as Json};
use std::fmt;

// ---------------------------------------------------------------------------
// Fillable: value-holding leaves
// ---------------------------------------------------------------------------

pub trait Fillable: FillableClone + fmt::Debug + Send + Sync {
    fn base(&self) -> &FieldBase;
    fn base_mut(&mut self) -> &mut FieldBase;

    /// Tag the field was registered under (`input`, `select`, ...).
    fn type_tag(&self) -> &str;

    /// Template id used when the caller does not pick one.
    fn template(&self) -> &str;

    fn name(&self) -> &str {
        self.base().name()
    }

    fn full_name(&self) -> String {
        self.base().full_name()
    }

    fn dot_path(&self) -> String {
        self.base().dot_path()
    }

    fn set_prefix(&mut self, prefix: &str) {
        self.base_mut().set_prefix(prefix);
    }

    fn value(&self) -> &Value {
        self.base().value()
    }

    fn set_value(&mut self, value: Value) {
        self.base_mut().set_value(value);
    }

    fn add_validator_rule(&mut self, rule: Box<dyn ValidatorRule>) {
        self.base_mut().add_validator_rule(rule);
    }

    fn validate(&mut self, value: &Value) -> bool {
        self.base_mut().validate(value)
    }

    fn error(&self) -> Option<&str> {
        self.base().error()
    }

    fn as_selectable(&self) -> Option<&Selectable> {
        None
    }

    fn as_selectable_mut(&mut self) -> Option<&mut Selectable> {
        None
    }

    /// Variant-specific keys added to the snapshot.
    fn extend_snapshot(&self, _out: &mut Map<String, Json>) {}

    fn serialize(&self) -> Json {
        let mut out = self.base().snapshot();
        out.insert("type".into(), Json::String(self.type_tag().to_string()));
        out.insert("template".into(), Json::String(self.template().to_string()));
        self.extend_snapshot(&mut out);
        Json::Object(out)
    }

    fn render(&self, view: &View, template: Option<&str>) -> Result<String, RenderError> {
        view.render(self.template(), template, "field", self.serialize())
    }

    /// A copy with value and error cleared and every rule cloned, for reuse
    /// as a template (repeated groups, a second submission).
    fn fresh_clone(&self) -> Box<dyn Fillable> {
        let mut copy = self.box_clone();
        copy.base_mut().reset();
        copy
    }

    // --- builder helpers ---

    fn with_label(mut self, label: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_label(label);
        self
    }

    fn with_description(mut self, description: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_description(description);
        self
    }

    fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_placeholder(placeholder);
        self
    }

    fn with_value(mut self, value: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_value(value);
        self
    }

    fn with_default(mut self, default: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_default(default);
        self
    }

    fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_attribute(key, value);
        self
    }

    fn with_validator(mut self, rule: Box<dyn ValidatorRule>) -> Self
    where
        Self: Sized,
    {
        self.base_mut().add_validator_rule(rule);
        self
    }
}

pub trait FillableClone {
    fn box_clone(&self) -> Box<dyn Fillable>;
}

impl<T> FillableClone for T
where
    T: Fillable + Clone + 'static,
{
    fn box_clone(&self) -> Box<dyn Fillable> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Fillable> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
