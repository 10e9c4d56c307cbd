use crate::fields::base::FieldBase;
use crate::fields::traits::Fillable;

pub const INPUT_TEMPLATE: &str = "fields/input";

/// Tags that resolve to [`Input`] with the tag as its `type` attribute.
pub const INPUT_KINDS: &[&str] = &[
    "text", "hidden", "file", "number", "submit", "password", "url", "date", "email",
];

/// Generic `<input>`; the `type` attribute defaults to `text`.
#[derive(Debug, Clone)]
pub struct Input {
    base: FieldBase,
}

impl Input {
    pub fn new(name: impl Into<String>) -> Self {
        let mut base = FieldBase::new(name);
        base.set_attribute("type", "text");
        Self { base }
    }

    pub fn typed(name: impl Into<String>, kind: &str) -> Self {
        let mut input = Self::new(name);
        input.base.set_attribute("type", kind);
        input
    }

    pub fn input_type(&self) -> &str {
        self.base.attribute("type").unwrap_or("text")
    }
}

impl Fillable for Input {
    fn base(&self) -> &FieldBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }

    fn type_tag(&self) -> &str {
        "input"
    }

    fn template(&self) -> &str {
        INPUT_TEMPLATE
    }
}
