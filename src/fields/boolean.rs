use crate::core::value::Value;
use crate::fields::base::FieldBase;
use crate::fields::traits::Fillable;

/// Single on/off toggle.
#[derive(Debug, Clone)]
pub struct Boolean {
    base: FieldBase,
}

impl Boolean {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldBase::new(name),
        }
    }

    pub fn is_checked(&self) -> bool {
        match self.base.value() {
            Value::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ),
            _ => false,
        }
    }
}

impl Fillable for Boolean {
    fn base(&self) -> &FieldBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }

    fn type_tag(&self) -> &str {
        "bool"
    }

    fn template(&self) -> &str {
        "fields/boolean"
    }

    fn extend_snapshot(&self, out: &mut serde_json::Map<String, serde_json::Value>) {
        out.insert("checked".into(), self.is_checked().into());
    }
}
