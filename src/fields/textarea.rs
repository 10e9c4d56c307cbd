use crate::fields::base::FieldBase;
use crate::fields::traits::Fillable;

#[derive(Debug, Clone)]
pub struct Textarea {
    base: FieldBase,
}

impl Textarea {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: FieldBase::new(name),
        }
    }
}

impl Fillable for Textarea {
    fn base(&self) -> &FieldBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }

    fn type_tag(&self) -> &str {
        "textarea"
    }

    fn template(&self) -> &str {
        "fields/textarea"
    }
}
