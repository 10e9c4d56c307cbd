use crate::fields::base::FieldBase;
use crate::fields::traits::Fillable;

/// Plain field for application-registered types that only need their own
/// tag and template, e.g. `filesystems::path`.
#[derive(Debug, Clone)]
pub struct CustomField {
    base: FieldBase,
    type_tag: String,
    template: String,
}

impl CustomField {
    pub fn new(
        name: impl Into<String>,
        type_tag: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            base: FieldBase::new(name),
            type_tag: type_tag.into(),
            template: template.into(),
        }
    }
}

impl Fillable for CustomField {
    fn base(&self) -> &FieldBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }

    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    fn template(&self) -> &str {
        &self.template
    }
}
