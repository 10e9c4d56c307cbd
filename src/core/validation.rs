use crate::core::value::FormValues;
use crate::fields::node::{Node, collect_fillable_mut};
use crate::fields::traits::Fillable;
use indexmap::IndexMap;

/// Validates a field tree against one submission and collects the errors
/// keyed by dot path.
pub struct FormValidator<'a> {
    fields: &'a mut [Node],
    values: FormValues,
    errors: IndexMap<String, String>,
}

impl<'a> FormValidator<'a> {
    pub fn new(fields: &'a mut [Node], values: FormValues) -> Self {
        Self {
            fields,
            values,
            errors: IndexMap::new(),
        }
    }

    pub fn set_values(&mut self, values: FormValues) -> &mut Self {
        self.values = values;
        self
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Runs every leaf's rules against its submitted value. Leaves sharing a
    /// dot path collapse to the last one. Errors from a previous call are
    /// dropped first.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();

        let mut leaves = Vec::new();
        collect_fillable_mut(&mut *self.fields, &mut leaves);
        let mut by_path: IndexMap<String, &mut dyn Fillable> = IndexMap::new();
        for leaf in leaves {
            by_path.insert(leaf.dot_path(), leaf);
        }

        for (path, field) in by_path {
            let value = self.values.value(&path);
            if !field.validate(&value) {
                let message = field.error().unwrap_or_default().to_string();
                self.errors.insert(path, message);
            }
        }

        tracing::debug!(errors = self.errors.len(), "validated form");
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    pub fn into_errors(self) -> IndexMap<String, String> {
        self.errors
    }
}
