use crate::error::RenderError;
use serde_json::Value as Json;
use std::sync::Arc;

pub const DEFAULT_TEMPLATES_PACKAGE: &str = "ui_form";
pub const NAMESPACE_SEPARATOR: &str = "::";

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// External template engine. The output is opaque markup.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Json) -> Result<String, BoxError>;
}

impl<F> ViewRenderer for F
where
    F: Fn(&str, &Json) -> Result<String, BoxError> + Send + Sync,
{
    fn render(&self, template: &str, context: &Json) -> Result<String, BoxError> {
        self(template, context)
    }
}

/// A renderer plus the package id used to namespace bare template names.
#[derive(Clone)]
pub struct View {
    renderer: Arc<dyn ViewRenderer>,
    templates_package: String,
}

impl View {
    pub fn new(renderer: impl ViewRenderer + 'static) -> Self {
        Self {
            renderer: Arc::new(renderer),
            templates_package: DEFAULT_TEMPLATES_PACKAGE.to_string(),
        }
    }

    pub fn with_templates_package(mut self, package: impl Into<String>) -> Self {
        self.templates_package = package.into();
        self
    }

    pub fn templates_package(&self) -> &str {
        &self.templates_package
    }

    /// `requested` wins over the element's own template; either is prefixed
    /// with `package::` unless it already names a namespace.
    pub fn resolve_template(&self, own: &str, requested: Option<&str>) -> String {
        let template = requested.filter(|t| !t.is_empty()).unwrap_or(own);
        if template.contains(NAMESPACE_SEPARATOR) {
            template.to_string()
        } else {
            format!("{}{}{}", self.templates_package, NAMESPACE_SEPARATOR, template)
        }
    }

    /// Renders `snapshot` under `key` (`field`, `group` or `form`).
    pub fn render(
        &self,
        own: &str,
        requested: Option<&str>,
        key: &str,
        snapshot: Json,
    ) -> Result<String, RenderError> {
        let template = self.resolve_template(own, requested);
        let mut context = serde_json::Map::new();
        context.insert(key.to_string(), snapshot);
        tracing::trace!(template = %template, key, "rendering");
        self.renderer
            .render(&template, &Json::Object(context))
            .map_err(|source| RenderError { template, source })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{BoxError, View};
    use serde_json::Value as Json;

    /// Echoes the template id and the context keys.
    pub(crate) fn echo_view() -> View {
        View::new(|template: &str, context: &Json| -> Result<String, BoxError> {
            let keys: Vec<&str> = context
                .as_object()
                .map(|map| map.keys().map(String::as_str).collect())
                .unwrap_or_default();
            Ok(format!("{template}|{}", keys.join(",")))
        })
    }

    #[test]
    fn bare_templates_are_namespaced() {
        let view = echo_view();
        assert_eq!(view.resolve_template("fields/input", None), "ui_form::fields/input");
        assert_eq!(
            view.resolve_template("fields/input", Some("admin::wide")),
            "admin::wide"
        );
        assert_eq!(
            view.clone()
                .with_templates_package("admin")
                .resolve_template("fields/input", Some("")),
            "admin::fields/input"
        );
    }

    #[test]
    fn render_wraps_snapshot_under_key() {
        let out = echo_view()
            .render("fields/group", None, "group", Json::Null)
            .unwrap();
        assert_eq!(out, "ui_form::fields/group|group");
    }

    #[test]
    fn renderer_failures_carry_template() {
        let view = View::new(|_: &str, _: &Json| -> Result<String, BoxError> {
            Err("missing".into())
        });
        let err = view.render("x", None, "field", Json::Null).unwrap_err();
        assert_eq!(err.template, "ui_form::x");
        assert_eq!(err.source.to_string(), "missing");
    }
}
