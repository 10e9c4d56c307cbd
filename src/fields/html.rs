use crate::core::dotted_path::{full_name, to_dotted};
use serde_json::{Value as Json, json};

/// Static markup block. Read-only: it takes no submitted value and has no
/// validators.
#[derive(Debug, Clone, Default)]
pub struct Html {
    name: String,
    prefix: String,
    value: String,
}

impl Html {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_string();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The markup itself; no template is involved.
    pub fn render(&self) -> String {
        self.value.clone()
    }

    pub fn full_name(&self) -> String {
        full_name(&self.prefix, &self.name)
    }

    /// `template` is always null: the block renders itself.
    pub fn serialize(&self) -> Json {
        let full_name = self.full_name();
        json!({
            "type": "html",
            "template": null,
            "name": self.name,
            "prefix": self.prefix,
            "full_name": full_name,
            "dot_path": to_dotted(&full_name),
            "value": self.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Html;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn snapshot_matches_other_nodes() {
        let mut html = Html::new("<hr>").with_name("divider");
        html.set_prefix("user");
        assert_eq!(
            html.serialize(),
            json!({
                "type": "html",
                "template": null,
                "name": "divider",
                "prefix": "user",
                "full_name": "user[divider]",
                "dot_path": "user.divider",
                "value": "<hr>",
            })
        );
        assert_eq!(html.render(), "<hr>");
    }
}
