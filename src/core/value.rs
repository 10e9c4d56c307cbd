use crate::core::dotted_path::{segments, to_dotted};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

/// A field value: absent, a single string, or an ordered list of strings
/// (multi-checkbox, multi-select).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    None,
    Text(String),
    List(Vec<String>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.trim().is_empty(),
            Self::List(v) => v.iter().all(|item| item.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Every string held by the value; empty for `None`.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::None => Vec::new(),
            Self::Text(v) => vec![v.as_str()],
            Self::List(v) => v.iter().map(String::as_str).collect(),
        }
    }

    /// Converts a submitted JSON value. Scalars become text, arrays and
    /// objects of scalars become lists, `null` becomes `None`.
    pub fn from_submitted(raw: &Json) -> Self {
        match raw {
            Json::Null => Self::None,
            Json::String(v) => Self::Text(v.clone()),
            Json::Bool(v) => Self::Text(if *v { "1" } else { "" }.to_string()),
            Json::Number(v) => Self::Text(v.to_string()),
            Json::Array(items) => Self::List(items.iter().filter_map(scalar_text).collect()),
            Json::Object(map) => Self::List(map.values().filter_map(scalar_text).collect()),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Self::None => Json::Null,
            Self::Text(v) => Json::String(v.clone()),
            Self::List(v) => Json::Array(v.iter().cloned().map(Json::String).collect()),
        }
    }
}

fn scalar_text(raw: &Json) -> Option<String> {
    match raw {
        Json::String(v) => Some(v.clone()),
        Json::Bool(v) => Some(if *v { "1" } else { "" }.to_string()),
        Json::Number(v) => Some(v.to_string()),
        _ => None,
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map(Self::Text).unwrap_or_default()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Json::deserialize(deserializer)?;
        Ok(Self::from_submitted(&raw))
    }
}

/// Submitted form values, kept as a nested tree and addressed by dot path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormValues {
    root: Map<String, Json>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON object. Any other JSON value yields an empty set.
    pub fn from_json(raw: Json) -> Self {
        match raw {
            Json::Object(root) => Self { root },
            _ => Self::default(),
        }
    }

    /// Builds the tree from flat, possibly bracket-named pairs:
    /// `("user[email]", "a@b.c")` nests under `user`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Json>,
    {
        let mut values = Self::default();
        for (key, value) in pairs {
            values.insert(key.as_ref(), value.into());
        }
        values
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Json> {
        &self.root
    }

    pub fn into_json(self) -> Json {
        Json::Object(self.root)
    }

    /// Stores `value` at the given bracket or dot name, creating
    /// intermediate objects as needed. A trailing `[]` (`tags[]`) appends to
    /// a list instead of overwriting.
    pub fn insert(&mut self, name: &str, value: Json) {
        let append = name.ends_with("[]");
        let path = to_dotted(name);
        let mut parts = segments(&path).peekable();
        let mut current = &mut self.root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                if append {
                    push_item(current.entry(part.to_string()).or_insert(Json::Null), value);
                } else {
                    current.insert(part.to_string(), value);
                }
                return;
            }
            let slot = current
                .entry(part.to_string())
                .or_insert_with(|| Json::Object(Map::new()));
            if !slot.is_object() {
                *slot = Json::Object(Map::new());
            }
            let Json::Object(next) = slot else {
                return;
            };
            current = next;
        }
    }

    /// Looks up a dot path. An exact top-level key wins over traversal.
    pub fn get(&self, dot_path: &str) -> Option<&Json> {
        if dot_path.is_empty() {
            return None;
        }
        if let Some(found) = self.root.get(dot_path) {
            return Some(found);
        }
        let mut parts = segments(dot_path);
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Json::Object(map) => map.get(part)?,
                Json::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn value(&self, dot_path: &str) -> Value {
        self.get(dot_path).map(Value::from_submitted).unwrap_or_default()
    }

    /// The sub-tree stored at `dot_path`, or an empty set when the path is
    /// missing or holds a scalar.
    pub fn subtree(&self, dot_path: &str) -> Self {
        match self.get(dot_path) {
            Some(Json::Object(map)) => Self { root: map.clone() },
            Some(Json::Array(items)) => Self {
                root: items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| (idx.to_string(), item.clone()))
                    .collect(),
            },
            _ => Self::default(),
        }
    }

    /// Re-roots `values` so that it lives at `dot_path`.
    pub fn nested_at(dot_path: &str, values: &FormValues) -> Self {
        let mut out = Self::default();
        if segments(dot_path).next().is_none() {
            return values.clone();
        }
        out.insert(dot_path, Json::Object(values.root.clone()));
        out
    }

    /// Top-level entries, used as the repetition map of a multi-group.
    pub fn entries(&self) -> impl Iterator<Item = (&str, FormValues)> {
        self.root.iter().map(|(key, raw)| {
            let values = match raw {
                Json::Object(map) => FormValues { root: map.clone() },
                _ => FormValues::default(),
            };
            (key.as_str(), values)
        })
    }
}

fn push_item(slot: &mut Json, value: Json) {
    if let Json::Array(items) = slot {
        items.push(value);
        return;
    }
    let previous = std::mem::take(slot);
    *slot = if previous.is_null() {
        Json::Array(vec![value])
    } else {
        Json::Array(vec![previous, value])
    };
}

impl From<Json> for FormValues {
    fn from(raw: Json) -> Self {
        Self::from_json(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormValues, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn submitted_scalars_become_text() {
        assert_eq!(Value::from_submitted(&json!("x")), Value::from("x"));
        assert_eq!(Value::from_submitted(&json!(42)), Value::from("42"));
        assert_eq!(Value::from_submitted(&json!(null)), Value::None);
        assert_eq!(
            Value::from_submitted(&json!(["a", 1])),
            Value::List(vec!["a".into(), "1".into()])
        );
    }

    #[test]
    fn emptiness_ignores_whitespace() {
        assert!(Value::None.is_empty());
        assert!(Value::from("  ").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::from("x").is_empty());
    }

    #[test]
    fn get_walks_nested_objects_and_arrays() {
        let values = FormValues::from_json(json!({
            "user": {"email": "a@b.c"},
            "rows": [{"path": "/tmp"}],
        }));
        assert_eq!(values.value("user.email"), Value::from("a@b.c"));
        assert_eq!(values.value("rows.0.path"), Value::from("/tmp"));
        assert_eq!(values.value("user.missing"), Value::None);
    }

    #[test]
    fn exact_key_beats_traversal() {
        let values = FormValues::from_json(json!({
            "a.b": "flat",
            "a": {"b": "nested"},
        }));
        assert_eq!(values.value("a.b"), Value::from("flat"));
    }

    #[test]
    fn pairs_nest_bracket_names() {
        let values = FormValues::from_pairs([("user[email]", "a@b.c"), ("user[name]", "Al")]);
        assert_eq!(
            values.into_json(),
            json!({"user": {"email": "a@b.c", "name": "Al"}})
        );
    }

    #[test]
    fn repeated_list_pairs_accumulate() {
        let values = FormValues::from_pairs([
            ("tags[]", "a"),
            ("tags[]", "b"),
            ("user[roles][]", "admin"),
            ("user[roles][]", "dev"),
        ]);
        assert_eq!(
            values.clone().into_json(),
            json!({"tags": ["a", "b"], "user": {"roles": ["admin", "dev"]}})
        );
        assert_eq!(values.value("tags"), Value::List(vec!["a".into(), "b".into()]));

        let mut values = FormValues::from_pairs([("tags", "x")]);
        values.insert("tags[]", json!("y"));
        assert_eq!(values.into_json(), json!({"tags": ["x", "y"]}));
    }

    #[test]
    fn object_lists_keep_submission_order() {
        assert_eq!(
            Value::from_submitted(&json!({"0": "a", "2": "c", "10": "k"})),
            Value::List(vec!["a".into(), "c".into(), "k".into()])
        );
        let values = FormValues::from_pairs((0..12).map(|idx| (format!("rows[{idx}]"), "v")));
        let keys: Vec<String> = values
            .subtree("rows")
            .entries()
            .map(|(key, _)| key.to_string())
            .collect();
        let expected: Vec<String> = (0..12).map(|idx| idx.to_string()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn subtree_and_nesting() {
        let values = FormValues::from_json(json!({"items": [{"title": "A"}, {"title": "B"}]}));
        let items = values.subtree("items");
        let keys: Vec<&str> = items.entries().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["0", "1"]);

        let row = FormValues::from_json(json!({"title": "B"}));
        let rooted = FormValues::nested_at("order.items.1", &row);
        assert_eq!(rooted.value("order.items.1.title"), Value::from("B"));
    }

    #[test]
    fn value_serializes_as_plain_json() {
        let list = Value::List(vec!["a".into()]);
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["a"]));
        let parsed: Value = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(parsed, Value::from("1"));
    }
}
