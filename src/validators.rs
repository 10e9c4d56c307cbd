use crate::core::value::Value;
use crate::error::ConfigError;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json, json};
use std::fmt;
use std::sync::Arc;

pub type ValidationError = String;

/// A check attached to a field.
///
/// Rules hold only their own parameters. Each field owns its rules as boxes
/// and clones them with the field, so no two fields share a rule instance.
pub trait ValidatorRule: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, value: &Value) -> Result<(), ValidationError>;

    fn params(&self) -> Json {
        Json::Null
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule>;
}

impl Clone for Box<dyn ValidatorRule> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Runs every rule against `value`, collecting all failure messages in rule
/// order.
pub fn run_rules(rules: &[Box<dyn ValidatorRule>], value: &Value) -> Vec<ValidationError> {
    rules
        .iter()
        .filter_map(|rule| rule.check(value).err())
        .collect()
}

#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl ValidatorRule for Required {
    fn name(&self) -> &str {
        "required"
    }

    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule> {
        Box::new(self.clone())
    }
}

/// Length in characters for text, in items for lists.
fn measure(value: &Value) -> usize {
    match value {
        Value::None => 0,
        Value::Text(text) => text.chars().count(),
        Value::List(items) => items.len(),
    }
}

#[derive(Debug, Clone)]
pub struct MinLength {
    min: usize,
    message: String,
}

impl ValidatorRule for MinLength {
    fn name(&self) -> &str {
        "min_length"
    }

    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        if measure(value) < self.min {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn params(&self) -> Json {
        json!({ "min": self.min })
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct MaxLength {
    max: usize,
    message: String,
}

impl ValidatorRule for MaxLength {
    fn name(&self) -> &str {
        "max_length"
    }

    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        if measure(value) > self.max {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn params(&self) -> Json {
        json!({ "max": self.max })
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule> {
        Box::new(self.clone())
    }
}

/// Every item of the value must match. An absent value is checked as the
/// empty string.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: &'static str,
    regex: Regex,
    message: String,
}

impl ValidatorRule for Pattern {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let items = value.items();
        let matched = if items.is_empty() {
            self.regex.is_match("")
        } else {
            items.iter().all(|item| self.regex.is_match(item))
        };
        if matched {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn params(&self) -> Json {
        json!({ "pattern": self.regex.as_str() })
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct OneOf {
    allowed: Vec<String>,
    message: String,
}

impl ValidatorRule for OneOf {
    fn name(&self) -> &str {
        "one_of"
    }

    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        if value
            .items()
            .iter()
            .all(|item| self.allowed.iter().any(|allowed| allowed == item))
        {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn params(&self) -> Json {
        json!({ "allowed": self.allowed })
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule> {
        Box::new(self.clone())
    }
}

pub type CheckFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct FnRule {
    name: String,
    check: CheckFn,
    message: String,
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl ValidatorRule for FnRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        if (self.check)(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn box_clone(&self) -> Box<dyn ValidatorRule> {
        Box::new(self.clone())
    }
}

pub fn required() -> Box<dyn ValidatorRule> {
    required_msg("This field is required")
}

pub fn required_msg(message: impl Into<String>) -> Box<dyn ValidatorRule> {
    Box::new(Required {
        message: message.into(),
    })
}

pub fn min_length(min: usize) -> Box<dyn ValidatorRule> {
    min_length_msg(min, format!("Minimum length is {min}"))
}

pub fn min_length_msg(min: usize, message: impl Into<String>) -> Box<dyn ValidatorRule> {
    Box::new(MinLength {
        min,
        message: message.into(),
    })
}

pub fn max_length(max: usize) -> Box<dyn ValidatorRule> {
    max_length_msg(max, format!("Maximum length is {max}"))
}

pub fn max_length_msg(max: usize, message: impl Into<String>) -> Box<dyn ValidatorRule> {
    Box::new(MaxLength {
        max,
        message: message.into(),
    })
}

pub fn pattern(pattern: &str) -> Result<Box<dyn ValidatorRule>, ConfigError> {
    let regex = Regex::new(pattern)?;
    let message = format!("Value must match pattern: {}", regex.as_str());
    Ok(Box::new(Pattern {
        name: "pattern",
        regex,
        message,
    }))
}

pub fn pattern_msg(
    pattern: &str,
    message: impl Into<String>,
) -> Result<Box<dyn ValidatorRule>, ConfigError> {
    Ok(Box::new(Pattern {
        name: "pattern",
        regex: Regex::new(pattern)?,
        message: message.into(),
    }))
}

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

pub fn email() -> Result<Box<dyn ValidatorRule>, ConfigError> {
    email_msg("Invalid email address")
}

pub fn email_msg(message: impl Into<String>) -> Result<Box<dyn ValidatorRule>, ConfigError> {
    Ok(Box::new(Pattern {
        name: "email",
        regex: Regex::new(EMAIL_PATTERN)?,
        message: message.into(),
    }))
}

pub fn one_of(allowed: Vec<String>, message: impl Into<String>) -> Box<dyn ValidatorRule> {
    Box::new(OneOf {
        allowed,
        message: message.into(),
    })
}

pub fn from_fn<F>(
    name: impl Into<String>,
    check: F,
    message: impl Into<String>,
) -> Box<dyn ValidatorRule>
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Box::new(FnRule {
        name: name.into(),
        check: Arc::new(check),
        message: message.into(),
    })
}

/// A validator entry in a field definition:
/// `{ rule: min_length, min: 3, message: "Too short" }`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleConfig {
    pub rule: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub params: Map<String, Json>,
}

impl RuleConfig {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: None,
            params: Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    fn param<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let raw = self.params.get(key).cloned().unwrap_or(Json::Null);
        Ok(serde_json::from_value(raw)?)
    }
}

pub type RuleConstructor =
    Arc<dyn Fn(&RuleConfig) -> Result<Box<dyn ValidatorRule>, ConfigError> + Send + Sync>;

/// Maps rule tags from form definitions to rule constructors.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: IndexMap<String, RuleConstructor>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("required", |cfg: &RuleConfig| {
            Ok(match &cfg.message {
                Some(message) => required_msg(message.clone()),
                None => required(),
            })
        });
        registry.register("min_length", |cfg: &RuleConfig| {
            let min: usize = cfg.param("min")?;
            Ok(match &cfg.message {
                Some(message) => min_length_msg(min, message.clone()),
                None => min_length(min),
            })
        });
        registry.register("max_length", |cfg: &RuleConfig| {
            let max: usize = cfg.param("max")?;
            Ok(match &cfg.message {
                Some(message) => max_length_msg(max, message.clone()),
                None => max_length(max),
            })
        });
        registry.register("pattern", |cfg: &RuleConfig| {
            let raw: String = cfg.param("pattern")?;
            match &cfg.message {
                Some(message) => pattern_msg(&raw, message.clone()),
                None => pattern(&raw),
            }
        });
        registry.register("email", |cfg: &RuleConfig| match &cfg.message {
            Some(message) => email_msg(message.clone()),
            None => email(),
        });
        registry.register("one_of", |cfg: &RuleConfig| {
            let allowed: Vec<String> = cfg.param("allowed")?;
            let message = cfg
                .message
                .clone()
                .unwrap_or_else(|| "Value is not one of the allowed options".to_string());
            Ok(one_of(allowed, message))
        });
        registry
    }

    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&RuleConfig) -> Result<Box<dyn ValidatorRule>, ConfigError> + Send + Sync + 'static,
    {
        let tag = tag.into();
        tracing::debug!(rule = %tag, "registered validator rule");
        self.rules.insert(tag, Arc::new(constructor));
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.rules.contains_key(tag)
    }

    pub fn build(&self, config: &RuleConfig) -> Result<Box<dyn ValidatorRule>, ConfigError> {
        let Some(constructor) = self.rules.get(config.rule.as_str()) else {
            return Err(ConfigError::UnknownRule(config.rule.clone()));
        };
        constructor(config)
    }

    pub fn build_all(
        &self,
        configs: &[RuleConfig],
    ) -> Result<Vec<Box<dyn ValidatorRule>>, ConfigError> {
        configs.iter().map(|config| self.build(config)).collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_rejects_blank() {
        let rule = required();
        assert!(rule.check(&Value::None).is_err());
        assert!(rule.check(&Value::from("  ")).is_err());
        assert!(rule.check(&Value::from("x")).is_ok());
    }

    #[test]
    fn length_rules_count_chars_and_items() {
        assert!(min_length(3).check(&Value::from("ab")).is_err());
        assert!(min_length(3).check(&Value::from("äöü")).is_ok());
        assert!(max_length(1).check(&Value::List(vec!["a".into(), "b".into()])).is_err());
    }

    #[test]
    fn email_checks_format() {
        let rule = email().unwrap();
        assert!(rule.check(&Value::from("a@example.com")).is_ok());
        assert!(rule.check(&Value::from("nope")).is_err());
        assert!(rule.check(&Value::None).is_err());
    }

    #[test]
    fn run_rules_collects_every_failure() {
        let rules = vec![required_msg("required"), min_length_msg(3, "too short")];
        assert_eq!(run_rules(&rules, &Value::from("")), vec!["required", "too short"]);
        assert!(run_rules(&rules, &Value::from("abcd")).is_empty());
    }

    #[test]
    fn cloned_rule_is_a_distinct_instance() {
        let rule = required();
        let copy = rule.clone();
        assert!(!std::ptr::eq(
            rule.as_ref() as *const dyn ValidatorRule as *const u8,
            copy.as_ref() as *const dyn ValidatorRule as *const u8,
        ));
        assert_eq!(copy.name(), "required");
    }

    #[test]
    fn registry_builds_from_config() {
        let registry = RuleRegistry::new();
        let config: RuleConfig =
            serde_json::from_value(json!({"rule": "min_length", "min": 2, "message": "short"}))
                .unwrap();
        let rule = registry.build(&config).unwrap();
        assert_eq!(rule.check(&Value::from("a")), Err("short".to_string()));
        assert_eq!(rule.params(), json!({"min": 2}));
    }

    #[test]
    fn registry_rejects_unknown_and_bad_params() {
        let registry = RuleRegistry::new();
        assert!(matches!(
            registry.build(&RuleConfig::new("nope")),
            Err(ConfigError::UnknownRule(tag)) if tag == "nope"
        ));
        assert!(matches!(
            registry.build(&RuleConfig::new("pattern").with_param("pattern", "(")),
            Err(ConfigError::InvalidPattern(_))
        ));
        assert!(matches!(
            registry.build(&RuleConfig::new("min_length")),
            Err(ConfigError::Data(_))
        ));
    }

    #[test]
    fn custom_rules_register_at_runtime() {
        let mut registry = RuleRegistry::empty();
        registry.register("even", |cfg: &RuleConfig| {
            Ok(from_fn(
                "even",
                |value: &Value| {
                    value
                        .as_text()
                        .and_then(|v| v.parse::<i64>().ok())
                        .is_some_and(|n| n % 2 == 0)
                },
                cfg.message.clone().unwrap_or_else(|| "must be even".into()),
            ))
        });
        let rule = registry.build(&RuleConfig::new("even")).unwrap();
        assert!(rule.check(&Value::from("4")).is_ok());
        assert_eq!(rule.check(&Value::from("3")), Err("must be even".to_string()));
    }
}
