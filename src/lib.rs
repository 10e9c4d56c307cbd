pub mod builder;
pub mod core;
pub mod error;
pub mod fields;
pub mod form;
pub mod validators;
pub mod view;

pub use builder::FieldFactory;
pub use builder::config::{FieldConfig, FormConfig, GroupConfig};
pub use crate::core::dotted_path;
pub use crate::core::validation::FormValidator;
pub use crate::core::value::{FormValues, Value};
pub use error::{ConfigError, RenderError};
pub use fields::{Fillable, Group, Html, Node};
pub use form::{Encoding, Form, Method};
pub use validators::{RuleConfig, RuleRegistry, ValidatorRule};
pub use view::{View, ViewRenderer};
