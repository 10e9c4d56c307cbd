use thiserror::Error;

/// Programmer or configuration mistakes. Raised immediately at the point of
/// misconfiguration; user input problems are reported through validation
/// errors instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("field type [{0}] not found")]
    UnknownType(String),

    #[error("field definition has no `type`")]
    MissingType,

    #[error("invalid method [{0}], only get, post")]
    InvalidMethod(String),

    #[error("invalid encoding type [{0}]")]
    InvalidEncoding(String),

    #[error("a multi-group requires a name")]
    UnnamedMultiGroup,

    #[error("validator rule [{0}] not found")]
    UnknownRule(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid field data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("invalid form definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("field with type [{type_tag}] cannot be created")]
    Construction {
        type_tag: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Innermost error, looking through construction wrappers.
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            Self::Construction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failure reported by the external template renderer.
#[derive(Error, Debug)]
#[error("template [{template}] failed to render")]
pub struct RenderError {
    pub template: String,
    #[source]
    pub source: crate::view::BoxError,
}
