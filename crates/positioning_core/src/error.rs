/// Failures raised to callers of the engine.
///
/// Empty inputs and unknown store ids are not errors; only malformed records
/// or an unusable configuration are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to encode result: {message}")]
    Encoding { message: String },
}

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message }
            | Self::InvalidConfig { message }
            | Self::Encoding { message } => message,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
