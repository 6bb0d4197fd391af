use thiserror::Error;

/// A submitted profile value outside its declared domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be one of {allowed}, got {value:?}")]
    UnknownChoice {
        field: &'static str,
        value: String,
        allowed: String,
    },
}

impl ProfileError {
    /// Name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::NotAnInteger { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownChoice { field, .. } => field,
        }
    }
}
