use serde::Serialize;

/// A single violated rule. Collected in rule order; a failing submission
/// reports every violation at once rather than stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Uniform result envelope for every validated repository operation.
/// Exactly one of the two shapes is ever produced:
///   `{success: true,  validation: [],    data: <entity>}`
///   `{success: false, validation: [...], data: null}`
#[derive(Debug, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub validation: Vec<FieldError>,
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            validation: Vec::new(),
            data: Some(data),
        }
    }

    pub fn invalid(validation: Vec<FieldError>) -> Self {
        Self {
            success: false,
            validation,
            data: None,
        }
    }
}
