use thiserror::Error;

#[derive(Debug, Error)]
pub enum VastgoedError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: String, value: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for VastgoedError {
    fn from(e: serde_json::Error) -> Self {
        VastgoedError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_message() {
        let err = VastgoedError::UnknownVariant {
            kind: "property type".into(),
            value: "castle".into(),
        };
        assert_eq!(err.to_string(), "Unknown property type: 'castle'");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = VastgoedError::InvalidInput {
            field: "--input".into(),
            reason: "required".into(),
        };
        assert_eq!(err.to_string(), "Invalid input: --input: required");
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: VastgoedError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
