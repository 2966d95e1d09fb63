use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Media type of every error payload
pub const PROBLEM_JSON: &str = "application/problem+json";

/// RFC 7807 problem payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,

    /// Field name to messages; only present on validation problems
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ProblemDetails {
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            problem_type: "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.4".to_string(),
            title: "Resource not found".to_string(),
            status: 404,
            detail: detail.into(),
            errors: None,
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self {
            problem_type: "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.3".to_string(),
            title: "The action was forbidden".to_string(),
            status: 403,
            detail: detail.into(),
            errors: None,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            problem_type: "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.1".to_string(),
            title: "The request was invalid format".to_string(),
            status: 400,
            detail: detail.into(),
            errors: None,
        }
    }

    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        Self {
            problem_type: "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.11".to_string(),
            title: "Payload Too Large".to_string(),
            status: 413,
            detail: detail.into(),
            errors: None,
        }
    }

    pub fn validation(detail: impl Into<String>, errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::bad_request(detail)
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            problem_type: "https://datatracker.ietf.org/doc/html/rfc7231#section-6.6.1".to_string(),
            title: "Internal Server Error".to_string(),
            status: 500,
            detail: detail.into(),
            errors: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_serializes_type_and_omits_empty_errors() {
        let json = serde_json::to_value(ProblemDetails::not_found("Product was not found")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.4",
                "title": "Resource not found",
                "status": 404,
                "detail": "Product was not found"
            })
        );
    }

    #[test]
    fn test_validation_problem_carries_field_errors() {
        let mut errors = BTreeMap::new();
        errors.insert("price".to_string(), vec!["Price must be greater than 0.".to_string()]);

        let json = serde_json::to_value(ProblemDetails::validation("The request is invalid", errors))
            .unwrap();

        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"]["price"][0], "Price must be greater than 0.");
    }
}
