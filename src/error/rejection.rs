use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use serde_json::{Value, json};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use super::AppError;

const VALIDATION_MESSAGE: &str = "Request validation failed";

/// One field-level violation in `details.errors`.
fn violation(loc: Vec<Value>, msg: impl Into<String>, kind: &str) -> Value {
    json!({ "loc": loc, "msg": msg.into(), "type": kind })
}

fn request_invalid(errors: Vec<Value>) -> AppError {
    AppError::validation(VALIDATION_MESSAGE).with_details(json!({ "errors": errors }))
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "value_error",
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body_error",
        };
        request_invalid(vec![violation(
            vec![json!("body")],
            rejection.body_text(),
            kind,
        )])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        request_invalid(vec![violation(
            vec![json!("query")],
            rejection.body_text(),
            "query_error",
        )])
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        request_invalid(vec![violation(
            vec![json!("path")],
            rejection.body_text(),
            "path_error",
        )])
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut flat = Vec::new();
        flatten(&errors, &mut Vec::new(), &mut flat);
        flat.sort_by_key(|entry| entry["loc"].to_string());
        request_invalid(flat)
    }
}

fn flatten(errors: &ValidationErrors, path: &mut Vec<Value>, out: &mut Vec<Value>) {
    for (field, kind) in errors.errors() {
        path.push(json!(field.to_string()));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(violation(path.clone(), describe(error), &error.code));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(nested, path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    path.push(json!(index));
                    flatten(nested, path, out);
                    path.pop();
                }
            }
        }
        path.pop();
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(Value::to_string);
    match (error.code.as_ref(), param("min"), param("max")) {
        ("length", Some(min), Some(max)) => format!("length must be between {min} and {max}"),
        ("length", Some(min), None) => format!("length must be at least {min}"),
        ("length", None, Some(max)) => format!("length must be at most {max}"),
        ("range", Some(min), Some(max)) => format!("value must be between {min} and {max}"),
        ("range", Some(min), None) => format!("value must be at least {min}"),
        ("range", None, Some(max)) => format!("value must be at most {max}"),
        (code, _, _) => format!("failed {code} check"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Inner {
        #[validate(range(min = 1, max = 5))]
        rating: i32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Outer {
        #[validate(length(min = 3))]
        name: String,
        #[validate(nested)]
        inner: Inner,
    }

    #[test]
    fn nested_violations_are_flattened_with_paths() {
        let input = Outer {
            name: "ab".to_string(),
            inner: Inner { rating: 9 },
        };
        let err = AppError::from(input.validate().expect_err("invalid"));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let errors = err.details()["errors"].as_array().expect("errors");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["loc"], json!(["inner", "rating"]));
        assert_eq!(errors[0]["type"], "range");
        assert_eq!(errors[1]["loc"], json!(["name"]));
        assert_eq!(errors[1]["msg"], "length must be at least 3");
    }
}
