//! Turns declarative `validator` constraints into a flat list of
//! `{field, message}` pairs that can be shipped inside an error envelope.

use validator::{Validate, ValidationErrors};

use crate::error::FieldError;

/// Runs every constraint declared on `value`.
///
/// # Errors
///
/// Returns one [`FieldError`] per failed constraint, ordered by field name.
pub fn check<T: Validate>(value: &T) -> Result<(), Vec<FieldError>> {
    value.validate().map_err(|errors| field_errors(&errors))
}

/// Flattens `validator`'s nested error map. Field names are reported in
/// camelCase to match the JSON payloads.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, failures) in errors.field_errors() {
        let name: &str = &field;
        let name = camel_case(name);
        for failure in failures {
            let message = failure
                .message
                .as_ref()
                .map_or_else(|| format!("{name} is invalid"), ToString::to_string);
            out.push(FieldError::new(name.clone(), message));
        }
    }
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
