use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::shared::types::FieldErrors;

lazy_static! {
    /// Regex for Indian vehicle registration numbers (after normalisation)
    /// - Valid: "KL13AB1234", "KL32G1234", "DL1C1", "TN09BAB1"
    /// - Invalid: "kl13ab1234", "K13AB1234", "KL13AB12345", "KL-13-AB-1234"
    pub static ref VEHICLE_NUMBER_REGEX: Regex =
        Regex::new(r"^[A-Z]{2}[0-9]{1,2}[A-Z]{0,3}[0-9]{1,4}$").unwrap();

    /// Regex for mobile phone numbers with optional +91 or 0 prefix
    /// - Valid: "8888888888", "+919447011234", "06666666666"
    /// - Invalid: "5888888888", "888888888", "88888888888", "+1 8888888888"
    pub static ref PHONE_NUMBER_REGEX: Regex =
        Regex::new(r"^(\+91|0)?[6-9][0-9]{9}$").unwrap();
}

/// Uppercase a vehicle number and strip all whitespace and hyphens
pub fn normalize_vehicle_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Flatten `validator` errors into a field -> messages map.
///
/// Nested structs become `parent.field`, list items `parent[index].field`.
pub fn to_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_field_errors(errors, None, &mut out);
    out
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.entry(key)
                    .or_default()
                    .extend(errs.iter().map(describe_error));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, Some(&key), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, Some(&format!("{}[{}]", key, index)), out);
                }
            }
        }
    }
}

fn describe_error(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {} characters", min, max),
            (Some(min), None) => format!("must be at least {} characters", min),
            (None, Some(max)) => format!("must be at most {} characters", max),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            _ => "is out of range".to_string(),
        },
        "regex" => "has an invalid format".to_string(),
        "required" => "this field is required".to_string(),
        other => other.to_string(),
    }
}

/// Append a message for `field`, creating the entry if needed
pub fn push_field_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_vehicle_number_regex_valid() {
        assert!(VEHICLE_NUMBER_REGEX.is_match("KL13AB1234"));
        assert!(VEHICLE_NUMBER_REGEX.is_match("KL32G1234"));
        assert!(VEHICLE_NUMBER_REGEX.is_match("DL1C1"));
        assert!(VEHICLE_NUMBER_REGEX.is_match("TN09BAB1"));
    }

    #[test]
    fn test_vehicle_number_regex_invalid() {
        assert!(!VEHICLE_NUMBER_REGEX.is_match("kl13ab1234")); // lowercase
        assert!(!VEHICLE_NUMBER_REGEX.is_match("K13AB1234")); // single state letter
        assert!(!VEHICLE_NUMBER_REGEX.is_match("KL13AB12345")); // too many digits
        assert!(!VEHICLE_NUMBER_REGEX.is_match("KL-13-AB-1234")); // not normalised
        assert!(!VEHICLE_NUMBER_REGEX.is_match(""));
    }

    #[test]
    fn test_phone_number_regex() {
        assert!(PHONE_NUMBER_REGEX.is_match("8888888888"));
        assert!(PHONE_NUMBER_REGEX.is_match("+919447011234"));
        assert!(PHONE_NUMBER_REGEX.is_match("06666666666"));
        assert!(!PHONE_NUMBER_REGEX.is_match("5888888888"));
        assert!(!PHONE_NUMBER_REGEX.is_match("888888888"));
        assert!(!PHONE_NUMBER_REGEX.is_match("88888888888"));
        assert!(!PHONE_NUMBER_REGEX.is_match("+1 8888888888"));
    }

    #[test]
    fn test_normalize_vehicle_number() {
        assert_eq!(normalize_vehicle_number(" kl 13 ab 1234 "), "KL13AB1234");
        assert_eq!(normalize_vehicle_number("KL-13-AB-1234"), "KL13AB1234");
        assert_eq!(normalize_vehicle_number("KL13AB1234"), "KL13AB1234");
    }

    #[derive(Validate)]
    struct Item {
        #[validate(length(min = 1, max = 3))]
        name: String,
    }

    #[derive(Validate)]
    struct Parent {
        #[validate(regex(path = *PHONE_NUMBER_REGEX))]
        phone: String,
        #[validate(nested)]
        items: Vec<Item>,
    }

    #[test]
    fn test_to_field_errors_flattens_nested_lists() {
        let parent = Parent {
            phone: "123".to_string(),
            items: vec![
                Item {
                    name: "ok".to_string(),
                },
                Item {
                    name: "too long".to_string(),
                },
            ],
        };

        let errors = to_field_errors(&parent.validate().unwrap_err());

        assert_eq!(errors["phone"], vec!["has an invalid format".to_string()]);
        assert_eq!(
            errors["items[1].name"],
            vec!["must be between 1 and 3 characters".to_string()]
        );
        assert!(!errors.contains_key("items[0].name"));
    }

    #[test]
    fn test_push_field_error_appends() {
        let mut errors = FieldErrors::new();
        push_field_error(&mut errors, "price_per_km", "first");
        push_field_error(&mut errors, "price_per_km", "second");
        assert_eq!(errors["price_per_km"], vec!["first", "second"]);
    }
}
