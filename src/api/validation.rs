use validator::Validate;

use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 1;

/// Runs the `validator` rules of `payload` and turns failures into a 400.
pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Trimmed, lower-cased username; rejects blanks.
pub(crate) fn normalize_username(username: &str) -> Result<String, ApiError> {
    let normalized = username.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ApiError::BadRequest("Username must not be empty".to_string()));
    }
    Ok(normalized)
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.trim().chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Password must not be empty".to_string()))
    }
}

/// Trimmed copy of a required text field.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// `"<last> <first> <third>"`, skipping blank parts.
pub(crate) fn full_name(first_name: &str, last_name: &str, third_name: &str) -> String {
    [last_name, first_name, third_name]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed_and_lowercased() {
        assert_eq!(normalize_username("  Teacher.One ").unwrap(), "teacher.one");
        assert!(normalize_username("   ").is_err());
    }

    #[test]
    fn full_name_orders_last_first_third() {
        assert_eq!(full_name("Ivan", "Petrov", "Sergeevich"), "Petrov Ivan Sergeevich");
        assert_eq!(full_name("Ivan", "Petrov", " "), "Petrov Ivan");
    }

    #[test]
    fn blank_password_is_rejected() {
        assert!(validate_password_len("").is_err());
        assert!(validate_password_len("   ").is_err());
        assert!(validate_password_len("x").is_ok());
    }
}
