// forms.rs - Request payload validation
//
// Each form deserializes leniently (missing fields become empty strings) and
// is turned into a cleaned value by `clean()`. Field rules are declared with
// `validator`; every failing field is reported at once as a VALIDATION_ERROR.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::database::ProfileChanges;
use crate::error::ApiError;

/// Trim and lower-case the domain part; the local part is kept as typed
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn not_entirely_numeric(password: &str) -> Result<(), ValidationError> {
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        return Err(validation_error("password_numeric", "This password is entirely numeric"));
    }
    Ok(())
}

fn phone_characters(phone: &str) -> Result<(), ValidationError> {
    if phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        Ok(())
    } else {
        Err(validation_error("phone", "Enter a valid phone number"))
    }
}

/// Derived rule failures, or an empty set to add cross-field checks to
fn field_errors(form: &impl Validate) -> ValidationErrors {
    form.validate().err().unwrap_or_else(ValidationErrors::new)
}

fn into_result(errors: ValidationErrors) -> Result<(), ApiError> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// POST /users/register payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(
        length(min = 8, message = "This password is too short. It must contain at least 8 characters"),
        custom(function = "not_entirely_numeric")
    )]
    pub password1: String,

    #[serde(default)]
    #[validate(must_match(other = "password1", message = "The two password fields didn't match"))]
    pub password2: String,
}

#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn clean(mut self) -> Result<Registration, ApiError> {
        self.email = normalize_email(&self.email);

        let mut errors = field_errors(&self);
        if !self.password1.is_empty() && self.password1.eq_ignore_ascii_case(&self.email) {
            errors.add(
                "password1",
                validation_error("password_similar", "The password is too similar to the email"),
            );
        }

        into_result(errors)?;
        Ok(Registration { email: self.email, password: self.password1 })
    }
}

/// POST /users/login payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn clean(mut self) -> Result<(String, String), ApiError> {
        self.email = normalize_email(&self.email);
        self.validate()?;
        Ok((self.email, self.password))
    }
}

/// POST /users/password-reset payload
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PasswordResetForm {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
}

impl PasswordResetForm {
    /// Normalized email, or `None` when it cannot name any account
    pub fn clean(mut self) -> Option<String> {
        self.email = normalize_email(&self.email);
        self.validate().ok().map(|_| self.email)
    }
}

/// PUT/PATCH /users/profile payload. Identity fields are not part of the
/// form, so anything like `id` or `email` in the body is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 35, message = "Ensure this value has at most 35 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters"))]
    pub country: Option<String>,
}

impl ProfileForm {
    pub fn clean(self) -> Result<ProfileChanges, ApiError> {
        let trim = |value: Option<String>| value.map(|s| s.trim().to_string());
        let form = ProfileForm {
            first_name: trim(self.first_name),
            last_name: trim(self.last_name),
            phone: trim(self.phone),
            country: trim(self.country),
        };

        let mut errors = field_errors(&form);
        if let Some(Err(err)) = form.phone.as_deref().map(phone_characters) {
            errors.add("phone", err);
        }
        into_result(errors)?;

        Ok(ProfileChanges {
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone.map(empty_to_none),
            country: form.country.map(empty_to_none),
        })
    }
}

fn empty_to_none(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn errors_of(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::ValidationError { field_errors: Some(errors), .. } => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn register(email: &str, password1: &str, password2: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn normalizes_domain_only() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "Jane.Doe@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn register_email_rules() {
        for email in ["", "@example.com", "a@@example.com", "a b@example.com", "nope"] {
            let errors = errors_of(register(email, "s3cret-pass", "s3cret-pass").clean().unwrap_err());
            assert!(errors.contains_key("email"), "{:?} accepted", email);
        }
    }

    #[test]
    fn register_password_rules() {
        for password in ["short", "1234567890", "a@example.com"] {
            let errors = errors_of(register("a@example.com", password, password).clean().unwrap_err());
            assert!(errors.contains_key("password1"), "{:?} accepted", password);
        }
        assert!(register("a@example.com", "s3cret-pass", "s3cret-pass").clean().is_ok());
    }

    #[test]
    fn register_form_reports_all_fields() {
        let errors = errors_of(register("nope", "short", "different").clean().unwrap_err());
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password1"));
        assert!(errors.contains_key("password2"));
    }

    #[test]
    fn register_form_cleans() {
        let registration = register("Jane@Example.com", "correct horse", "correct horse").clean().unwrap();
        assert_eq!(registration.email, "Jane@example.com");
        assert_eq!(registration.password, "correct horse");
    }

    #[test]
    fn login_form_requires_both_fields() {
        let form = LoginForm { email: " ".to_string(), password: String::new() };
        let errors = errors_of(form.clean().unwrap_err());
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn reset_form_rejects_garbage_quietly() {
        assert_eq!(PasswordResetForm { email: "x".into() }.clean(), None);
        assert_eq!(PasswordResetForm::default().clean(), None);
        assert_eq!(
            PasswordResetForm { email: " a@EXAMPLE.com".into() }.clean(),
            Some("a@example.com".to_string())
        );
    }

    #[test]
    fn profile_form_ignores_identity_fields() {
        let form: ProfileForm = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "email": "evil@example.com",
            "is_active": true,
            "first_name": " Ada "
        }))
        .unwrap();

        let changes = form.clean().unwrap();
        assert_eq!(changes.first_name.as_deref(), Some("Ada"));
        assert_eq!(changes.last_name, None);
    }

    #[test]
    fn profile_form_clears_optional_fields_with_empty_string() {
        let form = ProfileForm { phone: Some("".into()), ..Default::default() };
        assert_eq!(form.clean().unwrap().phone, Some(None));
    }

    #[test]
    fn profile_form_validates_phone_and_lengths() {
        let form = ProfileForm {
            phone: Some("call me maybe".into()),
            last_name: Some("x".repeat(151)),
            ..Default::default()
        };
        let errors = errors_of(form.clean().unwrap_err());
        assert!(errors.contains_key("phone"));
        assert!(errors.contains_key("last_name"));

        let form = ProfileForm { phone: Some("1".repeat(36)), ..Default::default() };
        assert!(errors_of(form.clean().unwrap_err()).contains_key("phone"));
    }
}
