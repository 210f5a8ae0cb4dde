//! Request body schemas.
//!
//! Forms post nested payloads as bracketed keys (`recipe[title]`,
//! `review[body]`, `user[username]`). Each validator checks the whole payload,
//! collects every field-level violation, and either returns the typed value or
//! a [`ValidationError`] whose message joins all violations with `,`.
//!
//! Only shape is checked: required fields, non-empty strings, numeric rating,
//! no unknown keys. There are no business rules (email format, password
//! strength).

use std::collections::HashMap;

use axum::http::StatusCode;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use recipe_book_core::Rating;

use crate::models::{NewRecipe, NewReview};

/// A payload failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    details: Vec<String>,
}

impl ValidationError {
    fn from_details(details: Vec<String>) -> Self {
        Self {
            message: details.join(","),
            details,
        }
    }

    /// All violations joined with `,`.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Individual violation messages, in field order.
    #[must_use]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// HTTP status for a rejected payload.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// Accumulates violations for one payload.
struct Checker {
    envelope: &'static str,
    details: Vec<String>,
}

impl Checker {
    const fn new(envelope: &'static str) -> Self {
        Self {
            envelope,
            details: Vec::new(),
        }
    }

    fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            None => {
                self.details
                    .push(format!("\"{}.{field}\" is required", self.envelope));
                String::new()
            }
            Some(v) if v.is_empty() => {
                self.details.push(format!(
                    "\"{}.{field}\" is not allowed to be empty",
                    self.envelope
                ));
                String::new()
            }
            Some(v) => v,
        }
    }

    fn number(&mut self, field: &str, value: Option<String>) -> Option<Rating> {
        let raw = value.filter(|v| !v.trim().is_empty())?;
        match raw.parse::<Rating>() {
            Ok(rating) => Some(rating),
            Err(_) => {
                self.details
                    .push(format!("\"{}.{field}\" must be a number", self.envelope));
                None
            }
        }
    }

    /// Whether any unrecognised key sits inside the envelope.
    fn has_extra_in_envelope(&self, extra: &HashMap<String, String>) -> bool {
        extra.keys().any(|key| self.inner_key(key).is_some())
    }

    /// `recipe[bogus]` -> `bogus`.
    fn inner_key<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.envelope)?
            .strip_prefix('[')?
            .strip_suffix(']')
    }

    /// Flag every unrecognised key, in key order.
    fn unknown(&mut self, extra: &HashMap<String, String>) {
        let mut keys: Vec<&String> = extra.keys().collect();
        keys.sort();
        for key in keys {
            let message = match self.inner_key(key) {
                Some(field) => format!("\"{}.{field}\" is not allowed", self.envelope),
                None => format!("\"{key}\" is not allowed"),
            };
            self.details.push(message);
        }
    }

    fn missing_envelope(mut self, extra: &HashMap<String, String>) -> ValidationError {
        let mut details = vec![format!("\"{}\" is required", self.envelope)];
        self.unknown(extra);
        details.append(&mut self.details);
        ValidationError::from_details(details)
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.details.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::from_details(self.details))
        }
    }
}

/// Treat blank optional text as absent.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// Recipe
// =============================================================================

/// `recipe[...]` form payload.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeForm {
    #[serde(rename = "recipe[title]")]
    pub title: Option<String>,
    #[serde(rename = "recipe[image]")]
    pub image: Option<String>,
    #[serde(rename = "recipe[author]")]
    pub author: Option<String>,
    #[serde(rename = "recipe[description]")]
    pub description: Option<String>,
    #[serde(rename = "recipe[steps]")]
    pub steps: Option<String>,
    /// Any other submitted key.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

impl RecipeForm {
    fn is_absent(&self, check: &Checker) -> bool {
        self.title.is_none()
            && self.image.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.steps.is_none()
            && !check.has_extra_in_envelope(&self.extra)
    }
}

/// Validate a recipe submission.
///
/// Required: `title`, `image`, `author`, `description`. Optional: `steps`.
///
/// # Errors
///
/// Returns `ValidationError` listing every missing or empty field and every
/// unknown key.
pub fn validate_recipe(form: RecipeForm) -> Result<NewRecipe, ValidationError> {
    let mut check = Checker::new("recipe");
    if form.is_absent(&check) {
        return Err(check.missing_envelope(&form.extra));
    }

    let title = check.required("title", form.title);
    let image = check.required("image", form.image);
    let author = check.required("author", form.author);
    let description = check.required("description", form.description);
    check.unknown(&form.extra);

    check.finish(NewRecipe {
        title,
        image: Some(image),
        author: Some(author),
        description: Some(description),
        steps: optional(form.steps),
    })
}

// =============================================================================
// Review
// =============================================================================

/// `review[...]` form payload.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(rename = "review[rating]")]
    pub rating: Option<String>,
    #[serde(rename = "review[body]")]
    pub body: Option<String>,
    /// Any other submitted key.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// Validate a review submission.
///
/// Required: `body`. `rating` is optional but must be numeric when given.
///
/// # Errors
///
/// Returns `ValidationError` listing every violation.
pub fn validate_review(form: ReviewForm) -> Result<NewReview, ValidationError> {
    let mut check = Checker::new("review");
    if form.rating.is_none() && form.body.is_none() && !check.has_extra_in_envelope(&form.extra)
    {
        return Err(check.missing_envelope(&form.extra));
    }

    let rating = check.number("rating", form.rating);
    let body = check.required("body", form.body);
    check.unknown(&form.extra);

    check.finish(NewReview { rating, body })
}

// =============================================================================
// User
// =============================================================================

/// `user[...]` form payload.
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(rename = "user[username]")]
    pub username: Option<String>,
    #[serde(rename = "user[email]")]
    pub email: Option<String>,
    #[serde(rename = "user[password]")]
    pub password: Option<String>,
    /// Any other submitted key.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// A validated registration payload.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

/// Validate a registration submission.
///
/// Required: `username`, `email`, `password`.
///
/// # Errors
///
/// Returns `ValidationError` listing every missing or empty field.
pub fn validate_user(form: UserForm) -> Result<Registration, ValidationError> {
    let mut check = Checker::new("user");
    if form.username.is_none()
        && form.email.is_none()
        && form.password.is_none()
        && !check.has_extra_in_envelope(&form.extra)
    {
        return Err(check.missing_envelope(&form.extra));
    }

    let username = check.required("username", form.username);
    let email = check.required("email", form.email);
    let password = check.required("password", form.password);
    check.unknown(&form.extra);

    check.finish(Registration {
        username,
        email,
        password: SecretString::from(password),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn full_recipe() -> RecipeForm {
        RecipeForm {
            title: Some("Braised Leeks".to_string()),
            image: Some("https://img.example/leeks.jpg".to_string()),
            author: Some("Sam".to_string()),
            description: Some("Soft and sweet".to_string()),
            ..RecipeForm::default()
        }
    }

    #[test]
    fn test_recipe_valid() {
        let recipe = validate_recipe(full_recipe()).unwrap();
        assert_eq!(recipe.title, "Braised Leeks");
        assert_eq!(recipe.author.as_deref(), Some("Sam"));
        assert!(recipe.steps.is_none());
    }

    #[test]
    fn test_recipe_each_missing_field_is_named() {
        for field in ["title", "image", "author", "description"] {
            let mut form = full_recipe();
            match field {
                "title" => form.title = None,
                "image" => form.image = None,
                "author" => form.author = None,
                _ => form.description = None,
            }

            let err = validate_recipe(form).unwrap_err();
            assert_eq!(err.message(), format!("\"recipe.{field}\" is required"));
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_recipe_enumerates_all_violations() {
        let form = RecipeForm {
            title: Some(String::new()),
            steps: Some("1. Stir".to_string()),
            ..RecipeForm::default()
        };

        let err = validate_recipe(form).unwrap_err();
        assert_eq!(err.details().len(), 4);
        assert_eq!(
            err.message(),
            "\"recipe.title\" is not allowed to be empty,\"recipe.image\" is required,\
             \"recipe.author\" is required,\"recipe.description\" is required"
        );
    }

    #[test]
    fn test_recipe_missing_envelope() {
        let err = validate_recipe(RecipeForm::default()).unwrap_err();
        assert_eq!(err.message(), "\"recipe\" is required");
    }

    #[test]
    fn test_recipe_unknown_keys_are_rejected() {
        let mut form = full_recipe();
        form.extra
            .insert("recipe[bogus]".to_string(), "x".to_string());
        form.extra.insert("utf8".to_string(), "yes".to_string());

        let err = validate_recipe(form).unwrap_err();
        assert_eq!(
            err.message(),
            "\"recipe.bogus\" is not allowed,\"utf8\" is not allowed"
        );
    }

    #[test]
    fn test_recipe_with_only_unknown_field_is_not_missing_envelope() {
        let mut form = RecipeForm::default();
        form.extra
            .insert("recipe[bogus]".to_string(), "x".to_string());

        let err = validate_recipe(form).unwrap_err();
        assert_eq!(err.details().len(), 5);
        assert_eq!(
            err.details().last().map(String::as_str),
            Some("\"recipe.bogus\" is not allowed")
        );
    }

    #[test]
    fn test_missing_envelope_still_lists_unknown_keys() {
        let mut form = ReviewForm::default();
        form.extra.insert("comment".to_string(), "hi".to_string());

        let err = validate_review(form).unwrap_err();
        assert_eq!(
            err.message(),
            "\"review\" is required,\"comment\" is not allowed"
        );
    }

    #[test]
    fn test_review_rating_optional() {
        let review = validate_review(ReviewForm {
            rating: None,
            body: Some("Lovely".to_string()),
            ..ReviewForm::default()
        })
        .unwrap();
        assert!(review.rating.is_none());

        let review = validate_review(ReviewForm {
            rating: Some(String::new()),
            body: Some("Lovely".to_string()),
            ..ReviewForm::default()
        })
        .unwrap();
        assert!(review.rating.is_none());
    }

    #[test]
    fn test_review_rating_must_be_number() {
        let err = validate_review(ReviewForm {
            rating: Some("five".to_string()),
            body: None,
            ..ReviewForm::default()
        })
        .unwrap_err();
        assert_eq!(
            err.message(),
            "\"review.rating\" must be a number,\"review.body\" is required"
        );
    }

    #[test]
    fn test_review_valid_rating() {
        let review = validate_review(ReviewForm {
            rating: Some("3".to_string()),
            body: Some("Good".to_string()),
            ..ReviewForm::default()
        })
        .unwrap();
        assert_eq!(review.rating, Some(Rating::new(3.0).unwrap()));
    }

    #[test]
    fn test_user_valid() {
        let registration = validate_user(UserForm {
            username: Some("alice".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some("secret1".to_string()),
            ..UserForm::default()
        })
        .unwrap();
        assert_eq!(registration.username, "alice");
        assert_eq!(registration.password.expose_secret(), "secret1");
    }

    #[test]
    fn test_user_no_email_format_check() {
        assert!(
            validate_user(UserForm {
                username: Some("alice".to_string()),
                email: Some("not-an-email".to_string()),
                password: Some("x".to_string()),
                ..UserForm::default()
            })
            .is_ok()
        );
    }

    #[test]
    fn test_user_missing_password() {
        let err = validate_user(UserForm {
            username: Some("alice".to_string()),
            email: Some("a@x.com".to_string()),
            password: None,
            ..UserForm::default()
        })
        .unwrap_err();
        assert_eq!(err.message(), "\"user.password\" is required");
    }

    #[test]
    fn test_form_keys_deserialize() {
        let form: RecipeForm = serde_json::from_value(serde_json::json!({
            "recipe[title]": "Toast",
            "recipe[steps]": "1. Toast",
            "recipe[bogus]": "x"
        }))
        .unwrap();
        assert_eq!(form.title.as_deref(), Some("Toast"));
        assert_eq!(form.steps.as_deref(), Some("1. Toast"));
        assert!(form.image.is_none());
        assert_eq!(form.extra.len(), 1);
        assert_eq!(form.extra.get("recipe[bogus]").map(String::as_str), Some("x"));
    }
}
