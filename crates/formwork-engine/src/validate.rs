//! Schema validation seam.
//!
//! The engine does not implement a schema language; it consumes anything
//! that can judge a state document. A [`Validator`] produces a
//! [`Validation`]: either the coerced data, or path-keyed error lists.
//! Validation failure is a value the engine stores and republishes — it is
//! never an `Err`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field-level and form-level validation messages.
///
/// `field_errors` keys are dotted paths. Both collections are rebuilt
/// wholesale on every validation pass; nothing is merged incrementally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormErrors {
    /// Messages per dotted field path, in schema order.
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Messages attached to the form as a whole (empty path).
    pub form_errors: Vec<String>,
}

impl FormErrors {
    /// Create an empty error set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field error (builder pattern).
    pub fn with_field_error(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.field_errors
            .entry(path.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Add a form-level error (builder pattern).
    pub fn with_form_error(mut self, message: impl Into<String>) -> Self {
        self.form_errors.push(message.into());
        self
    }

    /// Messages for one dotted path; empty when the field is clean.
    pub fn field(&self, path: &str) -> &[String] {
        self.field_errors
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when no field or form errors are present.
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.form_errors.is_empty()
    }
}

/// Outcome of a validation pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Validation {
    /// The state is valid; `data` is the schema-coerced document handed
    /// to the submit handler.
    Valid {
        /// Validated, possibly coerced data.
        data: Value,
    },
    /// The state is invalid.
    Invalid(FormErrors),
}

impl Validation {
    /// Create a success outcome.
    #[inline]
    pub fn valid(data: impl Into<Value>) -> Self {
        Validation::Valid { data: data.into() }
    }

    /// Create a failure outcome.
    #[inline]
    pub fn invalid(errors: FormErrors) -> Self {
        Validation::Invalid(errors)
    }

    /// True for [`Validation::Valid`].
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }

    /// The error set: empty for a valid outcome.
    pub fn errors(&self) -> FormErrors {
        match self {
            Validation::Valid { .. } => FormErrors::default(),
            Validation::Invalid(errors) => errors.clone(),
        }
    }
}

/// Judges a state document against a schema.
///
/// Implementations may suspend (remote validation, async schema
/// libraries). The engine runs a pass after initialization and after
/// every accepted state mutation; concurrent passes are not coalesced.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate the given state document.
    async fn validate(&self, state: &Value) -> Validation;
}

/// Validator that accepts every document, passing it through as data.
///
/// Used when no validator is configured.
pub struct AcceptAll;

#[async_trait]
impl Validator for AcceptAll {
    async fn validate(&self, state: &Value) -> Validation {
        Validation::valid(state.clone())
    }
}

/// Adapter turning a synchronous closure into a [`Validator`].
///
/// # Examples
///
/// ```
/// use formwork_engine::{FnValidator, FormErrors, Validation};
/// use serde_json::Value;
///
/// let validator = FnValidator::new(|state: &Value| {
///     if state.get("name").and_then(Value::as_str).is_some() {
///         Validation::valid(state.clone())
///     } else {
///         Validation::invalid(FormErrors::new().with_field_error("name", "required"))
///     }
/// });
/// ```
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> Validation + Send + Sync,
{
    /// Wrap a synchronous validation function.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value) -> Validation + Send + Sync,
{
    async fn validate(&self, state: &Value) -> Validation {
        (self.0)(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_errors_builder() {
        let errors = FormErrors::new()
            .with_field_error("name", "too short")
            .with_field_error("name", "must not be numeric")
            .with_form_error("form incomplete");

        assert_eq!(errors.field("name").len(), 2);
        assert_eq!(errors.field("name")[0], "too short");
        assert_eq!(errors.form_errors, vec!["form incomplete"]);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_form_errors_absent_field_is_clean() {
        let errors = FormErrors::new();
        assert!(errors.field("anything").is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validation_errors_accessor() {
        let valid = Validation::valid(json!({"x": 1}));
        assert!(valid.is_valid());
        assert!(valid.errors().is_empty());

        let invalid = Validation::invalid(FormErrors::new().with_form_error("bad"));
        assert!(!invalid.is_valid());
        assert_eq!(invalid.errors().form_errors, vec!["bad"]);
    }

    #[tokio::test]
    async fn test_accept_all_passes_state_through() {
        let state = json!({"anything": [1, 2, 3]});
        match AcceptAll.validate(&state).await {
            Validation::Valid { data } => assert_eq!(data, state),
            Validation::Invalid(_) => panic!("AcceptAll rejected"),
        }
    }

    #[tokio::test]
    async fn test_fn_validator() {
        let validator = FnValidator::new(|state: &Value| {
            match state.get("age").and_then(Value::as_i64) {
                Some(age) if age >= 18 => Validation::valid(state.clone()),
                _ => Validation::invalid(
                    FormErrors::new().with_field_error("age", "must be at least 18"),
                ),
            }
        });

        assert!(validator.validate(&json!({"age": 30})).await.is_valid());

        let result = validator.validate(&json!({"age": 12})).await;
        assert_eq!(result.errors().field("age"), ["must be at least 18"]);
    }

    #[test]
    fn test_form_errors_serde() {
        let errors = FormErrors::new()
            .with_field_error("guests.0.name", "required")
            .with_form_error("incomplete");
        let json = serde_json::to_string(&errors).unwrap();
        let parsed: FormErrors = serde_json::from_str(&json).unwrap();
        assert_eq!(errors, parsed);
    }
}
