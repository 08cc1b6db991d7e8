//! Path-scoped field views.
//!
//! A [`FieldView`] is a pure derivation over the engine: every read walks
//! the engine's cells at call time, and every mutation delegates to the
//! engine's path-scoped mutators. Views hold no state of their own.

use crate::engine::FormEngine;
use crate::error::FormResult;
use crate::meta::{FieldMeta, FieldStatus};
use crate::update::Update;
use formwork_state::{parse_path, Path, Value};

/// A read/write facade over one field of the form.
///
/// Obtained from [`FormEngine::field`]. Reads are resilient before
/// initialization: `value()` is simply `None` until the engine's state
/// document exists.
///
/// # Examples
///
/// ```ignore
/// let email = engine.field("account.email");
/// email.set_value(json!("ada@example.com")).await?;
/// assert_eq!(email.value(), Some(json!("ada@example.com")));
/// assert!(email.errors().is_empty());
/// ```
pub struct FieldView<'a> {
    engine: &'a FormEngine,
    path: String,
    parsed: Path,
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(engine: &'a FormEngine, path: &str) -> Self {
        Self {
            engine,
            path: path.to_owned(),
            parsed: parse_path(path),
        }
    }

    /// The dotted path this view is scoped to.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The engine this view reads from.
    #[inline]
    pub fn engine(&self) -> &'a FormEngine {
        self.engine
    }

    /// The field's current value; `None` when the path is missing or the
    /// engine has no state document yet.
    pub fn value(&self) -> Option<Value> {
        self.engine.read_field(&self.parsed)
    }

    /// The field's meta record, defaulted when never written.
    pub fn meta(&self) -> FieldMeta {
        self.engine.meta_for(&self.path)
    }

    /// Validation messages for this field from the latest settled pass.
    pub fn errors(&self) -> Vec<String> {
        self.engine.errors().field(&self.path).to_vec()
    }

    /// The field's in-progress flags.
    pub fn status(&self) -> FieldStatus {
        self.engine.status_for(&self.path)
    }

    /// Whether the field's value differs (deep comparison) from the
    /// initial-state baseline at this path.
    pub fn was_modified(&self) -> bool {
        self.engine.read_field(&self.parsed) != self.engine.read_initial_field(&self.parsed)
    }

    /// Update the field's value.
    pub async fn set_value(&self, update: impl Into<Update<Value>>) -> FormResult<()> {
        self.engine.set_field_value(&self.path, update).await
    }

    /// Update the field's meta record.
    pub async fn set_meta(&self, update: impl Into<Update<FieldMeta>>) -> FormResult<()> {
        self.engine.set_field_meta(&self.path, update).await
    }

    /// Mark the field as touched, leaving the rest of the meta intact.
    pub async fn touch(&self) -> FormResult<()> {
        self.set_meta(Update::compute(|meta: &FieldMeta| FieldMeta {
            touched: true,
            ..meta.clone()
        }))
        .await
    }

    /// Restore the field to its initial-baseline value and clear its
    /// meta record to the default.
    pub async fn reset(&self) -> FormResult<()> {
        let initial = self
            .engine
            .read_initial_field(&self.parsed)
            .unwrap_or(Value::Null);
        self.set_value(initial).await?;
        self.set_meta(FieldMeta::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FormOptions;
    use serde_json::json;

    async fn engine() -> std::sync::Arc<FormEngine> {
        FormEngine::mount(FormOptions::new(json!({
            "account": {"email": "ada@example.com"},
            "guests": [{"name": "Ada"}]
        })))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_value_reads_through_paths() {
        let engine = engine().await;
        assert_eq!(
            engine.field("account.email").value(),
            Some(json!("ada@example.com"))
        );
        assert_eq!(engine.field("guests.0.name").value(), Some(json!("Ada")));
        assert_eq!(engine.field("guests.7.name").value(), None);
    }

    #[tokio::test]
    async fn test_value_before_init_is_none() {
        let engine = FormEngine::new(FormOptions::new(json!({"x": 1})));
        assert_eq!(engine.field("x").value(), None);
    }

    #[tokio::test]
    async fn test_set_value_round_trips() {
        let engine = engine().await;
        let field = engine.field("account.email");
        field.set_value(json!("grace@example.com")).await.unwrap();
        assert_eq!(field.value(), Some(json!("grace@example.com")));
    }

    #[tokio::test]
    async fn test_meta_defaults_for_unknown_path() {
        let engine = engine().await;
        let meta = engine.field("never.written").meta();
        assert_eq!(meta, FieldMeta::default());
    }

    #[tokio::test]
    async fn test_touch_preserves_other_meta() {
        let engine = engine().await;
        let field = engine.field("account.email");
        field
            .set_meta(Update::compute(|m: &FieldMeta| FieldMeta {
                disabled: true,
                ..m.clone()
            }))
            .await
            .unwrap();

        field.touch().await.unwrap();

        let meta = field.meta();
        assert!(meta.touched);
        assert!(meta.disabled);
    }

    #[tokio::test]
    async fn test_was_modified_per_field() {
        let engine = engine().await;
        let email = engine.field("account.email");
        let name = engine.field("guests.0.name");

        email.set_value(json!("new@example.com")).await.unwrap();

        assert!(email.was_modified());
        assert!(!name.was_modified());
    }

    #[tokio::test]
    async fn test_reset_restores_value_and_meta() {
        let engine = engine().await;
        let field = engine.field("account.email");

        field.set_value(json!("changed@example.com")).await.unwrap();
        field.touch().await.unwrap();
        assert!(field.was_modified());

        field.reset().await.unwrap();

        assert_eq!(field.value(), Some(json!("ada@example.com")));
        assert!(!field.was_modified());
        assert_eq!(field.meta(), FieldMeta::default());
    }
}
