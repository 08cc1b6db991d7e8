//! The form engine: owns state, meta, status, errors, and history.
//!
//! One engine instance manages one form. All shared data lives in
//! [`SignalCell`]s owned by the instance; there is no process-wide state.
//! Mutations flow through a single pipeline: resolve the update, publish
//! the new document, record a history snapshot, re-validate.
//!
//! Operations suspend only at explicit async boundaries (initializers,
//! async updates, validation, submit handlers). Across independently
//! issued calls no mutual exclusion is enforced: a second call may read a
//! document that does not yet contain a still-suspended first call's
//! write. Last write wins.

use crate::array::ArrayFieldView;
use crate::cell::SignalCell;
use crate::error::{FormError, FormResult};
use crate::field::FieldView;
use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::meta::{FieldMeta, FieldMetaMap, FieldStatus, FieldStatusMap, FormStatus};
use crate::update::{Init, Update};
use crate::validate::{AcceptAll, FormErrors, Validation, Validator};
use formwork_state::{get_value, parse_path, set_value, Path, Value};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

type SubmitHandler = Box<dyn Fn(Value) -> BoxFuture<'static, FormResult<()>> + Send + Sync>;

/// Configuration for a [`FormEngine`].
///
/// # Examples
///
/// ```
/// use formwork_engine::{FnValidator, FormOptions, Validation};
/// use serde_json::{json, Value};
///
/// let options = FormOptions::new(json!({"name": "", "age": 0}))
///     .with_validator(FnValidator::new(|state: &Value| {
///         Validation::valid(state.clone())
///     }))
///     .with_history_limit(100);
/// ```
pub struct FormOptions {
    initializer: Init<Value>,
    validator: Arc<dyn Validator>,
    on_submit: Option<SubmitHandler>,
    history_limit: usize,
}

impl FormOptions {
    /// Create options with the given initial-state description.
    ///
    /// Accepts a literal value, or use [`Init::produce`] /
    /// [`Init::fetch`] for computed and fetched defaults.
    pub fn new(initializer: impl Into<Init<Value>>) -> Self {
        Self {
            initializer: initializer.into(),
            validator: Arc::new(AcceptAll),
            on_submit: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the validator (builder pattern).
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Set the submit handler (builder pattern).
    ///
    /// The handler receives the validated, schema-coerced data and is
    /// only invoked when validation succeeds.
    pub fn on_submit<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FormResult<()>> + Send + 'static,
    {
        self.on_submit = Some(Box::new(move |data| Box::pin(handler(data))));
        self
    }

    /// Set the undo/redo snapshot limit (builder pattern).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

fn set_initializing(s: &mut FormStatus, v: bool) {
    s.initializing = v;
}
fn set_submitting(s: &mut FormStatus, v: bool) {
    s.submitting = v;
}
fn set_validating(s: &mut FormStatus, v: bool) {
    s.validating = v;
}
fn set_setting_state(s: &mut FormStatus, v: bool) {
    s.setting_state = v;
}
fn set_setting_meta(s: &mut FormStatus, v: bool) {
    s.setting_meta = v;
}
fn set_is_setting_value(s: &mut FieldStatus, v: bool) {
    s.is_setting_value = v;
}
fn set_is_setting_meta(s: &mut FieldStatus, v: bool) {
    s.is_setting_meta = v;
}

/// Sets a form-status flag on acquisition and clears it on drop, so the
/// flag is released on every exit path, including `?` propagation.
struct FlagGuard<'a> {
    cell: &'a SignalCell<FormStatus>,
    set: fn(&mut FormStatus, bool),
}

impl<'a> FlagGuard<'a> {
    fn acquire(cell: &'a SignalCell<FormStatus>, set: fn(&mut FormStatus, bool)) -> Self {
        cell.update(|s| set(s, true));
        Self { cell, set }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        let set = self.set;
        self.cell.update(|s| set(s, false));
    }
}

/// Per-path analogue of [`FlagGuard`] over the field-status map.
struct FieldFlagGuard<'a> {
    cell: &'a SignalCell<FieldStatusMap>,
    path: String,
    set: fn(&mut FieldStatus, bool),
}

impl<'a> FieldFlagGuard<'a> {
    fn acquire(
        cell: &'a SignalCell<FieldStatusMap>,
        path: &str,
        set: fn(&mut FieldStatus, bool),
    ) -> Self {
        cell.update(|m| set(m.entry(path.to_owned()).or_default(), true));
        Self {
            cell,
            path: path.to_owned(),
            set,
        }
    }
}

impl Drop for FieldFlagGuard<'_> {
    fn drop(&mut self) {
        let set = self.set;
        let path = std::mem::take(&mut self.path);
        self.cell.update(|m| set(m.entry(path).or_default(), false));
    }
}

/// The form-state engine.
///
/// Owns the state document, the initial-state baseline, the bounded
/// undo/redo history, per-field meta and status maps, form-wide status
/// flags, and the current validation errors. Constructed per form
/// instance; field views borrow the engine.
///
/// # Examples
///
/// ```ignore
/// let engine = FormEngine::mount(
///     FormOptions::new(json!({"guests": []})).with_validator(schema),
/// )
/// .await?;
///
/// engine.set_field_value("guests.0.name", json!("Ada")).await?;
/// engine.submit().await?;
/// ```
pub struct FormEngine {
    initializer: Init<Value>,
    validator: Arc<dyn Validator>,
    on_submit: Option<SubmitHandler>,
    history_limit: usize,

    state: SignalCell<Option<Value>>,
    initial: SignalCell<Option<Value>>,
    history: Mutex<Option<History>>,
    metas: SignalCell<FieldMetaMap>,
    statuses: SignalCell<FieldStatusMap>,
    status: SignalCell<FormStatus>,
    errors: SignalCell<FormErrors>,
    initialized: AtomicBool,
}

impl FormEngine {
    /// Create an engine that has not yet initialized.
    ///
    /// State reads yield `None` until [`initialize`](Self::initialize)
    /// completes. Prefer [`mount`](Self::mount) unless construction and
    /// initialization must be separated.
    pub fn new(options: FormOptions) -> Self {
        Self {
            initializer: options.initializer,
            validator: options.validator,
            on_submit: options.on_submit,
            history_limit: options.history_limit,
            state: SignalCell::new(None),
            initial: SignalCell::new(None),
            history: Mutex::new(None),
            metas: SignalCell::default(),
            statuses: SignalCell::default(),
            status: SignalCell::default(),
            errors: SignalCell::default(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Construct and initialize an engine.
    pub async fn mount(options: FormOptions) -> FormResult<Arc<Self>> {
        let engine = Arc::new(Self::new(options));
        engine.initialize().await?;
        Ok(engine)
    }

    /// Resolve the initializer, seed state and history, run the first
    /// validation pass.
    ///
    /// Runs exactly once per engine instance; later calls are no-ops.
    /// A failing async initializer propagates its error.
    pub async fn initialize(&self) -> FormResult<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let _guard = FlagGuard::acquire(&self.status, set_initializing);

        let initial = self.initializer.resolve().await?;
        self.initial.write(Some(initial.clone()));
        self.state.write(Some(initial.clone()));
        *self.history_cell() = Some(History::new(initial.clone(), self.history_limit));
        tracing::debug!("form engine initialized");

        self.run_validation(&initial).await;
        Ok(())
    }

    fn history_cell(&self) -> MutexGuard<'_, Option<History>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one validation pass over `state` and publish its errors.
    ///
    /// The `validating` flag is scoped to this pass. Passes are not
    /// coalesced: each caller validates the state it saw, and a
    /// later-settling pass overwrites the published errors regardless of
    /// call order.
    async fn run_validation(&self, state: &Value) -> Validation {
        let _guard = FlagGuard::acquire(&self.status, set_validating);
        let outcome = self.validator.validate(state).await;
        match &outcome {
            Validation::Valid { .. } => tracing::trace!("validation passed"),
            Validation::Invalid(errors) => tracing::trace!(
                field_errors = errors.field_errors.len(),
                form_errors = errors.form_errors.len(),
                "validation failed"
            ),
        }
        self.errors.write(outcome.errors());
        outcome
    }

    /// Replace the whole state document.
    ///
    /// Resolves the update against the current document, publishes the
    /// result, records a history snapshot, then re-validates. The
    /// `setting_state` flag is released on every exit path.
    pub async fn set_state(&self, update: impl Into<Update<Value>>) -> FormResult<()> {
        let _guard = FlagGuard::acquire(&self.status, set_setting_state);

        let current = self.state.read().unwrap_or(Value::Null);
        let next = update.into().resolve(&current).await?;

        self.state.write(Some(next.clone()));
        if let Some(history) = self.history_cell().as_mut() {
            history.record(next.clone());
        }
        tracing::debug!("state replaced");

        self.run_validation(&next).await;
        Ok(())
    }

    /// Update the value at a dotted field path.
    ///
    /// The update resolves against the field's current value (`Null`
    /// when the path is missing or the engine is not yet initialized).
    /// If the state document exists, the resolved value is written into
    /// a fresh clone of it, which then flows through
    /// [`set_state`](Self::set_state); with no document yet, the write is
    /// silently skipped. The per-path `is_setting_value` flag is scoped
    /// to the whole operation.
    pub async fn set_field_value(
        &self,
        path: &str,
        update: impl Into<Update<Value>>,
    ) -> FormResult<()> {
        let _guard = FieldFlagGuard::acquire(&self.statuses, path, set_is_setting_value);

        let parsed = parse_path(path);
        let current = self.read_field(&parsed).unwrap_or(Value::Null);
        let next = update.into().resolve(&current).await?;

        if let Some(mut doc) = self.state.read() {
            set_value(&mut doc, &parsed, next)?;
            tracing::trace!(path, "field value updated");
            self.set_state(Update::value(doc)).await?;
        }
        Ok(())
    }

    /// Update the meta record at a dotted field path.
    ///
    /// Meta mutations do not record history and do not trigger
    /// validation. Both the form-wide `setting_meta` flag and the
    /// per-path `is_setting_meta` flag are scoped to the operation.
    pub async fn set_field_meta(
        &self,
        path: &str,
        update: impl Into<Update<FieldMeta>>,
    ) -> FormResult<()> {
        let _form_guard = FlagGuard::acquire(&self.status, set_setting_meta);
        let _field_guard = FieldFlagGuard::acquire(&self.statuses, path, set_is_setting_meta);

        let current = self.meta_for(path);
        let next = update.into().resolve(&current).await?;
        self.metas.update(|m| {
            m.insert(path.to_owned(), next);
        });
        tracing::trace!(path, "field meta updated");
        Ok(())
    }

    /// Replace the whole field-meta map.
    pub async fn set_field_metas(&self, update: impl Into<Update<FieldMetaMap>>) -> FormResult<()> {
        let _guard = FlagGuard::acquire(&self.status, set_setting_meta);

        let current = self.metas.read();
        let next = update.into().resolve(&current).await?;
        self.metas.write(next);
        Ok(())
    }

    /// Validate, and invoke the submit handler if the state is valid.
    ///
    /// An invalid document is a silent no-op from the engine's
    /// perspective; the UI observes the outcome via [`errors`](Self::errors).
    /// A handler failure propagates after the `submitting` flag is
    /// released.
    pub async fn submit(&self) -> FormResult<()> {
        let state = self.state.read().ok_or(FormError::NotInitialized)?;

        let data = match self.run_validation(&state).await {
            Validation::Valid { data } => data,
            Validation::Invalid(_) => {
                tracing::debug!("submit skipped: state invalid");
                return Ok(());
            }
        };

        if let Some(handler) = &self.on_submit {
            let _guard = FlagGuard::acquire(&self.status, set_submitting);
            handler(data).await?;
        }
        tracing::debug!("submit completed");
        Ok(())
    }

    /// Recompute the initial state via the initializer and set it as the
    /// current state.
    ///
    /// An asynchronous initializer is re-run on purpose: resetting to
    /// freshly fetched defaults is supported behavior. The recomputed
    /// snapshot becomes the new modification baseline.
    pub async fn reset(&self) -> FormResult<()> {
        let fresh = self.initializer.resolve().await?;
        self.initial.write(Some(fresh.clone()));
        tracing::debug!("form reset");
        self.set_state(Update::value(fresh)).await
    }

    /// Step the history cursor back and resolve the retrieved snapshot
    /// through [`set_state`](Self::set_state).
    ///
    /// Going through `set_state` means undo re-validates and re-records
    /// the snapshot; the history's truncate-on-record rule tolerates the
    /// identical content.
    pub async fn undo(&self, steps: usize) -> FormResult<()> {
        let snapshot = {
            let mut guard = self.history_cell();
            let history = guard.as_mut().ok_or(FormError::NotInitialized)?;
            history.undo(steps).clone()
        };
        tracing::debug!(steps, "undo");
        self.set_state(Update::value(snapshot)).await
    }

    /// Step the history cursor forward; otherwise like [`undo`](Self::undo).
    pub async fn redo(&self, steps: usize) -> FormResult<()> {
        let snapshot = {
            let mut guard = self.history_cell();
            let history = guard.as_mut().ok_or(FormError::NotInitialized)?;
            history.redo(steps).clone()
        };
        tracing::debug!(steps, "redo");
        self.set_state(Update::value(snapshot)).await
    }

    /// Whether the history cursor can move back `steps` entries.
    pub fn can_undo(&self, steps: usize) -> bool {
        self.history_cell()
            .as_ref()
            .map(|h| h.can_undo(steps))
            .unwrap_or(false)
    }

    /// Whether the history cursor can move forward `steps` entries.
    pub fn can_redo(&self, steps: usize) -> bool {
        self.history_cell()
            .as_ref()
            .map(|h| h.can_redo(steps))
            .unwrap_or(false)
    }

    /// Whether the current state differs (deep comparison) from the
    /// initial-state baseline.
    pub fn was_modified(&self) -> bool {
        self.state.read() != self.initial.read()
    }

    /// The current state document; `None` until initialization resolves.
    pub fn state(&self) -> Option<Value> {
        self.state.read()
    }

    /// The initial-state baseline; `None` until initialization resolves.
    pub fn initial_state(&self) -> Option<Value> {
        self.initial.read()
    }

    /// Errors from the most recently settled validation pass.
    pub fn errors(&self) -> FormErrors {
        self.errors.read()
    }

    /// Form-wide in-progress flags.
    pub fn form_status(&self) -> FormStatus {
        self.status.read()
    }

    /// Per-field in-progress flags.
    pub fn field_statuses(&self) -> FieldStatusMap {
        self.statuses.read()
    }

    /// Per-field meta records.
    pub fn field_metas(&self) -> FieldMetaMap {
        self.metas.read()
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Subscribe to state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<Option<Value>> {
        self.state.subscribe()
    }

    /// Subscribe to validation error changes.
    pub fn subscribe_errors(&self) -> watch::Receiver<FormErrors> {
        self.errors.subscribe()
    }

    /// Subscribe to form-status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    /// Subscribe to field-meta changes.
    pub fn subscribe_field_metas(&self) -> watch::Receiver<FieldMetaMap> {
        self.metas.subscribe()
    }

    /// Subscribe to field-status changes.
    pub fn subscribe_field_statuses(&self) -> watch::Receiver<FieldStatusMap> {
        self.statuses.subscribe()
    }

    /// The current value at a parsed path, cloned out of the document.
    pub(crate) fn read_field(&self, parsed: &Path) -> Option<Value> {
        self.state
            .with(|s| s.as_ref().and_then(|doc| get_value(doc, parsed).cloned()))
    }

    /// The initial-baseline value at a parsed path.
    pub(crate) fn read_initial_field(&self, parsed: &Path) -> Option<Value> {
        self.initial
            .with(|s| s.as_ref().and_then(|doc| get_value(doc, parsed).cloned()))
    }

    /// The meta record for a dotted path, defaulted when absent.
    pub(crate) fn meta_for(&self, path: &str) -> FieldMeta {
        self.metas.with(|m| m.get(path).cloned()).unwrap_or_default()
    }

    /// The status record for a dotted path, defaulted when absent.
    pub(crate) fn status_for(&self, path: &str) -> FieldStatus {
        self.statuses.with(|m| m.get(path).copied()).unwrap_or_default()
    }

    /// A path-scoped view over one field.
    pub fn field(&self, path: &str) -> FieldView<'_> {
        FieldView::new(self, path)
    }

    /// A path-scoped view over one array field.
    pub fn array_field(&self, path: &str) -> ArrayFieldView<'_> {
        ArrayFieldView::new(self, path)
    }
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("initialized", &self.is_initialized())
            .field("status", &self.status.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_initialize_seeds_state_and_history() {
        let engine = FormEngine::new(FormOptions::new(json!({"count": 0})));
        assert_eq!(engine.state(), None);
        assert!(!engine.is_initialized());

        engine.initialize().await.unwrap();

        assert_eq!(engine.state(), Some(json!({"count": 0})));
        assert_eq!(engine.initial_state(), Some(json!({"count": 0})));
        assert!(engine.is_initialized());
        assert!(!engine.form_status().initializing);
        assert!(!engine.can_undo(1));
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let engine = FormEngine::new(FormOptions::new(json!(1)));
        engine.initialize().await.unwrap();
        engine.set_state(json!(2)).await.unwrap();

        // A second initialize must not reseed
        engine.initialize().await.unwrap();
        assert_eq!(engine.state(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_set_state_records_history() {
        let engine = FormEngine::mount(FormOptions::new(json!("a"))).await.unwrap();
        engine.set_state(json!("b")).await.unwrap();

        assert_eq!(engine.state(), Some(json!("b")));
        assert!(engine.can_undo(1));
    }

    #[tokio::test]
    async fn test_set_field_value_before_init_is_skipped() {
        let engine = FormEngine::new(FormOptions::new(json!({})));
        engine.set_field_value("a.b", json!(1)).await.unwrap();
        assert_eq!(engine.state(), None);
    }

    #[tokio::test]
    async fn test_was_modified() {
        let engine = FormEngine::mount(FormOptions::new(json!({"n": 1}))).await.unwrap();
        assert!(!engine.was_modified());

        engine.set_field_value("n", json!(2)).await.unwrap();
        assert!(engine.was_modified());

        engine.set_field_value("n", json!(1)).await.unwrap();
        assert!(!engine.was_modified());
    }

    #[tokio::test]
    async fn test_meta_updates_do_not_touch_history() {
        let engine = FormEngine::mount(FormOptions::new(json!({}))).await.unwrap();
        engine
            .set_field_meta(
                "name",
                Update::compute(|m: &FieldMeta| FieldMeta {
                    touched: true,
                    ..m.clone()
                }),
            )
            .await
            .unwrap();

        assert!(engine.field_metas().get("name").unwrap().touched);
        assert!(!engine.can_undo(1));
    }

    #[tokio::test]
    async fn test_submit_without_handler_validates_only() {
        let engine = FormEngine::mount(FormOptions::new(json!({"x": 1}))).await.unwrap();
        engine.submit().await.unwrap();
        assert!(engine.errors().is_empty());
    }

    #[tokio::test]
    async fn test_submit_before_init_errors() {
        let engine = FormEngine::new(FormOptions::new(json!({})));
        let err = engine.submit().await.unwrap_err();
        assert!(matches!(err, FormError::NotInitialized));
    }
}
