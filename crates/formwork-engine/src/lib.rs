//! Form-state engine for reactive user interfaces.
//!
//! `formwork-engine` manages a deeply nested form document, exposes
//! field-level and array-field-level accessors over dotted paths,
//! validates the document against a caller-supplied schema, tracks
//! per-field and per-form in-progress status, and supports bounded
//! undo/redo over full state snapshots.
//!
//! # Core Concepts
//!
//! - **FormEngine**: owns state, meta, status, errors, and history;
//!   one instance per form
//! - **Update / Init**: every mutation accepts a value, a sync function,
//!   or an async function, normalized into one shape
//! - **History**: bounded, truncating undo/redo stack of full snapshots
//! - **Validator**: async seam to any schema library; failure is a
//!   result value, never an error
//! - **FieldView / ArrayFieldView**: path-scoped facades over the engine
//! - **SignalCell**: observable cells UI bindings subscribe to
//!
//! # Update Pipeline
//!
//! ```text
//! mutation -> resolve update -> write document -> record snapshot -> validate
//! ```
//!
//! Within one call the pipeline is strictly sequential. Across
//! independently issued calls no ordering is enforced: last write wins.
//!
//! # Quick Start
//!
//! ```
//! use formwork_engine::{FnValidator, FormEngine, FormErrors, FormOptions, Validation};
//! use serde_json::{json, Value};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let engine = FormEngine::mount(
//!     FormOptions::new(json!({"name": "", "age": 0})).with_validator(FnValidator::new(
//!         |state: &Value| match state.get("name").and_then(Value::as_str) {
//!             Some(name) if name.len() >= 3 => Validation::valid(state.clone()),
//!             _ => Validation::invalid(
//!                 FormErrors::new().with_field_error("name", "at least 3 characters"),
//!             ),
//!         },
//!     )),
//! )
//! .await
//! .unwrap();
//!
//! let name = engine.field("name");
//! name.set_value(json!("Jo")).await.unwrap();
//! assert_eq!(name.errors(), ["at least 3 characters"]);
//!
//! name.set_value(json!("Joan")).await.unwrap();
//! assert!(name.errors().is_empty());
//!
//! engine.undo(1).await.unwrap();
//! assert_eq!(name.value(), Some(json!("Jo")));
//! # });
//! ```

mod array;
mod cell;
mod engine;
mod error;
mod field;
mod history;
mod meta;
mod update;
mod validate;

pub use array::ArrayFieldView;
pub use cell::SignalCell;
pub use engine::{FormEngine, FormOptions};
pub use error::{FormError, FormResult};
pub use field::FieldView;
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use meta::{FieldMeta, FieldMetaMap, FieldStatus, FieldStatusMap, FormStatus};
pub use update::{Init, Update};
pub use validate::{AcceptAll, FnValidator, FormErrors, Validation, Validator};

// Re-export the document layer so callers need only one import.
pub use formwork_state::{get_value, parse_path, set_value, Path, Seg, StateError, Value};
