//! Path-addressed access to nested form-state documents.
//!
//! `formwork-state` is the document layer of the formwork engine. A form's
//! state is a [`serde_json::Value`] tree; fields address their slice of it
//! with dotted path strings where all-digit segments index into arrays.
//!
//! # Core Concepts
//!
//! - **Path / Seg**: typed path model over key and index segments
//! - **parse_path**: dotted-string form used throughout the engine
//! - **get_value**: resilient read — missing paths yield `None`, never an error
//! - **set_value**: in-place write under caller-side copy-on-write
//!
//! # Quick Start
//!
//! ```
//! use formwork_state::{get_value, set_value, parse_path};
//! use serde_json::json;
//!
//! let mut state = json!({"guests": [{"name": "Ada"}]});
//! let path = parse_path("guests.0.name");
//!
//! assert_eq!(get_value(&state, &path), Some(&json!("Ada")));
//!
//! set_value(&mut state, &path, json!("Grace")).unwrap();
//! assert_eq!(get_value(&state, &path), Some(&json!("Grace")));
//! ```

mod error;
mod path;
mod resolve;

pub use error::{value_type_name, StateError, StateResult};
pub use path::{parse_path, Path, Seg};
pub use resolve::{get_value, set_value};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
