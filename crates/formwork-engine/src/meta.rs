//! Per-field meta records and in-progress status flags.
//!
//! All maps are keyed by dotted path strings. A path with no entry means
//! the default record; entries are created lazily on first mutation and
//! persist for the engine's lifetime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field meta state driven by the UI: interaction and presentation
/// flags the engine stores but does not interpret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMeta {
    /// The field received focus and lost it at least once.
    pub touched: bool,
    /// The field's value was changed by the user.
    pub dirty: bool,
    /// The field is waiting on external data.
    pub loading: bool,
    /// The field rejects input.
    pub disabled: bool,
    /// The field displays but rejects edits.
    pub read_only: bool,
    /// The field is rendered.
    pub show: bool,
}

impl Default for FieldMeta {
    fn default() -> Self {
        Self {
            touched: false,
            dirty: false,
            loading: false,
            disabled: false,
            read_only: false,
            show: true,
        }
    }
}

/// Per-field in-progress flags, toggled around async mutations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldStatus {
    /// An async `set_value` for this path is in flight.
    pub is_setting_value: bool,
    /// An async `set_meta` for this path is in flight.
    pub is_setting_meta: bool,
}

/// Form-wide in-progress flags, one per operation category.
///
/// The booleans are independent, not mutually exclusive: a submit can
/// overlap a field-level update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormStatus {
    /// Initialization has started and not yet completed.
    pub initializing: bool,
    /// A submit handler is running.
    pub submitting: bool,
    /// A validation pass is running.
    pub validating: bool,
    /// A state mutation is resolving.
    pub setting_state: bool,
    /// A meta mutation is resolving.
    pub setting_meta: bool,
}

/// Field meta records keyed by dotted path.
pub type FieldMetaMap = BTreeMap<String, FieldMeta>;

/// Field status records keyed by dotted path.
pub type FieldStatusMap = BTreeMap<String, FieldStatus>;
