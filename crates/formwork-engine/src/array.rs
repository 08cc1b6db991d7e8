//! Array-field views.
//!
//! Every array operation is one `set_value` call carrying a synchronous
//! array-producing function, so the operations compose with the same
//! status/validation/history machinery as any other field write — no
//! special-casing in the engine.

use crate::engine::FormEngine;
use crate::error::FormResult;
use crate::field::FieldView;
use crate::update::{Init, Update};
use formwork_state::Value;

/// A facade over one array-valued field, adding element operations.
///
/// Obtained from [`FormEngine::array_field`]. Index and item arguments
/// accept the same value-or-sync-or-async initializer shape as other
/// updates and are resolved before the array operation executes.
///
/// A current value that is not an array is treated as empty;
/// out-of-range indices leave the array unchanged.
///
/// # Examples
///
/// ```ignore
/// let guests = engine.array_field("guests");
/// guests.push(json!({"name": "Ada"})).await?;
/// guests.swap(0, 1).await?;
/// assert_eq!(guests.len(), 2);
/// ```
pub struct ArrayFieldView<'a> {
    field: FieldView<'a>,
}

impl<'a> ArrayFieldView<'a> {
    pub(crate) fn new(engine: &'a FormEngine, path: &str) -> Self {
        Self {
            field: FieldView::new(engine, path),
        }
    }

    /// The underlying field view (value/meta/errors/status/reset).
    #[inline]
    pub fn field(&self) -> &FieldView<'a> {
        &self.field
    }

    /// The current elements; empty when the value is missing or not an
    /// array.
    pub fn items(&self) -> Vec<Value> {
        self.field
            .value()
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.field
            .value()
            .and_then(|v| v.as_array().map(Vec::len))
            .unwrap_or(0)
    }

    /// True when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one array transformation through the field's `set_value`.
    async fn apply(&self, f: impl FnOnce(&mut Vec<Value>) + Send + 'static) -> FormResult<()> {
        self.field
            .set_value(Update::compute(move |current: &Value| {
                let mut items = current.as_array().cloned().unwrap_or_default();
                f(&mut items);
                Value::Array(items)
            }))
            .await
    }

    /// Append an element.
    pub async fn push(&self, item: impl Into<Init<Value>>) -> FormResult<()> {
        let item = item.into().resolve().await?;
        self.apply(move |items| items.push(item)).await
    }

    /// Drop the element at `index`, shifting later elements left.
    pub async fn remove(&self, index: impl Into<Init<usize>>) -> FormResult<()> {
        let index = index.into().resolve().await?;
        self.apply(move |items| {
            if index < items.len() {
                items.remove(index);
            }
        })
        .await
    }

    /// Remove the element at `from` and insert it at `to` in the
    /// resulting (already-shortened) array.
    pub async fn move_item(
        &self,
        from: impl Into<Init<usize>>,
        to: impl Into<Init<usize>>,
    ) -> FormResult<()> {
        let from = from.into().resolve().await?;
        let to = to.into().resolve().await?;
        self.apply(move |items| {
            if from < items.len() {
                let item = items.remove(from);
                let to = to.min(items.len());
                items.insert(to, item);
            }
        })
        .await
    }

    /// Insert an element at `index` without removing any; an index past
    /// the end appends.
    pub async fn insert(
        &self,
        index: impl Into<Init<usize>>,
        item: impl Into<Init<Value>>,
    ) -> FormResult<()> {
        let index = index.into().resolve().await?;
        let item = item.into().resolve().await?;
        self.apply(move |items| {
            let index = index.min(items.len());
            items.insert(index, item);
        })
        .await
    }

    /// Overwrite the element at `index` in place.
    pub async fn replace(
        &self,
        index: impl Into<Init<usize>>,
        item: impl Into<Init<Value>>,
    ) -> FormResult<()> {
        let index = index.into().resolve().await?;
        let item = item.into().resolve().await?;
        self.apply(move |items| {
            if index < items.len() {
                items[index] = item;
            }
        })
        .await
    }

    /// Exchange the elements at `a` and `b`.
    pub async fn swap(
        &self,
        a: impl Into<Init<usize>>,
        b: impl Into<Init<usize>>,
    ) -> FormResult<()> {
        let a = a.into().resolve().await?;
        let b = b.into().resolve().await?;
        self.apply(move |items| {
            if a < items.len() && b < items.len() {
                items.swap(a, b);
            }
        })
        .await
    }

    /// Replace the field with an empty array.
    pub async fn empty(&self) -> FormResult<()> {
        self.field
            .set_value(Update::compute(|_: &Value| Value::Array(Vec::new())))
            .await
    }
}
