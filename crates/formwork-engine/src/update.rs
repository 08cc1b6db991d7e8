//! Update descriptions and their resolution.
//!
//! Every mutation entry point accepts the same shape: a literal value, a
//! synchronous function of the current value, or an asynchronous function
//! of the current value. [`Update`] normalizes the three into one enum and
//! [`Update::resolve`] produces the concrete resulting value. [`Init`] is
//! the zero-argument analogue used for initial state, reset, and
//! array-operation arguments.

use crate::error::FormResult;
use futures::future::BoxFuture;
use std::future::Future;

/// An update description: a value, a sync function, or an async function.
///
/// Functions receive the current value. Async results are awaited; a
/// rejection propagates to the caller of [`resolve`](Update::resolve)
/// without retries.
///
/// # Examples
///
/// ```
/// use formwork_engine::Update;
/// use futures::executor::block_on;
/// use serde_json::{json, Value};
///
/// let literal: Update<Value> = json!(1).into();
/// assert_eq!(block_on(literal.resolve(&json!(0))).unwrap(), json!(1));
///
/// let computed = Update::compute(|current: &Value| {
///     json!(current.as_i64().unwrap() + 1)
/// });
/// assert_eq!(block_on(computed.resolve(&json!(41))).unwrap(), json!(42));
/// ```
pub enum Update<T> {
    /// Use the value verbatim.
    Value(T),
    /// Compute the next value from the current one.
    Sync(Box<dyn FnOnce(&T) -> T + Send>),
    /// Compute the next value asynchronously from the current one.
    Async(Box<dyn FnOnce(T) -> BoxFuture<'static, FormResult<T>> + Send>),
}

impl<T> Update<T> {
    /// Create a literal-value update.
    #[inline]
    pub fn value(v: impl Into<T>) -> Self {
        Update::Value(v.into())
    }

    /// Create a synchronous update from a function of the current value.
    pub fn compute(f: impl FnOnce(&T) -> T + Send + 'static) -> Self {
        Update::Sync(Box::new(f))
    }

    /// Create an asynchronous update.
    ///
    /// The function receives an owned copy of the current value and may
    /// suspend before yielding the next one.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = FormResult<T>> + Send + 'static,
    {
        Update::Async(Box::new(move |current| Box::pin(f(current))))
    }
}

impl<T: Clone> Update<T> {
    /// Resolve this update against the current value.
    ///
    /// Literals are yielded verbatim; functions are invoked with the
    /// current value; async results are awaited until they settle.
    pub async fn resolve(self, current: &T) -> FormResult<T> {
        match self {
            Update::Value(v) => Ok(v),
            Update::Sync(f) => Ok(f(current)),
            Update::Async(f) => f(current.clone()).await,
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Value(value)
    }
}

/// A zero-argument initializer: a value, a sync producer, or an async
/// producer.
///
/// Unlike [`Update`], an `Init` can be resolved repeatedly — `reset()`
/// re-runs the form's initializer, and re-running an asynchronous one is
/// intentional (reset to freshly fetched defaults).
pub enum Init<T> {
    /// Use the value verbatim (cloned per resolution).
    Value(T),
    /// Produce the value synchronously.
    Sync(Box<dyn Fn() -> T + Send + Sync>),
    /// Produce the value asynchronously.
    Async(Box<dyn Fn() -> BoxFuture<'static, FormResult<T>> + Send + Sync>),
}

impl<T> Init<T> {
    /// Create a literal-value initializer.
    #[inline]
    pub fn value(v: impl Into<T>) -> Self {
        Init::Value(v.into())
    }

    /// Create a synchronous producer.
    pub fn produce(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Init::Sync(Box::new(f))
    }

    /// Create an asynchronous producer.
    pub fn fetch<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FormResult<T>> + Send + 'static,
    {
        Init::Async(Box::new(move || Box::pin(f())))
    }
}

impl<T: Clone> Init<T> {
    /// Resolve this initializer to a concrete value.
    pub async fn resolve(&self) -> FormResult<T> {
        match self {
            Init::Value(v) => Ok(v.clone()),
            Init::Sync(f) => Ok(f()),
            Init::Async(f) => f().await,
        }
    }
}

impl<T> From<T> for Init<T> {
    fn from(value: T) -> Self {
        Init::Value(value)
    }
}
