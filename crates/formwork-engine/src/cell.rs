//! Observable cells that publish every write to subscribers.
//!
//! The engine keeps each piece of shared state (document, meta, status,
//! errors) in its own [`SignalCell`]. UI bindings subscribe to the cells
//! they render from and recompute when a new value is published; the
//! engine itself only uses the read/write surface.

use tokio::sync::watch;

/// A mutable cell whose writes notify subscribers.
///
/// Backed by a [`tokio::sync::watch`] channel: `read` clones the current
/// value, `write` publishes a new one, and `subscribe` hands out a
/// receiver that resolves whenever the value changes.
///
/// # Examples
///
/// ```
/// use formwork_engine::SignalCell;
///
/// let cell = SignalCell::new(1);
/// assert_eq!(cell.read(), 1);
///
/// cell.write(2);
/// assert_eq!(cell.read(), 2);
/// ```
pub struct SignalCell<T> {
    tx: watch::Sender<T>,
}

impl<T> std::fmt::Debug for SignalCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalCell").finish_non_exhaustive()
    }
}

impl<T> SignalCell<T> {
    /// Create a cell holding the given value.
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx }
    }

    /// Publish a new value, notifying subscribers.
    pub fn write(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Subscribe to changes.
    ///
    /// The receiver observes the current value immediately and every
    /// published value afterwards.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Read the current value through a borrow, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }
}

impl<T: Clone> SignalCell<T> {
    /// Clone the current value out of the cell.
    pub fn read(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for SignalCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let cell = SignalCell::new("a".to_owned());
        assert_eq!(cell.read(), "a");
        cell.write("b".to_owned());
        assert_eq!(cell.read(), "b");
    }

    #[test]
    fn test_update_in_place() {
        let cell = SignalCell::new(vec![1, 2]);
        cell.update(|v| v.push(3));
        assert_eq!(cell.read(), vec![1, 2, 3]);
    }

    #[test]
    fn test_with_borrows_without_clone() {
        let cell = SignalCell::new(vec![1, 2, 3]);
        let len = cell.with(|v| v.len());
        assert_eq!(len, 3);
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let cell = SignalCell::new(0);
        let mut rx = cell.subscribe();
        assert_eq!(*rx.borrow(), 0);

        cell.write(5);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 5);
    }

    #[test]
    fn test_write_without_subscribers_is_fine() {
        let cell = SignalCell::new(1);
        cell.write(2);
        cell.update(|v| *v += 1);
        assert_eq!(cell.read(), 3);
    }
}
