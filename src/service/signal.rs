//! Change notification for the selection store.

/// Observer list notified when a value changes.
#[derive(Default)]
pub struct Signal {
    callbacks: Vec<Box<dyn Fn() + Send>>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked on every [`Signal::emit`].
    ///
    /// Callbacks run while the owner is borrowed mutably. Under
    /// [`SharedService`](super::SharedService) the lock is held, so a callback
    /// must not lock the service again.
    pub fn connect(&mut self, callback: impl Fn() + Send + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn emit(&self) {
        for callback in &self.callbacks {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_reaches_every_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut signal = Signal::new();
        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            signal.connect(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        signal.emit();
        signal.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 4);
        assert_eq!(signal.len(), 2);
    }

    #[test]
    fn emit_without_observers_is_fine() {
        let signal = Signal::new();
        assert!(signal.is_empty());
        signal.emit();
    }
}
