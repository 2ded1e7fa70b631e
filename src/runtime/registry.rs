//! # Registry - selector bindings and topic resolution.
//!
//! Holds `(Selector, Handler)` registrations in insertion order and resolves
//! a topic to every handler whose selector matches it.
//!
//! ## Rules
//! - Registrations are append-only; there is no unregister.
//! - `matching` returns handlers in registration order (stable, deterministic).
//! - `matching` is pure: it only takes a read lock and clones `Arc`s.
//! - No match is an empty vector, never an error.
//!
//! Registrations usually all happen before the first notification, so the
//! bindings live behind a read-mostly `RwLock`.

use std::sync::{Arc, PoisonError, RwLock};

use crate::handlers::HandlerRef;
use crate::topics::{Selector, Topic};

/// One `(selector, handler)` binding.
struct Registration<T: Send + Sync + 'static> {
    selector: Selector,
    handler: HandlerRef<T>,
}

/// Ordered set of selector bindings.
pub struct Registry<T: Send + Sync + 'static> {
    bindings: RwLock<Vec<Registration<T>>>,
}

impl<T: Send + Sync + 'static> Registry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(Vec::new()),
        }
    }

    /// Appends a binding. Never fails, never waits on handler execution.
    pub fn register(&self, selector: Selector, handler: HandlerRef<T>) {
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration { selector, handler });
    }

    /// Returns every handler whose selector matches `topic`, in registration order.
    pub fn matching(&self, topic: &Topic) -> Vec<HandlerRef<T>> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.selector.matches(topic))
            .map(|r| Arc::clone(&r.handler))
            .collect()
    }

    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::events::Event;
    use crate::handlers::HandlerFn;
    use tokio_util::sync::CancellationToken;

    fn named(name: &'static str) -> HandlerRef<()> {
        HandlerFn::arc(name, |_ev: Event<()>, _ctx: CancellationToken| async move {
            Ok::<(), HandlerError>(())
        })
    }

    fn names(handlers: &[HandlerRef<()>]) -> Vec<&str> {
        handlers.iter().map(|h| h.name()).collect()
    }

    #[test]
    fn test_no_match_is_empty() {
        let reg = Registry::new();
        reg.register(Selector::exact("jokes"), named("a"));
        assert!(reg.matching(&"messages".into()).is_empty());
    }

    #[test]
    fn test_matches_in_registration_order() {
        let reg = Registry::new();
        reg.register(Selector::any(), named("wild-1"));
        reg.register(Selector::exact("jokes"), named("jokes"));
        reg.register(Selector::exact("news"), named("news"));
        reg.register(Selector::any(), named("wild-2"));

        assert_eq!(reg.len(), 4);
        assert_eq!(
            names(&reg.matching(&"jokes".into())),
            vec!["wild-1", "jokes", "wild-2"]
        );
        assert_eq!(names(&reg.matching(&"other".into())), vec!["wild-1", "wild-2"]);
    }

    #[test]
    fn test_same_handler_twice_is_two_bindings() {
        let reg = Registry::new();
        let h = named("dup");
        reg.register(Selector::exact("jokes"), h.clone());
        reg.register(Selector::exact("jokes"), h);
        assert_eq!(reg.matching(&"jokes".into()).len(), 2);
    }
}
