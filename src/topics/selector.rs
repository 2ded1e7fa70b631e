//! # Topic selectors.
//!
//! A [`Selector`] is a pure predicate over [`Topic`]s. It is a closed set of
//! variants; new matching rules are added as new variants.
//!
//! ## Example
//! ```rust
//! use eventvisor::{Selector, Topic};
//!
//! let jokes = Selector::exact("jokes");
//! assert!(jokes.matches(&Topic::from("jokes")));
//! assert!(!jokes.matches(&Topic::from("joke")));
//!
//! assert!(Selector::any().matches(&Topic::from("anything-at-all")));
//! ```

use std::fmt;

use super::Topic;

/// Matching rule over topics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Matches exactly one topic (string equality).
    Exact(Topic),
    /// Matches every topic, including ones never seen before.
    Any,
}

impl Selector {
    /// Exact-match selector.
    pub fn exact(topic: impl Into<Topic>) -> Self {
        Selector::Exact(topic.into())
    }

    /// Match-any (wildcard) selector.
    pub fn any() -> Self {
        Selector::Any
    }

    /// Returns `true` if `topic` is selected. Pure and side-effect free.
    #[inline]
    pub fn matches(&self, topic: &Topic) -> bool {
        match self {
            Selector::Exact(t) => t == topic,
            Selector::Any => true,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Exact(t) => write!(f, "{t}"),
            Selector::Any => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_is_string_equality() {
        let sel = Selector::exact("jokes");
        assert!(sel.matches(&"jokes".into()));
        assert!(!sel.matches(&"joke".into()));
        assert!(!sel.matches(&"jokes2".into()));
        assert!(!sel.matches(&"Jokes".into()));
        assert!(!sel.matches(&"".into()));
    }

    #[test]
    fn test_any_matches_everything() {
        let sel = Selector::any();
        for t in ["jokes", "", "messages", "never-seen-before-7f3a"] {
            assert!(sel.matches(&Topic::from(t)), "any should match {t:?}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Selector::exact("jokes").to_string(), "jokes");
        assert_eq!(Selector::any().to_string(), "*");
    }
}
