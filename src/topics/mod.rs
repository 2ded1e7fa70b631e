//! # Topics and selectors.
//!
//! - [`Topic`] opaque, immutable routing key attached to every notification
//! - [`Selector`] matching rule deciding whether a registration is interested in a topic

mod selector;
mod topic;

pub use selector::Selector;
pub use topic::Topic;
