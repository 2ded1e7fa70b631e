//! Runtime: routing, dispatch and lifecycle.
//!
//! The public API from this module is [`Reactor`] and its [`ReactorBuilder`].
//!
//! Internal modules:
//! - [`registry`]: selector bindings, resolves a topic to handlers in registration order;
//! - [`dispatcher`]: bounded worker pool with an unbounded submission queue;
//! - [`runner`]: executes one invocation with timeout, panic isolation and reporting;
//! - [`reactor`]: façade tying registry, dispatcher, bus and sinks together;
//! - [`builder`]: reactor construction.

mod builder;
mod dispatcher;
mod reactor;
mod registry;
mod runner;

pub use builder::ReactorBuilder;
pub use reactor::Reactor;
