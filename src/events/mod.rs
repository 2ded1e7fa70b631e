//! Domain events handed from producers to handlers.
//!
//! ## Contents
//! - [`Event`] immutable payload wrapper with creation timestamp and sequence number

mod event;

pub use event::Event;
