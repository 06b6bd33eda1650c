//! Event dispatch

mod dispatcher;

pub use dispatcher::{DispatchOutcome, DispatcherConfig, EventDispatcher};
