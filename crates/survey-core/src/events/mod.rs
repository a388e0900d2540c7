//! Event system.
//! Handler trait with no-op defaults, synchronous panic-isolated dispatch.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::SurveyEventHandler;
