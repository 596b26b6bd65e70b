//! Domain module
//!
//! Forms, questions and the events raised when they change.

pub mod aggregates;
pub mod value_objects;
pub mod events;

pub use aggregates::*;
pub use value_objects::*;
pub use events::*;
