//! Application layer
//!
//! Persistence of the collection and the operations presentation code calls.

pub mod dto;
pub mod manager;
pub mod store;

pub use dto::NewQuestion;
pub use manager::{FormManager, SubscriptionId};
pub use store::{FormStore, DEFAULT_SLOT};
