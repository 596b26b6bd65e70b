//! Aggregates module

pub mod form;
pub mod question;

pub use form::{Form, FormError};
pub use question::Question;
