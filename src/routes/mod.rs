//! Navigation state consumed by the page controllers.

pub mod form;

pub use form::{FormQuery, FormRoute, FormState, resolve_form};
