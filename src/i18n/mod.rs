//! Language support for translation requests.
//!
//! - `catalog`: the fixed set of language codes the service accepts
//! - `validator`: ordered, first-failure-wins checks on a request's fields

mod catalog;
mod validator;

pub use catalog::LanguageCatalog;
pub use validator::{RequestValidator, ValidatedRequest, ValidationError, NO_ERRORS};
