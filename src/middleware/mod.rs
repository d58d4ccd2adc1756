mod auth;
mod correlation;
mod error_handler;

pub use auth::{AdminUser, CurrentUser, OptionalUser};
pub use correlation::{CORRELATION_HEADER, CorrelationId, correlation};
pub use error_handler::handle_panic;
