//! HTTP layer
//!
//! Response types and builders shared by the request pipeline and the
//! router, decoupled from routing and business logic.

pub mod error;
pub mod reply;
pub mod response;

// Re-export commonly used types
pub use error::HandlerError;
pub use reply::Reply;
pub use response::{
    build_400_response, build_405_response, build_413_response, build_429_response,
    build_options_response,
};
