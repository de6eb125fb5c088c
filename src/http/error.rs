//! Handler error types
//!
//! A route handler failure never tears down the connection: every error
//! maps to a concrete HTTP response.

use hyper::body::Bytes;
use thiserror::Error;

use super::reply::Reply;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Map the error to its HTTP response. Internal details stay in the
    /// error log; the client sees a generic message.
    #[must_use]
    pub fn into_reply(self) -> Reply {
        match self {
            Self::BadRequest(message) => Reply::new(400)
                .with_header("Content-Type", "text/plain")
                .with_body(Bytes::from(message)),
            Self::Internal(_) => Reply::new(500)
                .with_header("Content-Type", "text/plain")
                .with_body(Bytes::from_static(b"Internal server error")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_carries_message() {
        let reply = HandlerError::BadRequest("missing field".to_string()).into_reply();
        assert_eq!(reply.status(), 400);
        assert_eq!(reply.body().as_ref(), b"missing field");
    }

    #[test]
    fn test_internal_hides_details() {
        let reply = HandlerError::Internal("db exploded".to_string()).into_reply();
        assert_eq!(reply.status(), 500);
        assert_eq!(reply.body().as_ref(), b"Internal server error");
    }
}
