//! Domain error to gRPC status mapping
//!
//! | DomainError                    | Code              |
//! |--------------------------------|-------------------|
//! | `NotFound`                     | `NotFound`        |
//! | `AlreadyExists`                | `AlreadyExists`   |
//! | `Validation`                   | `InvalidArgument` |
//! | `TransientStorage`, `Internal` | `Internal`        |
//!
//! The status message is [`DomainError::public_message`]; internal detail
//! is logged here, inside the request span, and never sent.

use taskify_shared::DomainError;
use tonic::Status;

pub fn into_status(err: DomainError) -> Status {
    let message = err.public_message();
    match err {
        DomainError::NotFound(_) => Status::not_found(message),
        DomainError::AlreadyExists(_) => Status::already_exists(message),
        DomainError::Validation { .. } => Status::invalid_argument(message),
        DomainError::TransientStorage(detail) | DomainError::Internal(detail) => {
            tracing::error!(error = %detail, "request failed");
            Status::internal(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_kinds_map_to_codes() {
        let cases = [
            (DomainError::NotFound("board"), Code::NotFound),
            (DomainError::AlreadyExists("taken".to_string()), Code::AlreadyExists),
            (DomainError::validation("name", "must not be empty"), Code::InvalidArgument),
            (DomainError::TransientStorage("retries".to_string()), Code::Internal),
            (DomainError::Internal("boom".to_string()), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(into_status(err).code(), code);
        }
    }

    #[test]
    fn test_internal_detail_is_not_sent() {
        let status = into_status(DomainError::Internal("syntax error at or near".to_string()));
        assert_eq!(status.message(), "internal error");

        let status = into_status(DomainError::NotFound("board"));
        assert_eq!(status.message(), "board not found");
    }
}
