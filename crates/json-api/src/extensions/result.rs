//! Result helpers for handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Turn infrastructure failures into a logged, bodiless 500.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &'static str) -> Result<T, StatusError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, context: &'static str) -> Result<T, StatusError> {
        self.map_err(|source| {
            error!(%source, context, "handler failure");

            StatusError::internal_server_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn errors_become_internal_server_error() {
        let result: Result<(), &str> = Err("header value contained a newline");

        let status = result.or_500("failed to set location header").err();

        assert_eq!(
            status.map(|error| error.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn values_pass_through() {
        let result: Result<u8, &str> = Ok(7);

        assert_eq!(result.or_500("unreachable").ok(), Some(7));
    }
}
