//! Listing error to HTTP error conversion.

use bucketview_object::types::{Error as ListingError, ErrorKind as ListingErrorKind};

use super::http_error::{Error as HttpError, ErrorKind};
use crate::TRACING_TARGET_LISTING as TRACING_TARGET;

impl From<ListingError> for HttpError<'static> {
    fn from(error: ListingError) -> Self {
        let prefix = error.prefix().unwrap_or_default().to_owned();

        match error.kind() {
            ListingErrorKind::InvalidPrefix => {
                tracing::debug!(target: TRACING_TARGET, error = %error, "invalid prefix");
                ErrorKind::BadRequest
                    .with_message("Invalid prefix")
                    .with_context(error.message().to_owned())
                    .with_resource("listing")
            }
            ListingErrorKind::Upstream => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = ?error,
                    prefix = %prefix,
                    retryable = error.is_retryable(),
                    "object store listing failed"
                );
                let context = if error.is_retryable() {
                    "The failure may be temporary; retrying can succeed"
                } else {
                    "The object store returned an inconsistent response"
                };
                ErrorKind::BadGateway
                    .with_context(context)
                    .with_resource("listing")
            }
            ListingErrorKind::Cancelled => {
                tracing::debug!(target: TRACING_TARGET, prefix = %prefix, "listing cancelled");
                ErrorKind::ServiceUnavailable.with_resource("listing")
            }
            ListingErrorKind::Config => {
                tracing::error!(target: TRACING_TARGET, error = %error, "listing misconfigured");
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
