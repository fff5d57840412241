use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Query parameter extractor that rejects with a JSON [`Error`] response.
///
/// Unlike the default Axum Query extractor, failures name the offending
/// parameter where possible.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: "bucketview_server::extract::query",
        error = %rejection,
        "query parameter parsing failed"
    );

    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            let error_message = err.body_text();

            if error_message.contains("duplicate field") {
                let field_name = extract_field_name_from_error(&error_message).unwrap_or("unknown");
                ErrorKind::BadRequest
                    .with_message("Duplicate query parameter")
                    .with_context(format!(
                        "The query parameter '{field_name}' was provided multiple times"
                    ))
            } else {
                ErrorKind::BadRequest
                    .with_message("Invalid query parameters")
                    .with_context(format!("Failed to parse query string: {error_message}"))
            }
        }
        _ => ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context("The query string could not be parsed"),
    }
}

/// Best-effort field name from a serde error message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    let start = error_message.find('`')?;
    let end = error_message[start + 1..].find('`')?;
    Some(&error_message[start + 1..start + 1 + end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backticked_field_name() {
        assert_eq!(
            extract_field_name_from_error("duplicate field `prefix`"),
            Some("prefix")
        );
        assert_eq!(extract_field_name_from_error("no field here"), None);
    }
}
