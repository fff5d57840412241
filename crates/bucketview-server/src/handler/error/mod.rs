//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod listing_error;

pub use http_error::{Error, ErrorKind, Result};
