//! Shared listing types.

mod error;
mod listing;
mod prefix;

pub use error::{Error, ErrorKind, Result};
pub use listing::{ListPage, PageRequest, RawEntry, RawListing};
pub use prefix::{Breadcrumb, DELIMITER, Prefix};
