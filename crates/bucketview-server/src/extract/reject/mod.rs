//! Extractors that reject with [`Error`](crate::handler::Error) responses.

mod enhanced_query;

pub use enhanced_query::Query;
