//! Raw club records: typed rows, identifier-keyed tables and the loader that
//! obtains them from the cache or the website.

pub mod loader;
pub mod model;
pub mod tables;

pub use loader::{Fetcher, HttpFetcher, fetch_document, load_document, load_tables, refresh_tables};
pub use tables::Tables;
