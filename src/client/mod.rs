//! Transport for the admin REST API

pub mod http;

pub use http::HttpBackend;
