//! Core HTTP primitives shared by the services

pub mod http;

pub use http::*;
