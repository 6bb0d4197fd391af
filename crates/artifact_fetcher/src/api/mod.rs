//! Registry API client.

pub mod client;
