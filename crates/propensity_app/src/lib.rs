//! Web front end for the wellness tourism purchase propensity model.

pub mod context;
pub mod error;
pub mod handler;
pub mod render;
pub mod routes;
