//! HTTP handlers for all API routes.

pub mod system;
pub mod substances;
pub mod similarity;
pub mod snapshot;
