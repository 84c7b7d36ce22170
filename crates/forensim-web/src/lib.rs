//! forensim-web: HTTP host for the similarity network.
//! Provides:
//!   - Interactive recomputation for any weight / threshold / filter tuple
//!   - Chemical-filter options and dataset summary
//!   - A published "current snapshot" with last-request-wins semantics
//!   - Edge-list CSV export
//!   - Server-sent events when a snapshot is published

pub mod error;
pub mod router;
pub mod handlers;
pub mod state;
pub mod sse;
