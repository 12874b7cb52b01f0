//! In-memory adapters for the segment and history ports.
//!
//! Used by the server when no database is configured and by behaviour tests.
//! One [`InMemorySegmentStore`] backs both ports so that deletion cascades and
//! history checks see the same state, mirroring the PostgreSQL schema.

mod store;

pub use store::InMemorySegmentStore;
