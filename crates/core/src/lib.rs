//! Domain layer for tenders and bids.
//!
//! Holds the records, status enums with their transition tables, quorum
//! arithmetic, field validation, authorization rules, and the storage port.
//! Nothing here performs I/O.

pub mod authz;
pub mod bid;
pub mod decision;
pub mod error;
pub mod feedback;
pub mod identity;
pub mod store;
pub mod tender;
pub mod types;
