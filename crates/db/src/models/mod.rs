//! Row structs for the lifecycle tables.
//!
//! Each row derives `FromRow` with status columns as plain strings and
//! converts into the matching `tenderhub_core` record through `TryFrom`.
//! A status string the domain does not know means the row is corrupt and
//! is reported as `Internal`.

pub mod bid;
pub mod decision;
pub mod employee;
pub mod feedback;
pub mod tender;

use tenderhub_core::error::CoreError;
use tenderhub_core::types::DbId;

pub(crate) fn corrupt(table: &str, id: DbId, err: CoreError) -> CoreError {
    CoreError::Internal(format!("Corrupt row {id} in {table}: {err}"))
}
