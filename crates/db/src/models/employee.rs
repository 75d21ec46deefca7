//! Rows of `employee`.

use sqlx::FromRow;
use tenderhub_core::identity::Employee;
use tenderhub_core::types::DbId;

/// A row from the `employee` table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}
