//! Read-only access to the `employee` table.

use sqlx::PgConnection;
use tenderhub_core::types::DbId;

use crate::models::employee::EmployeeRow;

const COLUMNS: &str = "id, username, first_name, last_name";

pub struct EmployeeRepo;

impl EmployeeRepo {
    pub async fn find_by_username(
        conn: &mut PgConnection,
        username: &str,
    ) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE username = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(username)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
