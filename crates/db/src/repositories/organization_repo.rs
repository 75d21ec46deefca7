//! Read-only access to `organization` and `organization_responsible`.

use sqlx::PgConnection;
use tenderhub_core::types::DbId;

pub struct OrganizationRepo;

impl OrganizationRepo {
    pub async fn exists(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM organization WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await?;
        Ok(row.0)
    }

    /// Whether the employee is a responsible member of the organization.
    pub async fn is_responsible(
        conn: &mut PgConnection,
        organization_id: DbId,
        employee_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM organization_responsible
                WHERE organization_id = $1 AND user_id = $2
             )",
        )
        .bind(organization_id)
        .bind(employee_id)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }

    pub async fn count_responsibles(
        conn: &mut PgConnection,
        organization_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM organization_responsible WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(conn)
                .await?;
        Ok(row.0)
    }
}
