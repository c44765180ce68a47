//! Manager repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ManagerEntity;
use crate::metrics::QueryTimer;

/// Repository for manager-related database operations.
#[derive(Clone)]
pub struct ManagerRepository {
    pool: PgPool,
}

impl ManagerRepository {
    /// Creates a new ManagerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a manager by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ManagerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_manager_by_id");
        let result = sqlx::query_as::<_, ManagerEntity>(
            "SELECT id, phone_number, display_name, created_at FROM managers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
