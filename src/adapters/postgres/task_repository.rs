//! PostgreSQL implementation of TaskRepository.
//!
//! Filtering, pagination, and statistics are pushed into SQL. Every statement
//! carries `user_id = $1` so no query can reach another owner's rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, TaskId, Timestamp, UserId};
use crate::domain::task::{Page, PageRequest, Task, TaskFilter, TaskStats, TaskStatus};
use crate::ports::TaskRepository;

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

/// PostgreSQL implementation of TaskRepository.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn uuids(ids: &[TaskId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

fn db_error(action: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::database(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: &Task) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, user_id, title, description, status, priority, due_date,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.user_id().as_uuid())
        .bind(task.title())
        .bind(task.description())
        .bind(task.status().as_str())
        .bind(task.priority().as_str())
        .bind(task.due_date().map(|d| *d.as_datetime()))
        .bind(task.created_at().as_datetime())
        .bind(task.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert task"))?;

        Ok(())
    }

    async fn find_by_id(&self, owner: &UserId, id: &TaskId) -> Result<Option<Task>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND id = $2",
            TASK_COLUMNS
        ))
        .bind(owner.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch task"))?;

        row.map(row_to_task).transpose()
    }

    async fn find_by_owner_with_filters(
        &self,
        owner: &UserId,
        filter: TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let priority = filter.priority.map(|p| p.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR priority = $3)
            "#,
        )
        .bind(owner.as_uuid())
        .bind(status)
        .bind(priority)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count tasks"))?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR priority = $3)
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#,
            TASK_COLUMNS
        ))
        .bind(owner.as_uuid())
        .bind(status)
        .bind(priority)
        .bind(i64::from(page.limit()))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list tasks"))?;

        let items = rows
            .into_iter()
            .map(row_to_task)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn update(&self, task: &Task) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                title = $3,
                description = $4,
                status = $5,
                priority = $6,
                due_date = $7,
                updated_at = $8
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(task.user_id().as_uuid())
        .bind(task.id().as_uuid())
        .bind(task.title())
        .bind(task.description())
        .bind(task.status().as_str())
        .bind(task.priority().as_str())
        .bind(task.due_date().map(|d| *d.as_datetime()))
        .bind(task.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update task"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TaskNotFound,
                format!("Task not found: {}", task.id()),
            ));
        }

        Ok(())
    }

    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND id = $2")
            .bind(owner.as_uuid())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete task"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_owned_ids(
        &self,
        owner: &UserId,
        ids: &[TaskId],
    ) -> Result<Vec<TaskId>, DomainError> {
        let found: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM tasks WHERE user_id = $1 AND id = ANY($2)")
                .bind(owner.as_uuid())
                .bind(uuids(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("check task ownership"))?;

        Ok(found.into_iter().map(TaskId::from_uuid).collect())
    }

    async fn bulk_update_status(
        &self,
        owner: &UserId,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<Vec<TaskId>, DomainError> {
        let changed: Vec<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE tasks SET status = $3, updated_at = now()
            WHERE user_id = $1 AND id = ANY($2) AND status <> $3
            RETURNING id
            "#,
        )
        .bind(owner.as_uuid())
        .bind(uuids(ids))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("bulk update tasks"))?;

        Ok(changed.into_iter().map(TaskId::from_uuid).collect())
    }

    async fn bulk_delete(&self, owner: &UserId, ids: &[TaskId]) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND id = ANY($2)")
            .bind(owner.as_uuid())
            .bind(uuids(ids))
            .execute(&self.pool)
            .await
            .map_err(db_error("bulk delete tasks"))?;

        Ok(result.rows_affected())
    }

    async fn aggregate_stats(&self, owner: &UserId) -> Result<TaskStats, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'COMPLETED') AS completed,
                COUNT(*) FILTER (WHERE status = 'IN_PROGRESS') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE priority = 'HIGH') AS high_priority
            FROM tasks
            WHERE user_id = $1
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("aggregate task stats"))?;

        let count = |name: &str| -> Result<u64, DomainError> {
            row.try_get::<i64, _>(name)
                .map(|n| n.max(0) as u64)
                .map_err(db_error("read task stats"))
        };

        Ok(TaskStats {
            total: count("total")?,
            completed: count("completed")?,
            in_progress: count("in_progress")?,
            pending: count("pending")?,
            high_priority: count("high_priority")?,
        })
    }

    async fn delete_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1")
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete tasks by owner"))?;

        Ok(result.rows_affected())
    }
}

fn row_to_task(row: PgRow) -> Result<Task, DomainError> {
    let column = db_error("read task row");

    let id: Uuid = row.try_get("id").map_err(&column)?;
    let user_id: Uuid = row.try_get("user_id").map_err(&column)?;
    let title: String = row.try_get("title").map_err(&column)?;
    let description: Option<String> = row.try_get("description").map_err(&column)?;
    let status: String = row.try_get("status").map_err(&column)?;
    let priority: String = row.try_get("priority").map_err(&column)?;
    let due_date: Option<DateTime<Utc>> = row.try_get("due_date").map_err(&column)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(&column)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(&column)?;

    let status = status
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid task status: {}", e)))?;
    let priority = priority
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid task priority: {}", e)))?;

    Ok(Task::reconstitute(
        TaskId::from_uuid(id),
        UserId::from_uuid(user_id),
        title,
        description,
        status,
        priority,
        due_date.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
