use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

#[derive(Debug)]
pub struct AuditEvent<'a> {
    pub user_id: Option<Uuid>,
    pub action: &'a str,
    pub resource: &'a str,
    pub metadata: Value,
}

impl<'a> AuditEvent<'a> {
    pub fn new(user_id: Uuid, action: &'a str, resource: &'a str, metadata: Value) -> Self {
        Self {
            user_id: Some(user_id),
            action,
            resource,
            metadata,
        }
    }
}

pub async fn log_audit(pool: &DbPool, event: &AuditEvent<'_>) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event.user_id)
    .bind(event.action)
    .bind(event.resource)
    .bind(&event.metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Write an audit row without failing the caller; errors are only logged.
pub async fn record(pool: &DbPool, event: AuditEvent<'_>) {
    if let Err(err) = log_audit(pool, &event).await {
        tracing::warn!(error = %err, action = event.action, "audit log failed");
    }
}
