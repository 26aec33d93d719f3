use async_trait::async_trait;
use fieldgate_application::GrantRepository;
use fieldgate_core::{AppError, AppResult, GroupId, UserId};
use fieldgate_domain::{GrantScope, HookGrant};
use sqlx::{FromRow, PgPool};
use tracing::warn;

/// PostgreSQL-backed repository for `authorize_group` and `authorize_user` rows.
#[derive(Clone)]
pub struct PostgresGrantRepository {
    pool: PgPool,
}

impl PostgresGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GrantRow {
    id: i64,
    owner_id: i64,
    hook: String,
    conditions: String,
}

impl GrantRow {
    fn into_grant(self, scope: GrantScope) -> AppResult<HookGrant> {
        let grant = HookGrant::new(self.id, scope, self.hook, self.conditions).map_err(|error| {
            AppError::Internal(format!("failed to decode grant '{}': {error}", self.id))
        })?;

        if let Err(error) = grant.condition() {
            warn!(
                grant_id = grant.grant_id(),
                scope = %grant.scope(),
                hook = grant.hook(),
                %error,
                "stored grant condition does not parse and will deny"
            );
        }

        Ok(grant)
    }
}

#[async_trait]
impl GrantRepository for PostgresGrantRepository {
    async fn list_grants_for_groups(&self, group_ids: &[GroupId]) -> AppResult<Vec<HookGrant>> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = group_ids.iter().map(GroupId::as_i64).collect();
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, group_id AS owner_id, hook, conditions
            FROM authorize_group
            WHERE group_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load group grants: {error}")))?;

        rows.into_iter()
            .map(|row| {
                let scope = GrantScope::Group(GroupId::new(row.owner_id));
                row.into_grant(scope)
            })
            .collect()
    }

    async fn list_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<HookGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id AS owner_id, hook, conditions
            FROM authorize_user
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user grants: {error}")))?;

        rows.into_iter()
            .map(|row| {
                let scope = GrantScope::User(UserId::new(row.owner_id));
                row.into_grant(scope)
            })
            .collect()
    }
}
