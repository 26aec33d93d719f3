use async_trait::async_trait;
use fieldgate_application::UserRepository;
use fieldgate_core::{AppError, AppResult, GroupId, UserId, UserIdentity};
use fieldgate_domain::MembershipIndex;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for accounts and `group_users` memberships.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    user_name: String,
    display_name: String,
    email: String,
    primary_group_id: i64,
}

#[derive(Debug, FromRow)]
struct MembershipRow {
    user_id: i64,
    group_id: i64,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_identity(&self, user_id: UserId) -> AppResult<Option<UserIdentity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, user_name, display_name, email, primary_group_id
            FROM users
            WHERE id = $1 AND flag_enabled
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user '{user_id}': {error}")))?;

        Ok(row.map(|row| {
            UserIdentity::new(
                UserId::new(row.id),
                row.user_name,
                row.display_name,
                row.email,
                GroupId::new(row.primary_group_id),
            )
        }))
    }

    async fn list_group_ids(&self, user_id: UserId) -> AppResult<Vec<GroupId>> {
        let rows = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT group_id
            FROM group_users
            WHERE user_id = $1
            ORDER BY group_id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load memberships of user '{user_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(GroupId::new).collect())
    }

    async fn membership_index(&self, user_ids: &[UserId]) -> AppResult<MembershipIndex> {
        if user_ids.is_empty() {
            return Ok(MembershipIndex::new());
        }

        let ids: Vec<i64> = user_ids.iter().map(UserId::as_i64).collect();
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT user_id, group_id
            FROM group_users
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load memberships: {error}")))?;

        let mut index = MembershipIndex::new();
        for row in rows {
            index.insert(UserId::new(row.user_id), [GroupId::new(row.group_id)]);
        }

        Ok(index)
    }

    async fn find_registered_emails(&self, emails: &[String]) -> AppResult<Vec<String>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, String>(
            r#"
            SELECT lower(email)
            FROM users
            WHERE lower(email) = ANY($1)
            "#,
        )
        .bind(emails)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up emails: {error}")))
    }
}
