use async_trait::async_trait;
use fieldgate_application::GroupRepository;
use fieldgate_core::{AppError, AppResult, GroupId};
use fieldgate_domain::{Changeset, GROUP_DEFAULT_PRIMARY, Group, RegisteredResource};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

/// PostgreSQL-backed group repository.
#[derive(Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}


#[derive(Debug, FromRow)]
struct GroupRow {
    id: i64,
    name: String,
    is_default: i64,
    can_delete: bool,
    theme: String,
    landing_page: String,
    new_user_title: String,
    icon: String,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group::from_stored(
            GroupId::new(row.id),
            row.name,
            row.is_default,
            row.can_delete,
            row.theme,
            row.landing_page,
            row.new_user_title,
            row.icon,
        )
    }
}

fn map_write_error(group: &Group, error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "group name '{}' is already in use",
            group.name()
        ));
    }

    AppError::Internal(format!("failed to save group '{}': {error}", group.name()))
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, is_default, can_delete, theme, landing_page, new_user_title, icon
            FROM groups
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list groups: {error}")))?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn find_group(&self, group_id: GroupId) -> AppResult<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, is_default, can_delete, theme, landing_page, new_user_title, icon
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load group '{group_id}': {error}")))?;

        Ok(row.map(Group::from))
    }

    async fn create_group(&self, changeset: &Changeset) -> AppResult<Group> {
        // Identifier is assigned by the sequence; the draft only carries values.
        let draft = Group::from_changeset(GroupId::new(0), changeset)?;

        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO groups (
                name,
                is_default,
                can_delete,
                theme,
                landing_page,
                new_user_title,
                icon
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, is_default, can_delete, theme, landing_page, new_user_title, icon
            "#,
        )
        .bind(draft.name())
        .bind(draft.is_default())
        .bind(draft.can_delete())
        .bind(draft.theme())
        .bind(draft.landing_page())
        .bind(draft.new_user_title())
        .bind(draft.icon())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(&draft, error))?;

        Ok(Group::from(row))
    }

    async fn apply_changes(&self, group_id: GroupId, changeset: &Changeset) -> AppResult<Group> {
        let mut transaction = self.begin().await?;

        let current = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, is_default, can_delete, theme, landing_page, new_user_title, icon
            FROM groups
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(group_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock group '{group_id}': {error}")))?
        .map(Group::from)
        .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' does not exist")))?;

        let updated = current.with_changes(changeset)?;

        sqlx::query(
            r#"
            UPDATE groups
            SET name = $2,
                is_default = $3,
                can_delete = $4,
                theme = $5,
                landing_page = $6,
                new_user_title = $7,
                icon = $8,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(group_id.as_i64())
        .bind(updated.name())
        .bind(updated.is_default())
        .bind(updated.can_delete())
        .bind(updated.theme())
        .bind(updated.landing_page())
        .bind(updated.new_user_title())
        .bind(updated.icon())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_write_error(&updated, error))?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))?;

        Ok(updated)
    }

    async fn delete_group(&self, group_id: GroupId) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        // Accounts whose primary group disappears fall back to the default-primary group.
        sqlx::query(
            r#"
            UPDATE users
            SET primary_group_id = fallback.id
            FROM (SELECT id FROM groups WHERE is_default = $2 AND id <> $1 LIMIT 1) AS fallback
            WHERE users.primary_group_id = $1
            "#,
        )
        .bind(group_id.as_i64())
        .bind(GROUP_DEFAULT_PRIMARY)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to reassign primary group '{group_id}': {error}"
            ))
        })?;

        let result = sqlx::query(
            r#"
            DELETE FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete group '{group_id}': {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "group '{group_id}' does not exist"
            )));
        }

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))?;

        Ok(())
    }

    async fn update_primary_member_titles(
        &self,
        group_id: GroupId,
        title: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET title = $2
            WHERE primary_group_id = $1
            "#,
        )
        .bind(group_id.as_i64())
        .bind(title)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update titles of group '{group_id}' members: {error}"
            ))
        })?;

        Ok(result.rows_affected())
    }
}
