use async_trait::async_trait;
use fieldgate_application::{InvitationRepository, StudioRepository};
use fieldgate_core::{AppError, AppResult, InvitationId, StudioId, TaskId, UserId};
use fieldgate_domain::{Changeset, Invitation, RegisteredResource, Studio, StudioDraft, Task};
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for studios and their invitations.
#[derive(Clone)]
pub struct PostgresStudioRepository {
    pool: PgPool,
}

impl PostgresStudioRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}


#[derive(Debug, FromRow)]
struct StudioRow {
    id: i64,
    owner_id: i64,
    objective: String,
    instructions: String,
    comments: String,
    url: String,
    flag_recording: bool,
    flag_questionnaire: bool,
}

impl From<StudioRow> for Studio {
    fn from(row: StudioRow) -> Self {
        Studio::new(
            StudioId::new(row.id),
            UserId::new(row.owner_id),
            row.objective,
            row.instructions,
            row.comments,
            row.url,
            row.flag_recording,
            row.flag_questionnaire,
        )
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    studio_id: i64,
    position: i32,
    title: String,
    description: String,
    max_duration_secs: i64,
    url: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task::new(
            TaskId::new(row.id),
            StudioId::new(row.studio_id),
            row.position,
            row.title,
            row.description,
            row.max_duration_secs,
            row.url,
        )
    }
}

#[derive(Debug, FromRow)]
struct InvitationRow {
    id: i64,
    studio_id: i64,
    token: String,
    email: String,
    locale: String,
    title: String,
    flag_completed: bool,
    flag_evaluated: bool,
}

impl From<InvitationRow> for Invitation {
    fn from(row: InvitationRow) -> Self {
        Invitation::from_stored(
            InvitationId::new(row.id),
            StudioId::new(row.studio_id),
            row.token,
            row.email,
            row.locale,
            row.title,
            row.flag_completed,
            row.flag_evaluated,
        )
    }
}

fn map_studio_write_error(user_id: UserId, error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::Validation(format!("user '{user_id}' does not exist"));
    }

    AppError::Internal(format!("failed to save studio: {error}"))
}

fn map_invitation_write_error(invitation: &Invitation, error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "'{}' is already invited to studio '{}'",
            invitation.email(),
            invitation.studio_id()
        ));
    }

    AppError::Internal(format!(
        "failed to save invitation for '{}': {error}",
        invitation.email()
    ))
}

#[async_trait]
impl StudioRepository for PostgresStudioRepository {
    async fn find_studio(&self, studio_id: StudioId) -> AppResult<Option<Studio>> {
        let row = sqlx::query_as::<_, StudioRow>(
            r#"
            SELECT id, owner_id, objective, instructions, comments, url,
                   flag_recording, flag_questionnaire
            FROM studios
            WHERE id = $1
            "#,
        )
        .bind(studio_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load studio '{studio_id}': {error}"))
        })?;

        Ok(row.map(Studio::from))
    }

    async fn create_studio(&self, owner: UserId, draft: &StudioDraft) -> AppResult<Studio> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let pending = draft.to_studio(StudioId::new(0), owner);
        let studio = sqlx::query_as::<_, StudioRow>(
            r#"
            INSERT INTO studios (
                owner_id,
                objective,
                instructions,
                comments,
                url,
                flag_recording,
                flag_questionnaire
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, objective, instructions, comments, url,
                      flag_recording, flag_questionnaire
            "#,
        )
        .bind(owner.as_i64())
        .bind(pending.objective())
        .bind(pending.instructions())
        .bind(pending.comments())
        .bind(pending.url())
        .bind(pending.flag_recording())
        .bind(pending.flag_questionnaire())
        .fetch_one(&mut *transaction)
        .await
        .map(Studio::from)
        .map_err(|error| map_studio_write_error(owner, error))?;

        for (task, position) in draft.tasks().iter().zip(0..) {
            let task = task.to_task(TaskId::new(0), studio.id(), position);
            sqlx::query(
                r#"
                INSERT INTO tasks (studio_id, position, title, description, max_duration_secs, url)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(studio.id().as_i64())
            .bind(task.position())
            .bind(task.title())
            .bind(task.description())
            .bind(task.max_duration_secs())
            .bind(task.url())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to save task '{}' of studio '{}': {error}",
                    task.title(),
                    studio.id()
                ))
            })?;
        }

        for participant in draft.participants() {
            sqlx::query(
                r#"
                INSERT INTO studio_users (studio_id, user_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(studio.id().as_i64())
            .bind(participant.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_studio_write_error(*participant, error))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(studio)
    }

    async fn list_tasks(&self, studio_id: StudioId) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, studio_id, position, title, description, max_duration_secs, url
            FROM tasks
            WHERE studio_id = $1
            ORDER BY position
            "#,
        )
        .bind(studio_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list tasks of studio '{studio_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn list_participants(&self, studio_id: StudioId) -> AppResult<Vec<UserId>> {
        let user_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM studio_users
            WHERE studio_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(studio_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list participants of studio '{studio_id}': {error}"
            ))
        })?;

        Ok(user_ids.into_iter().map(UserId::new).collect())
    }
}

#[async_trait]
impl InvitationRepository for PostgresStudioRepository {
    async fn find_invitation(&self, invitation_id: InvitationId) -> AppResult<Option<Invitation>> {
        let row = sqlx::query_as::<_, InvitationRow>(
            r#"
            SELECT id, studio_id, token, email, locale, title, flag_completed, flag_evaluated
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(invitation_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load invitation '{invitation_id}': {error}"
            ))
        })?;

        Ok(row.map(Invitation::from))
    }

    async fn list_invitations_for_studio(
        &self,
        studio_id: StudioId,
    ) -> AppResult<Vec<Invitation>> {
        let rows = sqlx::query_as::<_, InvitationRow>(
            r#"
            SELECT id, studio_id, token, email, locale, title, flag_completed, flag_evaluated
            FROM invitations
            WHERE studio_id = $1
            ORDER BY id
            "#,
        )
        .bind(studio_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list invitations of studio '{studio_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(Invitation::from).collect())
    }

    async fn create_invitations(
        &self,
        studio_id: StudioId,
        drafts: &[(String, Changeset)],
    ) -> AppResult<Vec<Invitation>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let mut created = Vec::with_capacity(drafts.len());
        for (token, changeset) in drafts {
            let draft = Invitation::from_changeset(
                InvitationId::new(0),
                studio_id,
                token.as_str(),
                changeset,
            )?;

            let row = sqlx::query_as::<_, InvitationRow>(
                r#"
                INSERT INTO invitations (
                    studio_id,
                    token,
                    email,
                    locale,
                    title,
                    flag_completed,
                    flag_evaluated
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, studio_id, token, email, locale, title, flag_completed, flag_evaluated
                "#,
            )
            .bind(studio_id.as_i64())
            .bind(draft.token())
            .bind(draft.email())
            .bind(draft.locale())
            .bind(draft.title())
            .bind(draft.flag_completed())
            .bind(draft.flag_evaluated())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| map_invitation_write_error(&draft, error))?;

            created.push(Invitation::from(row));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(created)
    }

    async fn apply_changes(
        &self,
        invitation_id: InvitationId,
        changeset: &Changeset,
    ) -> AppResult<Invitation> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let current = sqlx::query_as::<_, InvitationRow>(
            r#"
            SELECT id, studio_id, token, email, locale, title, flag_completed, flag_evaluated
            FROM invitations
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(invitation_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to lock invitation '{invitation_id}': {error}"
            ))
        })?
        .map(Invitation::from)
        .ok_or_else(|| {
            AppError::NotFound(format!("invitation '{invitation_id}' does not exist"))
        })?;

        let updated = current.with_changes(changeset)?;

        sqlx::query(
            r#"
            UPDATE invitations
            SET email = $2,
                locale = $3,
                title = $4,
                flag_completed = $5,
                flag_evaluated = $6
            WHERE id = $1
            "#,
        )
        .bind(invitation_id.as_i64())
        .bind(updated.email())
        .bind(updated.locale())
        .bind(updated.title())
        .bind(updated.flag_completed())
        .bind(updated.flag_evaluated())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_invitation_write_error(&updated, error))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(updated)
    }
}
