use fieldgate_core::{AppError, AppResult, NonEmptyString, StudioId, TaskId, UserId};
use serde::{Deserialize, Serialize};

/// Usability-testing study owned by an analyst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    id: StudioId,
    owner: UserId,
    objective: String,
    instructions: String,
    comments: String,
    url: String,
    flag_recording: bool,
    flag_questionnaire: bool,
}

impl Studio {
    /// Resource type label used in audit events.
    pub const RESOURCE_TYPE: &'static str = "studio";

    /// Creates a studio record.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: StudioId,
        owner: UserId,
        objective: impl Into<String>,
        instructions: impl Into<String>,
        comments: impl Into<String>,
        url: impl Into<String>,
        flag_recording: bool,
        flag_questionnaire: bool,
    ) -> Self {
        Self {
            id,
            owner,
            objective: objective.into(),
            instructions: instructions.into(),
            comments: comments.into(),
            url: url.into(),
            flag_recording,
            flag_questionnaire,
        }
    }

    /// Returns the studio identifier.
    #[must_use]
    pub fn id(&self) -> StudioId {
        self.id
    }

    /// Returns the owning analyst.
    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the study objective.
    #[must_use]
    pub fn objective(&self) -> &str {
        self.objective.as_str()
    }

    /// Returns the instructions shown to participants.
    #[must_use]
    pub fn instructions(&self) -> &str {
        self.instructions.as_str()
    }

    /// Returns free-form analyst comments.
    #[must_use]
    pub fn comments(&self) -> &str {
        self.comments.as_str()
    }

    /// Returns the site under test.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns whether sessions are recorded.
    #[must_use]
    pub fn flag_recording(&self) -> bool {
        self.flag_recording
    }

    /// Returns whether participants answer a questionnaire.
    #[must_use]
    pub fn flag_questionnaire(&self) -> bool {
        self.flag_questionnaire
    }
}

/// One timed step participants perform during a studio session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    studio_id: StudioId,
    position: i32,
    title: String,
    description: String,
    max_duration_secs: i64,
    url: String,
}

impl Task {
    /// Creates a task record.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: TaskId,
        studio_id: StudioId,
        position: i32,
        title: impl Into<String>,
        description: impl Into<String>,
        max_duration_secs: i64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            studio_id,
            position,
            title: title.into(),
            description: description.into(),
            max_duration_secs,
            url: url.into(),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning studio.
    #[must_use]
    pub fn studio_id(&self) -> StudioId {
        self.studio_id
    }

    /// Returns the zero-based order of the task within its studio.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the time limit in seconds.
    #[must_use]
    pub fn max_duration_secs(&self) -> i64 {
        self.max_duration_secs
    }

    /// Returns the page the task starts on.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Validated task of a studio that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: NonEmptyString,
    description: String,
    max_duration_secs: i64,
    url: NonEmptyString,
}

impl TaskDraft {
    /// Validates a task: title and url are required, the time limit must be positive.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        max_duration_secs: i64,
        url: impl Into<String>,
    ) -> AppResult<Self> {
        let title = NonEmptyString::new(title.into().trim())
            .map_err(|_| AppError::Validation("task title is required".to_owned()))?;
        let url = NonEmptyString::new(url.into().trim())
            .map_err(|_| AppError::Validation(format!("task '{title}' needs a url")))?;
        if max_duration_secs <= 0 {
            return Err(AppError::Validation(format!(
                "task '{title}' needs a positive duration, got {max_duration_secs}"
            )));
        }

        Ok(Self {
            title,
            description: description.into().trim().to_owned(),
            max_duration_secs,
            url,
        })
    }

    /// Materializes the stored task at `position` within `studio_id`.
    #[must_use]
    pub fn to_task(&self, id: TaskId, studio_id: StudioId, position: i32) -> Task {
        Task::new(
            id,
            studio_id,
            position,
            self.title.as_str(),
            self.description.as_str(),
            self.max_duration_secs,
            self.url.as_str(),
        )
    }
}

/// Validated definition of a new studio with its ordered tasks and the
/// existing accounts taking part in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioDraft {
    objective: NonEmptyString,
    instructions: String,
    comments: String,
    url: NonEmptyString,
    flag_recording: bool,
    flag_questionnaire: bool,
    tasks: Vec<TaskDraft>,
    participants: Vec<UserId>,
}

impl StudioDraft {
    /// Starts a draft; objective and url are required.
    pub fn new(objective: impl Into<String>, url: impl Into<String>) -> AppResult<Self> {
        let objective = NonEmptyString::new(objective.into().trim())
            .map_err(|_| AppError::Validation("studio objective is required".to_owned()))?;
        let url = NonEmptyString::new(url.into().trim())
            .map_err(|_| AppError::Validation("studio url is required".to_owned()))?;

        Ok(Self {
            objective,
            instructions: String::new(),
            comments: String::new(),
            url,
            flag_recording: false,
            flag_questionnaire: false,
            tasks: Vec::new(),
            participants: Vec::new(),
        })
    }

    /// Sets the instructions shown to participants.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into().trim().to_owned();
        self
    }

    /// Sets the analyst comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into().trim().to_owned();
        self
    }

    /// Sets the recording and questionnaire flags.
    #[must_use]
    pub fn with_flags(mut self, flag_recording: bool, flag_questionnaire: bool) -> Self {
        self.flag_recording = flag_recording;
        self.flag_questionnaire = flag_questionnaire;
        self
    }

    /// Appends a task after the ones already added.
    #[must_use]
    pub fn with_task(mut self, task: TaskDraft) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a participating account; repeated accounts are kept once.
    #[must_use]
    pub fn with_participant(mut self, user_id: UserId) -> Self {
        if !self.participants.contains(&user_id) {
            self.participants.push(user_id);
        }
        self
    }

    /// Returns tasks in session order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskDraft] {
        self.tasks.as_slice()
    }

    /// Returns participating accounts in the order they were added.
    #[must_use]
    pub fn participants(&self) -> &[UserId] {
        self.participants.as_slice()
    }

    /// Materializes the stored studio owned by `owner`.
    #[must_use]
    pub fn to_studio(&self, id: StudioId, owner: UserId) -> Studio {
        Studio::new(
            id,
            owner,
            self.objective.as_str(),
            self.instructions.as_str(),
            self.comments.as_str(),
            self.url.as_str(),
            self.flag_recording,
            self.flag_questionnaire,
        )
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::{AppError, StudioId, TaskId, UserId};

    use super::{StudioDraft, TaskDraft};

    #[test]
    fn draft_requires_objective_and_url() {
        assert!(matches!(
            StudioDraft::new("  ", "https://shop.example.com"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            StudioDraft::new("Checkout", ""),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn task_draft_rejects_non_positive_duration() {
        let result = TaskDraft::new("Pay", "", 0, "https://shop.example.com/cart");
        assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("Pay")));
    }

    #[test]
    fn draft_keeps_task_order_and_unique_participants() {
        let (Ok(first), Ok(second)) = (
            TaskDraft::new(" Find item ", "search the catalogue", 120, "https://shop.example.com"),
            TaskDraft::new("Pay", "", 60, "https://shop.example.com/cart"),
        ) else {
            panic!("tasks should be valid");
        };
        let draft = match StudioDraft::new(" Checkout usability ", "https://shop.example.com") {
            Ok(draft) => draft,
            Err(error) => panic!("unexpected error: {error}"),
        }
        .with_flags(true, false)
        .with_task(first)
        .with_task(second)
        .with_participant(UserId::new(13))
        .with_participant(UserId::new(13));

        let studio = draft.to_studio(StudioId::new(7), UserId::new(12));
        assert_eq!(studio.objective(), "Checkout usability");
        assert!(studio.flag_recording());
        assert_eq!(draft.participants(), &[UserId::new(13)]);

        let tasks: Vec<_> = draft
            .tasks()
            .iter()
            .zip(0..)
            .map(|(task, position)| {
                task.to_task(TaskId::new(i64::from(position)), studio.id(), position)
            })
            .collect();
        assert_eq!(tasks[0].title(), "Find item");
        assert_eq!(tasks[1].position(), 1);
        assert_eq!(tasks[1].max_duration_secs(), 60);
    }
}
