use fieldgate_application::StudioDefinition;
use fieldgate_core::{AppResult, UserId};
use fieldgate_domain::{StudioDraft, Task, TaskDraft};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::InvitationResponse;

/// One task of a studio being defined.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-request.ts"
)]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub max_duration_secs: i64,
    pub url: String,
}

/// Incoming payload for defining a studio.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/define-studio-request.ts"
)]
pub struct DefineStudioRequest {
    pub objective: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub comments: String,
    pub url: String,
    #[serde(default)]
    pub flag_recording: bool,
    #[serde(default)]
    pub flag_questionnaire: bool,
    #[serde(default)]
    pub tasks: Vec<TaskRequest>,
    #[serde(default)]
    pub participant_ids: Vec<i64>,
    #[serde(default)]
    pub invitee_emails: Vec<String>,
}

impl DefineStudioRequest {
    /// Validates the payload into a studio draft and the addresses to invite.
    pub fn into_draft(self) -> AppResult<(StudioDraft, Vec<String>)> {
        let mut draft = StudioDraft::new(self.objective, self.url)?
            .with_instructions(self.instructions)
            .with_comments(self.comments)
            .with_flags(self.flag_recording, self.flag_questionnaire);
        for task in self.tasks {
            draft = draft.with_task(TaskDraft::new(
                task.title,
                task.description,
                task.max_duration_secs,
                task.url,
            )?);
        }
        for participant_id in self.participant_ids {
            draft = draft.with_participant(UserId::new(participant_id));
        }

        Ok((draft, self.invitee_emails))
    }
}

/// API representation of a studio task.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-response.ts"
)]
pub struct TaskResponse {
    pub id: i64,
    pub position: i32,
    pub title: String,
    pub description: String,
    pub max_duration_secs: i64,
    pub url: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().as_i64(),
            position: task.position(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            max_duration_secs: task.max_duration_secs(),
            url: task.url().to_owned(),
        }
    }
}

/// API representation of a studio with its tasks, participants and invitations.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/studio-response.ts"
)]
pub struct StudioResponse {
    pub id: i64,
    pub owner_id: i64,
    pub objective: String,
    pub instructions: String,
    pub comments: String,
    pub url: String,
    pub flag_recording: bool,
    pub flag_questionnaire: bool,
    pub tasks: Vec<TaskResponse>,
    pub participant_ids: Vec<i64>,
    pub invitations: Vec<InvitationResponse>,
}

impl From<StudioDefinition> for StudioResponse {
    fn from(definition: StudioDefinition) -> Self {
        let studio = definition.studio;
        Self {
            id: studio.id().as_i64(),
            owner_id: studio.owner().as_i64(),
            objective: studio.objective().to_owned(),
            instructions: studio.instructions().to_owned(),
            comments: studio.comments().to_owned(),
            url: studio.url().to_owned(),
            flag_recording: studio.flag_recording(),
            flag_questionnaire: studio.flag_questionnaire(),
            tasks: definition.tasks.into_iter().map(TaskResponse::from).collect(),
            participant_ids: definition
                .participants
                .iter()
                .map(UserId::as_i64)
                .collect(),
            invitations: definition
                .invitations
                .into_iter()
                .map(InvitationResponse::from)
                .collect(),
        }
    }
}
