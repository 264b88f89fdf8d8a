use serde::Serialize;

use crate::aggregate::SpendingSnapshot;
use crate::coach::CoachReply;
use crate::expense::ExpenseRecord;
use crate::profile::ProfileSummary;
use crate::view::DashboardView;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub profile: ProfileSummary,
    pub dashboard: DashboardView,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogData {
    pub expense: ExpenseRecord,
    pub snapshot: SpendingSnapshot,
    pub dashboard: DashboardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<CoachData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachData {
    pub reply: CoachReply,
    pub message: String,
}

impl CoachData {
    pub fn from_reply(reply: CoachReply) -> Self {
        let message = reply.display_text().to_string();
        Self { reply, message }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetData {
    pub cleared_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
}
