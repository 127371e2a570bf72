pub mod appointment;
pub mod conversation;
pub mod estimate;
pub mod forms;

use std::sync::LazyLock;

use regex::Regex;

pub use appointment::{Appointment, AppointmentStatus, DraftAppointment, StoredAppointment};
pub use conversation::{Channel, ChatMessage, DialogueState, Sender, Slot};
pub use estimate::{
    BudgetRange, Complexity, EstimateBreakdown, EstimateRequest, EstimateResult,
    FeatureMultipliers, ProjectFeature, ProjectType, StoredEstimate, TimelinePreference,
};
pub use forms::{CareerApplication, ContactForm, ResumeUpload, StoredCareerApplication};

pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{EMAIL_PATTERN}$")).expect("valid email regex"));

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}
