use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectType {
    Website,
    WebApp,
    MobileApp,
    ECommerce,
    CustomSoftware,
    AiVoiceAssistant,
    AiImageGeneration,
    AiVideoGeneration,
    AiChatbot,
    AiWorkflowAutomation,
    AiContentGeneration,
    AiDataAnalysis,
    AiDocumentProcessing,
    AiAgent,
    /// Any id the calculator does not know, kept verbatim. Empty means "not selected".
    Other(String),
}

impl ProjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectType::Website => "website",
            ProjectType::WebApp => "web-app",
            ProjectType::MobileApp => "mobile-app",
            ProjectType::ECommerce => "e-commerce",
            ProjectType::CustomSoftware => "custom-software",
            ProjectType::AiVoiceAssistant => "ai-voice-assistant",
            ProjectType::AiImageGeneration => "ai-image-generation",
            ProjectType::AiVideoGeneration => "ai-video-generation",
            ProjectType::AiChatbot => "ai-chatbot",
            ProjectType::AiWorkflowAutomation => "ai-workflow-automation",
            ProjectType::AiContentGeneration => "ai-content-generation",
            ProjectType::AiDataAnalysis => "ai-data-analysis",
            ProjectType::AiDocumentProcessing => "ai-document-processing",
            ProjectType::AiAgent => "ai-agent",
            ProjectType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "website" => ProjectType::Website,
            "web-app" => ProjectType::WebApp,
            "mobile-app" => ProjectType::MobileApp,
            "e-commerce" => ProjectType::ECommerce,
            "custom-software" => ProjectType::CustomSoftware,
            "ai-voice-assistant" => ProjectType::AiVoiceAssistant,
            "ai-image-generation" => ProjectType::AiImageGeneration,
            "ai-video-generation" => ProjectType::AiVideoGeneration,
            "ai-chatbot" => ProjectType::AiChatbot,
            "ai-workflow-automation" => ProjectType::AiWorkflowAutomation,
            "ai-content-generation" => ProjectType::AiContentGeneration,
            "ai-data-analysis" => ProjectType::AiDataAnalysis,
            "ai-document-processing" => ProjectType::AiDocumentProcessing,
            "ai-agent" => ProjectType::AiAgent,
            other => ProjectType::Other(other.to_string()),
        }
    }

    pub fn is_selected(&self) -> bool {
        !self.as_str().is_empty()
    }
}

impl Default for ProjectType {
    fn default() -> Self {
        ProjectType::Other(String::new())
    }
}

impl From<String> for ProjectType {
    fn from(s: String) -> Self {
        ProjectType::parse(&s)
    }
}

impl From<ProjectType> for String {
    fn from(p: ProjectType) -> Self {
        p.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
    Other(String),
}

impl Complexity {
    pub fn as_str(&self) -> &str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
            Complexity::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "simple" => Complexity::Simple,
            "medium" => Complexity::Medium,
            "complex" => Complexity::Complex,
            other => Complexity::Other(other.to_string()),
        }
    }

    pub fn is_selected(&self) -> bool {
        !self.as_str().is_empty()
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Other(String::new())
    }
}

impl From<String> for Complexity {
    fn from(s: String) -> Self {
        Complexity::parse(&s)
    }
}

impl From<Complexity> for String {
    fn from(c: Complexity) -> Self {
        c.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelinePreference {
    Asap,
    #[serde(rename = "1-month")]
    OneMonth,
    #[serde(rename = "2-months")]
    TwoMonths,
    #[serde(rename = "3-months")]
    ThreeMonths,
    Flexible,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "under-5k")]
    Under5k,
    #[serde(rename = "5k-10k")]
    From5kTo10k,
    #[serde(rename = "10k-25k")]
    From10kTo25k,
    #[serde(rename = "25k-50k")]
    From25kTo50k,
    #[serde(rename = "50k-plus")]
    Over50k,
    #[serde(rename = "discuss")]
    Discuss,
    #[default]
    #[serde(rename = "unspecified", other)]
    Unspecified,
}

/// Per-complexity multipliers of a single feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureMultipliers {
    pub simple: f64,
    pub medium: f64,
    pub complex: f64,
}

impl FeatureMultipliers {
    pub fn for_complexity(&self, complexity: &Complexity) -> f64 {
        match complexity {
            Complexity::Simple => self.simple,
            Complexity::Medium => self.medium,
            Complexity::Complex => self.complex,
            Complexity::Other(_) => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectFeature {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_hours: f64,
    pub complexity: FeatureMultipliers,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateRequest {
    pub project_type: ProjectType,
    pub complexity: Complexity,
    pub features: BTreeSet<String>,
    pub timeline: TimelinePreference,
    pub budget: BudgetRange,
    pub description: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub base_hours: u32,
    pub feature_hours: f64,
    pub complexity_multiplier: f64,
    pub hourly_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub hours: u32,
    pub cost: u32,
    pub timeline: String,
    pub breakdown: EstimateBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEstimate {
    pub id: String,
    pub request: EstimateRequest,
    pub estimate: EstimateResult,
    pub status: String,
    pub source: String,
    pub created_at: NaiveDateTime,
}
