//! Project estimate calculator.
//!
//! `calculate_project_estimate` is pure: hours come from the project type's
//! base hours plus the selected features, scaled by the complexity
//! multiplier. Unknown project types, complexities and feature ids fall back
//! to defaults instead of failing.

use crate::errors::AppError;
use crate::models::{
    Complexity, EstimateBreakdown, EstimateRequest, EstimateResult, FeatureMultipliers,
    ProjectFeature, ProjectType,
};

pub const HOURLY_RATE: u32 = 25;
pub const DEFAULT_BASE_HOURS: u32 = 80;
pub const HOURS_PER_WEEK: u32 = 40;

const fn multipliers(simple: f64, medium: f64, complex: f64) -> FeatureMultipliers {
    FeatureMultipliers {
        simple,
        medium,
        complex,
    }
}

static PROJECT_FEATURES: [ProjectFeature; 10] = [
    ProjectFeature {
        id: "responsive-design",
        name: "Responsive Design",
        description: "Mobile-first responsive layout",
        base_hours: 12.0,
        complexity: multipliers(1.0, 1.2, 1.4),
    },
    ProjectFeature {
        id: "user-auth",
        name: "User Authentication",
        description: "Login, registration, password reset",
        base_hours: 20.0,
        complexity: multipliers(1.0, 1.3, 1.6),
    },
    ProjectFeature {
        id: "database-integration",
        name: "Database Integration",
        description: "Data storage and retrieval",
        base_hours: 15.0,
        complexity: multipliers(1.0, 1.2, 1.5),
    },
    ProjectFeature {
        id: "payment-gateway",
        name: "Payment Integration",
        description: "Stripe, PayPal, or other payment systems",
        base_hours: 25.0,
        complexity: multipliers(1.1, 1.4, 1.8),
    },
    ProjectFeature {
        id: "admin-panel",
        name: "Admin Dashboard",
        description: "Content management and analytics",
        base_hours: 35.0,
        complexity: multipliers(1.0, 1.3, 2.0),
    },
    ProjectFeature {
        id: "api-integration",
        name: "Third-party APIs",
        description: "External service integrations",
        base_hours: 12.0,
        complexity: multipliers(1.0, 1.2, 1.6),
    },
    ProjectFeature {
        id: "real-time-features",
        name: "Real-time Features",
        description: "Chat, notifications, live updates",
        base_hours: 25.0,
        complexity: multipliers(1.1, 1.5, 2.0),
    },
    ProjectFeature {
        id: "search-functionality",
        name: "Advanced Search",
        description: "Filtering, sorting, full-text search",
        base_hours: 15.0,
        complexity: multipliers(1.0, 1.2, 1.6),
    },
    ProjectFeature {
        id: "file-upload",
        name: "File Upload/Management",
        description: "Image/document upload and processing",
        base_hours: 12.0,
        complexity: multipliers(1.0, 1.2, 1.5),
    },
    ProjectFeature {
        id: "email-system",
        name: "Email System",
        description: "Automated emails and notifications",
        base_hours: 10.0,
        complexity: multipliers(1.0, 1.1, 1.3),
    },
];

pub fn project_features() -> &'static [ProjectFeature] {
    &PROJECT_FEATURES
}

pub fn find_feature(id: &str) -> Option<&'static ProjectFeature> {
    PROJECT_FEATURES.iter().find(|f| f.id == id)
}

pub fn project_base_hours(project_type: &ProjectType) -> u32 {
    match project_type {
        ProjectType::Website => 25,
        ProjectType::WebApp => 50,
        ProjectType::MobileApp => 80,
        ProjectType::ECommerce => 65,
        ProjectType::CustomSoftware => 100,
        _ => DEFAULT_BASE_HOURS,
    }
}

pub fn complexity_multiplier(complexity: &Complexity) -> f64 {
    match complexity {
        Complexity::Simple => 1.0,
        Complexity::Medium => 1.2,
        Complexity::Complex => 1.5,
        Complexity::Other(_) => 1.0,
    }
}

pub fn timeline_bucket(total_hours: u32) -> &'static str {
    let weeks = total_hours.div_ceil(HOURS_PER_WEEK);
    match weeks {
        0..=2 => "1-2 weeks",
        3..=4 => "2-4 weeks",
        5..=8 => "1-2 months",
        9..=12 => "2-3 months",
        _ => "3+ months",
    }
}

pub fn calculate_project_estimate(request: &EstimateRequest) -> EstimateResult {
    let base_hours = project_base_hours(&request.project_type);

    let feature_hours: f64 = request
        .features
        .iter()
        .filter_map(|id| find_feature(id))
        .map(|f| f.base_hours * f.complexity.for_complexity(&request.complexity))
        .sum();

    let multiplier = complexity_multiplier(&request.complexity);
    let hours = ((f64::from(base_hours) + feature_hours) * multiplier).round() as u32;

    EstimateResult {
        hours,
        cost: hours * HOURLY_RATE,
        timeline: timeline_bucket(hours).to_string(),
        breakdown: EstimateBreakdown {
            base_hours,
            feature_hours,
            complexity_multiplier: multiplier,
            hourly_rate: HOURLY_RATE,
        },
    }
}

/// The calculator needs a project type and complexity before it shows a number.
pub fn validate_for_calculation(request: &EstimateRequest) -> Result<(), AppError> {
    if !request.project_type.is_selected() || !request.complexity.is_selected() {
        return Err(AppError::Validation(
            "Please select project type and complexity level.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_for_submission(request: &EstimateRequest) -> Result<(), AppError> {
    validate_for_calculation(request)?;
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide your name and email to receive the estimate.".to_string(),
        ));
    }
    if !crate::models::is_valid_email(request.email.trim()) {
        return Err(AppError::Validation("Please enter a valid email address.".to_string()));
    }
    Ok(())
}
