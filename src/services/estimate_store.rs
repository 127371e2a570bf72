use anyhow::Context;
use async_trait::async_trait;

use crate::db::{queries, Db};
use crate::models::{EstimateRequest, EstimateResult, StoredEstimate};

pub const ESTIMATE_SOURCE: &str = "website-calculator";

#[async_trait]
pub trait EstimateService: Send + Sync {
    async fn submit(&self, request: &EstimateRequest, estimate: &EstimateResult) -> anyhow::Result<String>;

    /// Newest first.
    async fn list(&self, limit: Option<i64>) -> anyhow::Result<Vec<StoredEstimate>>;

    async fn by_email(&self, email: &str) -> anyhow::Result<Vec<StoredEstimate>>;
}

pub struct SqliteEstimateService {
    db: Db,
}

impl SqliteEstimateService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EstimateService for SqliteEstimateService {
    async fn submit(&self, request: &EstimateRequest, estimate: &EstimateResult) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        {
            let db = self.db.lock().unwrap();
            queries::create_estimate(&db, &id, request, estimate, ESTIMATE_SOURCE)
                .context("failed to store project estimate")?;
        }
        tracing::info!(
            estimate = %id,
            project_type = %request.project_type.as_str(),
            hours = estimate.hours,
            cost = estimate.cost,
            "project estimate submitted"
        );
        Ok(id)
    }

    async fn list(&self, limit: Option<i64>) -> anyhow::Result<Vec<StoredEstimate>> {
        let db = self.db.lock().unwrap();
        queries::get_estimates(&db, limit)
    }

    async fn by_email(&self, email: &str) -> anyhow::Result<Vec<StoredEstimate>> {
        let db = self.db.lock().unwrap();
        queries::get_estimates_by_email(&db, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Complexity, ProjectType};
    use crate::services::estimate::calculate_project_estimate;

    #[tokio::test]
    async fn test_submitted_estimate_is_new_from_calculator() {
        let service = SqliteEstimateService::new(db::open_shared(":memory:").unwrap());
        let request = EstimateRequest {
            project_type: ProjectType::WebApp,
            complexity: Complexity::Medium,
            features: ["user-auth".to_string()].into_iter().collect(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            ..Default::default()
        };
        let estimate = calculate_project_estimate(&request);

        let id = service.submit(&request, &estimate).await.unwrap();

        let stored = service.list(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].status, "new");
        assert_eq!(stored[0].source, ESTIMATE_SOURCE);
        assert_eq!(stored[0].estimate, estimate);
        assert!(service.by_email("other@example.com").await.unwrap().is_empty());
    }
}
