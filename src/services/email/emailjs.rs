use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{EmailNotifier, TemplateParams};
use crate::config::AppConfig;
use crate::errors::AppError;

const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

pub struct EmailJsNotifier {
    service_id: String,
    template_id: String,
    public_key: String,
    private_key: Option<String>,
    client: reqwest::Client,
}

impl EmailJsNotifier {
    pub fn new(
        service_id: String,
        template_id: String,
        public_key: String,
        private_key: Option<String>,
    ) -> Self {
        Self {
            service_id,
            template_id,
            public_key,
            private_key,
            client: reqwest::Client::new(),
        }
    }

    /// `Ok(None)` when EmailJS is not set up at all; a `Config` error when
    /// only some of the identifiers are present.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, AppError> {
        if !config.email_configured() {
            let missing: Vec<&str> = [
                ("EMAILJS_SERVICE_ID", &config.emailjs_service_id),
                ("EMAILJS_TEMPLATE_ID", &config.emailjs_template_id),
                ("EMAILJS_PUBLIC_KEY", &config.emailjs_public_key),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
            if missing.len() == 3 {
                return Ok(None);
            }
            return Err(AppError::Config(format!("missing {}", missing.join(", "))));
        }
        Ok(Some(Self::new(
            config.emailjs_service_id.clone(),
            config.emailjs_template_id.clone(),
            config.emailjs_public_key.clone(),
            config.emailjs_private_key.clone(),
        )))
    }
}

#[async_trait]
impl EmailNotifier for EmailJsNotifier {
    async fn send(&self, params: &TemplateParams) -> anyhow::Result<()> {
        let mut body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": params,
        });
        if let Some(key) = &self.private_key {
            body["accessToken"] = json!(key);
        }

        self.client
            .post(EMAILJS_SEND_URL)
            .json(&body)
            .send()
            .await
            .context("failed to call EmailJS API")?
            .error_for_status()
            .context("EmailJS API returned error")?;

        tracing::debug!(template = %self.template_id, "email notification sent");
        Ok(())
    }
}
