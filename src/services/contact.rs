use serde::Serialize;

use crate::errors::AppError;
use crate::models::ContactForm;
use crate::services::email::{mailto_link, EmailNotifier, TemplateParams};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactOutcome {
    pub delivered: bool,
    pub message: String,
    /// Set when the visitor has to send the message from their own mail client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_mailto: Option<String>,
}

fn contact_subject(form: &ContactForm) -> String {
    match form.service.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(service) => format!("Contact form: {service} inquiry from {}", form.name.trim()),
        None => format!("Contact form message from {}", form.name.trim()),
    }
}

fn contact_body(form: &ContactForm) -> String {
    format!(
        "Name: {}\nEmail: {}\nPhone: {}\nService: {}\n\n{}",
        form.name.trim(),
        form.email.trim(),
        form.phone.as_deref().unwrap_or("-"),
        form.service.as_deref().unwrap_or("-"),
        form.message.trim(),
    )
}

fn contact_template_params(form: &ContactForm, business_name: &str) -> TemplateParams {
    let mut params = TemplateParams::new();
    params.insert("business_name".into(), business_name.to_string());
    params.insert("subject".into(), contact_subject(form));
    params.insert("from_name".into(), form.name.trim().to_string());
    params.insert("from_email".into(), form.email.trim().to_string());
    params.insert("phone".into(), form.phone.clone().unwrap_or_default());
    params.insert("service".into(), form.service.clone().unwrap_or_default());
    params.insert("message".into(), form.message.trim().to_string());
    params
}

/// Validate and deliver a contact form. Delivery problems never fail the
/// request; the visitor gets a prefilled `mailto:` link instead.
pub async fn send_contact(
    notifier: Option<&dyn EmailNotifier>,
    form: &ContactForm,
    business_name: &str,
    contact_email: &str,
) -> Result<ContactOutcome, AppError> {
    form.validate()?;

    let fallback = |reason: &str| ContactOutcome {
        delivered: false,
        message: format!(
            "{reason} Please send your message using your email app to {contact_email}."
        ),
        fallback_mailto: Some(mailto_link(
            contact_email,
            &contact_subject(form),
            &contact_body(form),
        )),
    };

    let Some(notifier) = notifier else {
        tracing::warn!("email not configured, returning mailto fallback for contact form");
        return Ok(fallback("Online delivery is not available right now."));
    };

    match notifier.send(&contact_template_params(form, business_name)).await {
        Ok(()) => {
            tracing::info!(service = ?form.service, "contact form delivered");
            Ok(ContactOutcome {
                delivered: true,
                message: "Thank you for your message! We'll get back to you within 24 hours."
                    .to_string(),
                fallback_mailto: None,
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to deliver contact form");
            Ok(fallback("We couldn't send your message automatically."))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct RecordingNotifier {
        sent: Mutex<Vec<TemplateParams>>,
        fail: bool,
    }

    #[async_trait]
    impl EmailNotifier for RecordingNotifier {
        async fn send(&self, params: &TemplateParams) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("EmailJS API returned error");
            }
            self.sent.lock().unwrap().push(params.clone());
            Ok(())
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            service: Some("AI Chatbot".to_string()),
            message: "We need a support bot.".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unconfigured_email_falls_back_to_mailto() {
        let outcome = send_contact(None, &form(), "Acme", "hello@acme.test").await.unwrap();
        assert!(!outcome.delivered);
        let link = outcome.fallback_mailto.unwrap();
        assert!(link.starts_with("mailto:hello@acme.test?subject="));
        assert!(outcome.message.contains("hello@acme.test"));
    }

    #[tokio::test]
    async fn test_delivered_through_notifier() {
        let notifier = RecordingNotifier { sent: Mutex::new(vec![]), fail: false };
        let outcome = send_contact(Some(&notifier), &form(), "Acme", "hello@acme.test")
            .await
            .unwrap();
        assert!(outcome.delivered);
        assert_eq!(outcome.fallback_mailto, None);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0]["subject"], "Contact form: AI Chatbot inquiry from Ada");
    }

    #[tokio::test]
    async fn test_delivery_failure_falls_back() {
        let notifier = RecordingNotifier { sent: Mutex::new(vec![]), fail: true };
        let outcome = send_contact(Some(&notifier), &form(), "Acme", "hello@acme.test")
            .await
            .unwrap();
        assert!(!outcome.delivered);
        assert!(outcome.fallback_mailto.is_some());
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_before_sending() {
        let notifier = RecordingNotifier { sent: Mutex::new(vec![]), fail: false };
        let bad = ContactForm { email: "nope".to_string(), ..form() };
        let err = send_contact(Some(&notifier), &bad, "Acme", "hello@acme.test")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
