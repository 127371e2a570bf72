pub mod emailjs;

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Template parameters for one outgoing notification.
pub type TemplateParams = BTreeMap<String, String>;

#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send(&self, params: &TemplateParams) -> anyhow::Result<()>;
}

/// Build a `mailto:` link the visitor can open when e-mail delivery is
/// unavailable.
pub fn mailto_link(to: &str, subject: &str, body: &str) -> String {
    match reqwest::Url::parse(&format!("mailto:{to}")) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("subject", subject)
                .append_pair("body", body);
            // Form encoding writes spaces as '+', which mail clients show literally.
            // Only the query is touched so a plus-tagged address survives.
            let query = url.query().map(|q| q.replace('+', "%20"));
            url.set_query(query.as_deref());
            url.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, to, "could not build mailto link");
            format!("mailto:{to}")
        }
    }
}
