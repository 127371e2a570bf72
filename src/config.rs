use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub business_name: String,
    pub contact_email: String,
    pub business_website: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub emailjs_private_key: Option<String>,
    pub resume_dir: String,
    pub typing_delay_ms: u64,
    pub allowed_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "agencysite.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "KlyroSoft".to_string()),
            contact_email: env::var("CONTACT_EMAIL")
                .unwrap_or_else(|_| "klyrosoft1@gmail.com".to_string()),
            business_website: env::var("BUSINESS_WEBSITE")
                .unwrap_or_else(|_| "www.klyrosoft.com".to_string()),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID").unwrap_or_default(),
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
            emailjs_public_key: env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
            emailjs_private_key: env::var("EMAILJS_PRIVATE_KEY").ok().filter(|v| !v.is_empty()),
            resume_dir: env::var("RESUME_DIR").unwrap_or_else(|_| "uploads/resumes".to_string()),
            typing_delay_ms: env::var("TYPING_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
            allowed_origin: env::var("ALLOWED_ORIGIN").ok().filter(|v| !v.is_empty()),
        }
    }

    /// E-mail delivery needs all three EmailJS identifiers.
    pub fn email_configured(&self) -> bool {
        !self.emailjs_service_id.is_empty()
            && !self.emailjs_template_id.is_empty()
            && !self.emailjs_public_key.is_empty()
    }
}
