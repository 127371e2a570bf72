use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Db;
use crate::services::booking::BookingService;
use crate::services::email::EmailNotifier;
use crate::services::estimate_store::EstimateService;
use crate::services::faq::FaqBook;
use crate::services::sessions::SessionRegistry;

pub struct AppState {
    pub db: Db,
    pub config: AppConfig,
    pub faq: FaqBook,
    pub bookings: Box<dyn BookingService>,
    pub estimates: Box<dyn EstimateService>,
    /// `None` when EmailJS is not configured.
    pub notifier: Option<Arc<dyn EmailNotifier>>,
    pub sessions: SessionRegistry,
}
