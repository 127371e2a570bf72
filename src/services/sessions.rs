use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::models::Channel;
use crate::services::assistant::Assistant;
use crate::services::faq::FaqBook;

pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub type SharedAssistant = Arc<tokio::sync::Mutex<Assistant>>;

struct Entry {
    channel: Channel,
    assistant: SharedAssistant,
    touched: Instant,
}

/// Open widget sessions keyed by id. Each assistant sits behind its own
/// async mutex so a slow booking in one session never blocks another.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn open(&self, channel: Channel, faq: &FaqBook, typing_delay: Duration) -> (String, SharedAssistant) {
        self.prune_expired();

        let assistant = Assistant::open(channel, faq, typing_delay);
        let id = assistant.id().to_string();
        let shared = Arc::new(tokio::sync::Mutex::new(assistant));

        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            id.clone(),
            Entry {
                channel,
                assistant: Arc::clone(&shared),
                touched: Instant::now(),
            },
        );
        tracing::info!(session = %id, channel = channel.as_str(), open = sessions.len(), "session opened");
        (id, shared)
    }

    /// Look up a live session of the given channel and mark it active.
    pub fn get(&self, id: &str, channel: Channel) -> Option<SharedAssistant> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(id) {
            Some(entry) if entry.channel != channel => return None,
            Some(entry) if entry.touched.elapsed() <= self.ttl => {
                entry.touched = Instant::now();
                return Some(Arc::clone(&entry.assistant));
            }
            Some(_) => {}
            None => return None,
        }
        sessions.remove(id);
        tracing::info!(session = %id, "session expired");
        None
    }

    /// Close a session, discarding any partially collected appointment.
    pub fn close(&self, id: &str, channel: Channel) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get(id) {
            Some(entry) if entry.channel == channel => {
                sessions.remove(id);
                tracing::info!(session = %id, "session closed");
                true
            }
            _ => false,
        }
    }

    pub fn prune_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() <= self.ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired sessions");
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::faq::BusinessProfile;

    fn faq() -> FaqBook {
        FaqBook::new(BusinessProfile {
            name: "Acme Studio".to_string(),
            contact_email: "hello@acme.test".to_string(),
            website: "acme.test".to_string(),
        })
    }

    #[tokio::test]
    async fn test_sessions_are_channel_scoped() {
        let registry = SessionRegistry::default();
        let (id, _) = registry.open(Channel::Chat, &faq(), Duration::ZERO);

        assert!(registry.get(&id, Channel::Chat).is_some());
        assert!(registry.get(&id, Channel::Voice).is_none());
        assert!(!registry.close(&id, Channel::Voice));
        assert!(registry.close(&id, Channel::Chat));
        assert!(registry.get(&id, Channel::Chat).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let (stale, _) = registry.open(Channel::Voice, &faq(), Duration::ZERO);

        tokio::time::advance(Duration::from_secs(45)).await;
        let (fresh, _) = registry.open(Channel::Chat, &faq(), Duration::ZERO);
        tokio::time::advance(Duration::from_secs(30)).await;

        assert!(registry.get(&stale, Channel::Voice).is_none());
        assert!(registry.get(&fresh, Channel::Chat).is_some());
        assert_eq!(registry.len(), 1);
    }
}
