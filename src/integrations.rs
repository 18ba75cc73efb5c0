//! Per-server bookkeeping for interactive integrations.
use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

/// Remembers the last trigger id handed out by each server.
///
/// A trigger id lets the next interactive dialog opened by the server be tied
/// back to the command that produced it.
#[derive(Debug, Default)]
pub struct IntegrationsManager {
    trigger_ids: Mutex<HashMap<String, String>>,
}

impl IntegrationsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_trigger_id(&self, server_url: &str, trigger_id: &str) {
        debug!("Recording trigger id for {}", server_url);
        if let Ok(mut ids) = self.trigger_ids.lock() {
            ids.insert(server_url.to_string(), trigger_id.to_string());
        }
    }

    pub fn trigger_id(&self, server_url: &str) -> Option<String> {
        self.trigger_ids
            .lock()
            .ok()
            .and_then(|ids| ids.get(server_url).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_ids_are_kept_per_server() {
        let manager = IntegrationsManager::new();
        manager.set_trigger_id("https://a.example.com", "t1");
        manager.set_trigger_id("https://b.example.com", "t2");
        manager.set_trigger_id("https://a.example.com", "t3");

        assert_eq!(manager.trigger_id("https://a.example.com").as_deref(), Some("t3"));
        assert_eq!(manager.trigger_id("https://b.example.com").as_deref(), Some("t2"));
        assert!(manager.trigger_id("https://c.example.com").is_none());
    }
}
