//! Shared setup for backend-facing integration tests.
#![allow(dead_code)]

use std::sync::{
    Arc,
    Mutex,
};

use serde_json::{
    json,
    Value,
};
use somemo::{
    persistence::{
        KeyValueStore,
        MemoryStore,
    },
    session::Navigator,
    MemoApp,
    MemoConfig,
};
use wiremock::MockServer;

pub const USERNAME: &str = "anna";
pub const TOKEN: &str = "t0k3n";

/// Records, for every redirect, whether any credential was still stored at
/// that moment.
pub struct RecordingNavigator {
    store: Arc<MemoryStore>,
    seen: Mutex<Vec<bool>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<bool> {
        self.seen.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        let token = self.store.get("token").ok().flatten();
        let username = self.store.get("username").ok().flatten();
        self.seen.lock().unwrap().push(token.is_some() || username.is_some());
    }
}

pub struct TestApp {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub app: MemoApp,
}

impl TestApp {
    pub async fn start(offline_cache: bool) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());
        let navigator =
            Arc::new(RecordingNavigator { store: store.clone(), seen: Mutex::new(Vec::new()) });
        let config =
            MemoConfig { api_base_url: server.uri(), request_timeout_secs: 5, offline_cache };
        let app = MemoApp::new(config, store.clone(), navigator.clone()).unwrap();
        Self { server, store, navigator, app }
    }

    pub async fn logged_in(offline_cache: bool) -> Self {
        let test_app = Self::start(offline_cache).await;
        test_app.app.session().establish(USERNAME, TOKEN).unwrap();
        test_app
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.map(|r| r.len()).unwrap_or_default()
    }
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}

pub fn card(id: u64, front: &str, back: &str, checked: bool) -> Value {
    json!({"id": id, "front": front, "back": back, "isChecked": checked})
}
