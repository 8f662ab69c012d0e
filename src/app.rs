use std::sync::Arc;

use crate::{
    config::MemoConfig,
    core::{
        http::http_client,
        ApiClient,
        AuthenticatedClient,
        Credential,
        MemoError,
    },
    memo::{
        CardRepository,
        LocalCardCache,
        MemoController,
    },
    persistence::KeyValueStore,
    session::{
        self,
        Navigator,
        Session,
    },
};

/// Everything that lives for the whole run: configuration, storage, the
/// session context and the HTTP client. Views are created from it on demand.
pub struct MemoApp {
    config: MemoConfig,
    store: Arc<dyn KeyValueStore>,
    session: Arc<Session>,
    api: ApiClient,
}

impl MemoApp {
    pub fn new(
        config: MemoConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, MemoError> {
        config.validate()?;
        let http = http_client(config.request_timeout())?;
        let api = ApiClient::new(http, &config.api_base_url);
        let session = Arc::new(Session::new(store.clone(), navigator));
        tracing::debug!(api = %api.base_url(), offline_cache = config.offline_cache, "app ready");
        Ok(Self { config, store, session, api })
    }

    pub fn config(&self) -> &MemoConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, MemoError> {
        session::login(&self.api, &self.session, username, password).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub fn repository(&self) -> CardRepository {
        CardRepository::new(AuthenticatedClient::new(self.api.clone(), self.session.clone()))
    }

    pub fn card_cache(&self) -> LocalCardCache {
        LocalCardCache::new(self.store.clone())
    }

    /// A fresh memo view. Drop it to leave the view.
    pub fn memo_view(&self) -> MemoController {
        let cache = self.config.offline_cache.then(|| self.card_cache());
        MemoController::new(self.repository(), cache)
    }
}
