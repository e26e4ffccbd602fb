use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::uploads::UploadStore;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    uploads: UploadStore,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool) -> Self {
        let uploads = UploadStore::from_settings(&settings);
        Self { inner: Arc::new(InnerState { settings, db, uploads }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}
