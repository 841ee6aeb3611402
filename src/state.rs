use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::AccountStore;
use crate::mail::Mailer;

/// Collaborators shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, mailer: Arc<dyn Mailer>, config: Arc<AppConfig>) -> Self {
        Self { store, mailer, config }
    }
}
