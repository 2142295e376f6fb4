use std::sync::Arc;

use fiscal_core::FiscalClient;

use crate::{
    config::Config,
    fiscal::FiscalApi,
    fixtures::{FixtureError, Fixtures},
    store::TodoStore,
    transport::{ReqwestTransport, Transport},
};

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoStore,
    pub fiscal: FiscalApi,
    pub fixtures: Arc<Fixtures>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn Transport>, fixtures: Fixtures) -> Self {
        let client = FiscalClient::new(config.fiscal.clone());
        Self {
            todos: TodoStore::new(),
            fiscal: FiscalApi::new(client, transport, config.development),
            fixtures: Arc::new(fixtures),
            config: Arc::new(config),
        }
    }

    /// Production wiring: reqwest against the configured API and the
    /// embedded fixtures.
    pub fn from_config(config: Config) -> Result<Self, FixtureError> {
        let fixtures = Fixtures::embedded()?;
        Ok(Self::new(config, Arc::new(ReqwestTransport::new()), fixtures))
    }
}
