use std::sync::Arc;

use mc_agent::{AgentDispatcher, LogLineToolExecutor};
use mc_domain::config::Config;
use mc_domain::error::Result;
use mc_logline::{AuthClient, Credential, RestTransport, SpanGateway, Transport};

/// Shared application state passed to all API handlers.
///
/// Everything here is immutable after startup. Per-caller credentials are
/// applied by building a fresh [`SpanGateway`] per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// LogLine API key resolved once at startup.
    pub logline_api_key: Option<String>,
    pub gateway: SpanGateway,
    pub auth: AuthClient,
    pub dispatcher: AgentDispatcher,
}

impl AppState {
    /// Build the state over the real LogLine REST transport.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(RestTransport::from_config(&config.logline)?);
        let dispatcher = AgentDispatcher::new(config.llm.clone(), &config.agent);
        Ok(Self::new(config, transport, dispatcher))
    }

    /// Build the state over any transport and dispatcher.
    pub fn new(
        config: Arc<Config>,
        transport: Arc<dyn Transport>,
        dispatcher: AgentDispatcher,
    ) -> Self {
        let logline_api_key = config.logline.resolve_api_key();
        let gateway = SpanGateway::new(Arc::clone(&transport), None)
            .with_wait(config.logline.wait)
            .with_app(config.logline.app.clone());
        Self {
            logline_api_key,
            gateway,
            auth: AuthClient::new(transport),
            dispatcher,
            config,
        }
    }

    /// Gateway acting for a caller. The caller's bearer token wins over the
    /// server's API key.
    pub fn gateway_for(&self, bearer: Option<String>) -> SpanGateway {
        self.gateway
            .with_credential(Credential::select(bearer, self.logline_api_key.clone()))
    }

    /// Dispatcher whose tools write through `gateway`.
    pub fn dispatcher_for(&self, gateway: &SpanGateway) -> AgentDispatcher {
        self.dispatcher
            .with_executor(Arc::new(LogLineToolExecutor::new(gateway.clone())))
    }
}
