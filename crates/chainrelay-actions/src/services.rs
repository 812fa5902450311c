//! Process-wide collaborators: configuration, secrets, the chain reader and
//! the sink registry.
//!
//! `Services::init` resolves secrets, initialises every sink and registers
//! them with the dispatcher. It runs at most once per `Services`; later
//! calls return immediately, so every action can call it unconditionally.

use alloy_primitives::{Address, B256};
use chainrelay_core::{
    secrets::names, ActionError, Dispatcher, KeyValueStore, MemoryStore, Network, SecretError,
    SecretStore,
};
use chainrelay_evm::{Contract, ContractReader};
use chainrelay_observability::RelayMetrics;
use chainrelay_rpc::{EthCall, HttpClientConfig, HttpRpcClient, RpcEthCaller};
use chainrelay_sinks::{
    DiscordSink, HttpTransport, KnockSink, ReqwestTransport, SlackSink, WebhookSink,
};
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::RelayConfig;

pub struct Services {
    config: RelayConfig,
    network: Network,
    secrets: Arc<dyn SecretStore>,
    store: Arc<dyn KeyValueStore>,
    caller: Option<Arc<dyn EthCall>>,
    dispatcher: Dispatcher,
    discord: Arc<DiscordSink>,
    webhook: Arc<WebhookSink>,
    knock: Arc<KnockSink>,
    slack: Arc<SlackSink>,
    reader: OnceLock<ContractReader>,
    initialised: OnceCell<()>,
    metrics: RelayMetrics,
}

impl Services {
    pub fn builder(config: RelayConfig) -> ServicesBuilder {
        ServicesBuilder::new(config)
    }

    /// Resolve secrets and register sinks. Idempotent.
    pub async fn init(&self) -> Result<(), ActionError> {
        self.initialised
            .get_or_try_init(|| self.init_once())
            .await
            .map(|_| ())
    }

    async fn init_once(&self) -> Result<(), ActionError> {
        let fuji = self.network.is_testnet();

        let caller: Arc<dyn EthCall> = match &self.caller {
            Some(caller) => Arc::clone(caller),
            None => {
                let name = if fuji {
                    names::JSON_RPC_URL_FUJI
                } else {
                    names::JSON_RPC_URL
                };
                let url = self.secrets.get(name).await?;
                let client = HttpRpcClient::new(
                    url,
                    HttpClientConfig {
                        request_timeout: self.config.http.rpc_timeout(),
                    },
                )
                .map_err(|e| ActionError::Config {
                    reason: format!("rpc client: {e}"),
                })?;
                Arc::new(RpcEthCaller::new(Arc::new(client)))
            }
        };
        let _ = self.reader.set(ContractReader::new(caller));

        self.discord
            .init(self.secrets.get(names::DISCORD_WEBHOOK_URL).await?);
        self.dispatcher.register(self.discord.clone());

        let webhook_secret = if fuji {
            names::WEBHOOK_URL_FUJI
        } else {
            names::WEBHOOK_URL
        };
        self.webhook.init(self.secrets.get(webhook_secret).await?);
        self.dispatcher.register(self.webhook.clone());

        self.knock.init(self.secrets.get(names::KNOCK_TOKEN).await?);
        self.dispatcher.register(self.knock.clone());

        self.dispatcher.register(self.slack.clone());

        info!(
            network = %self.network,
            sinks = ?self.dispatcher.sink_ids(),
            "services initialised"
        );
        Ok(())
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    /// The chain reader. Available once `init` has succeeded.
    pub fn reader(&self) -> Result<&ContractReader, ActionError> {
        self.reader.get().ok_or_else(|| ActionError::Config {
            reason: "chain reader used before services were initialised".into(),
        })
    }

    pub fn address(&self, contract: Contract) -> Result<Address, ActionError> {
        self.config.address(self.network, contract)
    }

    /// Slack webhook URL of a hardware provider on this network.
    ///
    /// `None` when the provider is unknown, has no secret configured for the
    /// network, or the secret is not set.
    pub async fn provider_slack_url(&self, provider: &B256) -> Result<Option<String>, ActionError> {
        let Some(secret) = self
            .config
            .provider(provider)
            .and_then(|p| p.slack_secret.get(self.network))
        else {
            return Ok(None);
        };
        match self.secrets.get(secret).await {
            Ok(url) => Ok(Some(url)),
            Err(SecretError::Missing { name }) => {
                debug!(secret = %name, "provider slack url not set");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Builder for [`Services`]. Transport and chain caller can be swapped for
/// fakes; the defaults talk HTTP.
pub struct ServicesBuilder {
    config: RelayConfig,
    network: Option<Network>,
    secrets: Option<Arc<dyn SecretStore>>,
    store: Option<Arc<dyn KeyValueStore>>,
    transport: Option<Arc<dyn HttpTransport>>,
    caller: Option<Arc<dyn EthCall>>,
    knock_base_url: Option<String>,
    metrics: Option<RelayMetrics>,
}

impl ServicesBuilder {
    fn new(config: RelayConfig) -> Self {
        Self {
            config,
            network: None,
            secrets: None,
            store: None,
            transport: None,
            caller: None,
            knock_base_url: None,
            metrics: None,
        }
    }

    /// Defaults to the configured network.
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn secrets(mut self, secrets: Arc<dyn SecretStore>) -> Self {
        self.secrets = Some(secrets);
        self
    }

    /// Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use this caller instead of an HTTP JSON-RPC client.
    pub fn eth_caller(mut self, caller: Arc<dyn EthCall>) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn knock_base_url(mut self, url: impl Into<String>) -> Self {
        self.knock_base_url = Some(url.into());
        self
    }

    pub fn metrics(mut self, metrics: RelayMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<Services, ActionError> {
        let secrets = self.secrets.ok_or_else(|| ActionError::Config {
            reason: "no secret store configured".into(),
        })?;
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::new(self.config.http.sink_timeout()).map_err(|e| {
                    ActionError::Config {
                        reason: format!("sink transport: {e}"),
                    }
                })?,
            ),
        };

        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };

        let mut knock = KnockSink::new(Arc::clone(&transport));
        if let Some(url) = self.knock_base_url {
            knock = knock.with_base_url(url);
        }

        Ok(Services {
            network: self.network.unwrap_or(self.config.network),
            discord: Arc::new(
                DiscordSink::new(Arc::clone(&transport)).dry_run(self.config.discord.dry_run),
            ),
            webhook: Arc::new(WebhookSink::new(Arc::clone(&transport))),
            knock: Arc::new(knock),
            slack: Arc::new(SlackSink::new(transport)),
            config: self.config,
            secrets,
            store,
            caller: self.caller,
            dispatcher: Dispatcher::new(),
            reader: OnceLock::new(),
            initialised: OnceCell::new(),
            metrics: self.metrics.unwrap_or_else(RelayMetrics::global),
        })
    }
}
