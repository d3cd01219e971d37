//! Keeps the node connection, oracle registration and event listening alive

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::chain::{FlightSuretyApp, OracleContract};
use crate::config::OracleConfig;
use crate::error::ChainError;
use crate::event_listener::{EventListener, RequestDispatcher};
use crate::services::{OracleRegistrar, RandomStatusSource, ResponseSimulator};

const MAX_BACKOFF_SECONDS: u64 = 30;

pub struct ChainSupervisor {
    config: Arc<OracleConfig>,
    registration_started: bool,
    /// Flips to `true` once the registration batch has finished.
    registered: Arc<watch::Sender<bool>>,
}

impl ChainSupervisor {
    pub fn new(config: Arc<OracleConfig>) -> Self {
        Self {
            config,
            registration_started: false,
            registered: Arc::new(watch::channel(false).0),
        }
    }

    /// Runs forever, reconnecting with exponential backoff whenever the node
    /// connection fails or the event streams close.
    pub async fn run(mut self) {
        let mut restart_count: u32 = 0;
        loop {
            match self.run_once().await {
                Ok(()) => {
                    info!("node session ended; reconnecting");
                    restart_count = 0;
                }
                Err(err) => {
                    error!(error = %err, url = %self.config.node_url, "node session failed");
                    restart_count = restart_count.saturating_add(1);
                }
            }

            let backoff_seconds = backoff_seconds(restart_count);
            warn!(restart_count, backoff_seconds, "chain supervisor restart backoff");
            sleep(Duration::from_secs(backoff_seconds)).await;
        }
    }

    async fn run_once(&mut self) -> Result<(), ChainError> {
        let contract: Arc<dyn OracleContract> = Arc::new(
            FlightSuretyApp::connect(&self.config.node_url, self.config.app_address).await?,
        );

        self.start_registration(contract.clone());

        let simulator = Arc::new(ResponseSimulator::new(
            contract.clone(),
            Arc::new(RandomStatusSource),
            self.config.gas_limit,
        ));
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(
            RequestDispatcher::new(
                simulator,
                self.config.auto_respond,
                self.registered.subscribe(),
            )
            .run(requests_rx),
        );

        let listened = EventListener::new(contract, self.config.from_block, requests_tx)
            .start()
            .await;

        // the listener owned the only sender, so the dispatcher drains and stops
        if let Err(join_error) = dispatcher.await {
            error!(error = %join_error, "request dispatcher task failed");
        }
        listened
    }
}

impl ChainSupervisor {
    /// Spawns the registration batch on the first session only; later
    /// reconnects reuse the same completion flag.
    fn start_registration(&mut self, contract: Arc<dyn OracleContract>) {
        if self.registration_started {
            return;
        }
        self.registration_started = true;

        let registrar =
            OracleRegistrar::new(contract, self.config.oracle_cap, self.config.gas_limit);
        let registered = self.registered.clone();
        tokio::spawn(async move {
            registrar.register_oracles().await;
            registered.send_replace(true);
        });
    }
}

fn backoff_seconds(restart_count: u32) -> u64 {
    2u64.saturating_pow(restart_count.min(5))
        .min(MAX_BACKOFF_SECONDS)
}
