//! Binding of the deployed FlightSurety app contract

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::contract::{abigen, ContractCall};
use ethers::providers::{Middleware, Provider, SubscriptionStream, Ws};
use ethers::types::{Filter, Log, U64};
use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::abi;
use super::{EventStream, OracleContract};
use crate::error::ChainError;
use crate::models::oracle::{ContractEvent, EventKind, OracleResponse};
use crate::models::{Address, TxHash, Wei, U256};

abigen!(
    FlightSuretyAppContract,
    r#"[
        function getRegistrationFee() external view returns (uint256)
        function registerOracle() external payable
        function getMyIndexes() external view returns (uint8[3])
        function submitOracleResponse(uint8 index, address airline, string flight, uint256 timestamp, uint8 statusCode) external
    ]"#
);

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct FlightSuretyApp {
    provider: Arc<Provider<Ws>>,
    app: FlightSuretyAppContract<Provider<Ws>>,
    address: Address,
}

impl FlightSuretyApp {
    /// Opens a websocket connection to `url` and binds the app at `address`.
    pub async fn connect(url: &str, address: Address) -> Result<Self, ChainError> {
        let provider = Arc::new(Provider::<Ws>::connect(url).await?);
        Ok(Self {
            app: FlightSuretyAppContract::new(address, provider.clone()),
            provider,
            address,
        })
    }

    /// Sends `call` from a node-managed account and waits for its receipt.
    async fn send(
        &self,
        call: ContractCall<Provider<Ws>, ()>,
        from: Address,
        value: Option<Wei>,
        gas: u64,
    ) -> Result<TxHash, ChainError> {
        let mut call = call.from(from).gas(gas).legacy();
        if let Some(value) = value {
            call = call.value(value);
        }

        let tx_hash = *call.send().await?;
        self.wait_for_receipt(tx_hash).await?;
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<(), ChainError> {
        loop {
            match self.provider.get_transaction_receipt(tx_hash).await? {
                None => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
                Some(receipt) if receipt.status == Some(U64::zero()) => {
                    return Err(ChainError::Reverted { tx_hash });
                }
                Some(_) => return Ok(()),
            }
        }
    }
}

/// Subscribes first, then reads the head and the backlog up to it, so no log
/// mined in between is missed.
async fn open_log_stream<'a>(
    provider: &'a Provider<Ws>,
    filter: &Filter,
    from_block: u64,
) -> Result<(SubscriptionStream<'a, Ws, Log>, u64, Vec<Log>), ChainError> {
    let live = provider.subscribe_logs(filter).await?;
    let head = provider.get_block_number().await?.as_u64();

    let backlog = if from_block <= head {
        let range = filter.clone().from_block(from_block).to_block(head);
        provider.get_logs(&range).await?
    } else {
        Vec::new()
    };
    Ok((live, head, backlog))
}

#[async_trait]
impl OracleContract for FlightSuretyApp {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        Ok(self.provider.get_accounts().await?)
    }

    async fn registration_fee(&self) -> Result<Wei, ChainError> {
        Ok(self.app.get_registration_fee().call().await?)
    }

    async fn register_oracle(&self, from: Address, fee: Wei, gas: u64) -> Result<TxHash, ChainError> {
        self.send(self.app.register_oracle(), from, Some(fee), gas).await
    }

    async fn my_indexes(&self, from: Address) -> Result<Vec<u8>, ChainError> {
        let indexes = self.app.get_my_indexes().from(from).call().await?;
        Ok(indexes.to_vec())
    }

    async fn submit_oracle_response(
        &self,
        from: Address,
        response: &OracleResponse,
        gas: u64,
    ) -> Result<TxHash, ChainError> {
        let call = self.app.submit_oracle_response(
            response.index,
            response.airline,
            response.flight.clone(),
            U256::from(response.timestamp),
            response.status.code(),
        );
        self.send(call, from, None, gas).await
    }

    async fn subscribe(&self, kind: EventKind, from_block: u64) -> Result<EventStream, ChainError> {
        let filter = Filter::new()
            .address(self.address)
            .topic0(abi::event_topic(kind));
        let provider = self.provider.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut live, head, backlog) =
                match open_log_stream(&provider, &filter, from_block).await {
                    Ok(opened) => opened,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
            debug!(%kind, from_block, head, backlog = backlog.len(), "subscribed to contract logs");
            if ready_tx.send(Ok(())).is_err() {
                return;
            }

            for log in &backlog {
                if let Some(event) = decode_log(log, true).transpose() {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }

            while let Some(log) = live.next().await {
                // already delivered from the backlog
                if log.block_number.is_some_and(|n| n.as_u64() <= head) {
                    continue;
                }
                if let Some(event) = decode_log(&log, false).transpose() {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            warn!(%kind, "log subscription ended");
        });

        ready_rx.await.map_err(|_| ChainError::ConnectionClosed)??;
        Ok(rx)
    }
}

/// Decodes one log of the app contract. Removed (reorged) logs and logs of
/// other events yield `Ok(None)`.
pub fn decode_log(log: &Log, replayed: bool) -> Result<Option<ContractEvent>, ChainError> {
    if log.removed == Some(true) {
        return Ok(None);
    }
    let Some(topic0) = log.topics.first() else {
        return Ok(None);
    };
    let Some(payload) = abi::decode_event(*topic0, &log.data)? else {
        return Ok(None);
    };

    Ok(Some(ContractEvent {
        block_number: log.block_number.map(|n| n.as_u64()),
        tx_hash: log.transaction_hash,
        replayed,
        payload,
    }))
}
