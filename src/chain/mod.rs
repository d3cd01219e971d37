//! Access to the node and the FlightSurety application contract

pub mod abi;
pub mod contract;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ChainError;
use crate::models::oracle::{ContractEvent, EventKind, OracleResponse};
use crate::models::{Address, TxHash, Wei};

pub use contract::FlightSuretyApp;

/// Decoded events of one subscription, in node emission order. The stream
/// ends when the underlying connection goes away.
pub type EventStream = mpsc::UnboundedReceiver<Result<ContractEvent, ChainError>>;

/// Operations the oracle components need from the app contract.
///
/// Sends resolve once the transaction is mined and fail if it reverted.
#[async_trait]
pub trait OracleContract: Send + Sync {
    /// Node-managed accounts, in node order.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    async fn registration_fee(&self) -> Result<Wei, ChainError>;

    async fn register_oracle(&self, from: Address, fee: Wei, gas: u64)
        -> Result<TxHash, ChainError>;

    /// Indexes assigned to `from` at registration.
    async fn my_indexes(&self, from: Address) -> Result<Vec<u8>, ChainError>;

    async fn submit_oracle_response(
        &self,
        from: Address,
        response: &OracleResponse,
        gas: u64,
    ) -> Result<TxHash, ChainError>;

    /// Replays `kind` events from `from_block` (marked `replayed`) and then
    /// follows new ones.
    async fn subscribe(&self, kind: EventKind, from_block: u64) -> Result<EventStream, ChainError>;
}
