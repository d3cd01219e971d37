//! Event signatures and log decoding for the FlightSurety app contract

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;

use crate::error::ChainError;
use crate::models::oracle::{EventKind, EventPayload, FlightStatusInfo, OracleRequest};

/// Topic 0 of `kind`'s logs.
pub fn event_topic(kind: EventKind) -> H256 {
    H256::from(keccak256(kind.signature().as_bytes()))
}

fn params(kind: EventKind) -> Vec<ParamType> {
    match kind {
        EventKind::OracleRequest => vec![
            ParamType::Uint(8),
            ParamType::Address,
            ParamType::String,
            ParamType::Uint(256),
        ],
        EventKind::FlightStatusInfo => vec![
            ParamType::Address,
            ParamType::String,
            ParamType::Uint(256),
            ParamType::Uint(8),
        ],
    }
}

/// Narrows a uint256 to `u64`, rejecting larger values.
pub fn u256_to_u64(value: U256) -> Result<u64, ChainError> {
    if value > U256::from(u64::MAX) {
        return Err(ChainError::Abi(format!("{value} does not fit in u64")));
    }
    Ok(value.as_u64())
}

fn u256_to_u8(value: U256) -> Result<u8, ChainError> {
    if value > U256::from(u8::MAX) {
        return Err(ChainError::Abi(format!("{value} does not fit in uint8")));
    }
    Ok(value.low_u32() as u8)
}

struct Tokens(std::vec::IntoIter<Token>);

impl Tokens {
    fn next(&mut self) -> Result<Token, ChainError> {
        self.0
            .next()
            .ok_or_else(|| ChainError::Abi("missing event field".to_string()))
    }

    fn uint(&mut self) -> Result<U256, ChainError> {
        self.next()?
            .into_uint()
            .ok_or_else(|| ChainError::Abi("expected uint".to_string()))
    }

    fn address(&mut self) -> Result<Address, ChainError> {
        self.next()?
            .into_address()
            .ok_or_else(|| ChainError::Abi("expected address".to_string()))
    }

    fn string(&mut self) -> Result<String, ChainError> {
        self.next()?
            .into_string()
            .ok_or_else(|| ChainError::Abi("expected string".to_string()))
    }
}

/// Decodes the data of a log whose topic 0 is one of the subscribed events.
/// Logs of other events yield `Ok(None)`.
pub fn decode_event(topic0: H256, data: &[u8]) -> Result<Option<EventPayload>, ChainError> {
    let Some(kind) = [EventKind::OracleRequest, EventKind::FlightStatusInfo]
        .into_iter()
        .find(|kind| event_topic(*kind) == topic0)
    else {
        return Ok(None);
    };

    let tokens = abi::decode(&params(kind), data)
        .map_err(|e| ChainError::Abi(format!("{kind} data: {e}")))?;
    let mut tokens = Tokens(tokens.into_iter());

    let payload = match kind {
        EventKind::OracleRequest => EventPayload::OracleRequest(OracleRequest {
            index: u256_to_u8(tokens.uint()?)?,
            airline: tokens.address()?,
            flight: tokens.string()?,
            timestamp: u256_to_u64(tokens.uint()?)?,
        }),
        EventKind::FlightStatusInfo => EventPayload::FlightStatusInfo(FlightStatusInfo {
            airline: tokens.address()?,
            flight: tokens.string()?,
            timestamp: u256_to_u64(tokens.uint()?)?,
            status: u256_to_u8(tokens.uint()?)?,
        }),
    };
    Ok(Some(payload))
}
