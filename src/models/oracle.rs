use std::fmt;

use super::{Address, TxHash};

/// Flight status codes understood by the FlightSurety contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlightStatus {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A request for flight status, as emitted by the `OracleRequest` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub index: u8,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
}

/// Arguments of a `submitOracleResponse` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponse {
    pub index: u8,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    pub status: FlightStatus,
}

impl OracleResponse {
    pub fn for_request(request: &OracleRequest, status: FlightStatus) -> Self {
        Self {
            index: request.index,
            airline: request.airline,
            flight: request.flight.clone(),
            timestamp: request.timestamp,
            status,
        }
    }
}

/// Payload of the `FlightStatusInfo` event. The status is kept raw since the
/// contract may report codes outside [`FlightStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightStatusInfo {
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    pub status: u8,
}

/// Contract event streams the listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OracleRequest,
    FlightStatusInfo,
}

impl EventKind {
    pub fn signature(self) -> &'static str {
        match self {
            EventKind::OracleRequest => "OracleRequest(uint8,address,string,uint256)",
            EventKind::FlightStatusInfo => "FlightStatusInfo(address,string,uint256,uint8)",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::OracleRequest => f.write_str("OracleRequest"),
            EventKind::FlightStatusInfo => f.write_str("FlightStatusInfo"),
        }
    }
}

/// A decoded contract log together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
    pub block_number: Option<u64>,
    pub tx_hash: Option<TxHash>,
    /// Mined before the subscription started and read back from history.
    pub replayed: bool,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    OracleRequest(OracleRequest),
    FlightStatusInfo(FlightStatusInfo),
}
