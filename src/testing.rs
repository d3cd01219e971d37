//! In-memory stand-ins for the chain used by unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chain::{EventStream, OracleContract};
use crate::error::ChainError;
use crate::models::oracle::{EventKind, FlightStatus, OracleResponse};
use crate::models::{Address, TxHash, Wei, U256};
use crate::services::StatusCodeSource;

pub fn accounts(n: usize) -> Vec<Address> {
    (0..n)
        .map(|i| Address::from_low_u64_be(i as u64 + 1))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub from: Address,
    pub fee: Wei,
    pub gas: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub from: Address,
    pub response: OracleResponse,
    pub gas: u64,
}

/// Records every send, including the ones it is told to fail.
#[derive(Default)]
pub struct FakeContract {
    accounts: Vec<Address>,
    fee: Mutex<Wei>,
    fee_drift: Wei,
    fee_reads: AtomicUsize,
    indexes: HashMap<Address, Vec<u8>>,
    fail_accounts: bool,
    fail_fee: bool,
    failing_registrations: HashSet<Address>,
    failing_indexes: HashSet<Address>,
    failing_submissions: HashSet<Address>,
    registrations: Mutex<Vec<Registration>>,
    submissions: Mutex<Vec<Submission>>,
    streams: Mutex<HashMap<EventKind, EventStream>>,
}

fn rejected() -> ChainError {
    ChainError::Contract("VM Exception while processing transaction: revert".to_string())
}

impl FakeContract {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            fee: Mutex::new(U256::exp10(18)),
            ..Default::default()
        }
    }

    pub fn with_fee(self, fee: Wei) -> Self {
        *self.fee.lock().unwrap() = fee;
        self
    }

    pub fn with_fee_drift(mut self, drift: Wei) -> Self {
        self.fee_drift = drift;
        self
    }

    pub fn with_indexes(mut self, account: Address, indexes: Vec<u8>) -> Self {
        self.indexes.insert(account, indexes);
        self
    }

    pub fn with_stream(self, kind: EventKind, stream: EventStream) -> Self {
        self.streams.lock().unwrap().insert(kind, stream);
        self
    }

    pub fn failing_accounts(mut self) -> Self {
        self.fail_accounts = true;
        self
    }

    pub fn failing_fee(mut self) -> Self {
        self.fail_fee = true;
        self
    }

    pub fn failing_registration(mut self, account: Address) -> Self {
        self.failing_registrations.insert(account);
        self
    }

    pub fn failing_indexes(mut self, account: Address) -> Self {
        self.failing_indexes.insert(account);
        self
    }

    pub fn failing_submission(mut self, account: Address) -> Self {
        self.failing_submissions.insert(account);
        self
    }

    pub fn fee_reads(&self) -> usize {
        self.fee_reads.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl OracleContract for FakeContract {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        if self.fail_accounts {
            return Err(ChainError::ConnectionClosed);
        }
        Ok(self.accounts.clone())
    }

    async fn registration_fee(&self) -> Result<Wei, ChainError> {
        if self.fail_fee {
            return Err(ChainError::ConnectionClosed);
        }
        self.fee_reads.fetch_add(1, Ordering::SeqCst);
        let mut fee = self.fee.lock().unwrap();
        let current = *fee;
        *fee += self.fee_drift;
        Ok(current)
    }

    async fn register_oracle(&self, from: Address, fee: Wei, gas: u64) -> Result<TxHash, ChainError> {
        let mut registrations = self.registrations.lock().unwrap();
        registrations.push(Registration { from, fee, gas });
        if self.failing_registrations.contains(&from) {
            return Err(rejected());
        }
        Ok(TxHash::from_low_u64_be(registrations.len() as u64))
    }

    async fn my_indexes(&self, from: Address) -> Result<Vec<u8>, ChainError> {
        if self.failing_indexes.contains(&from) {
            return Err(rejected());
        }
        Ok(self.indexes.get(&from).cloned().unwrap_or_default())
    }

    async fn submit_oracle_response(
        &self,
        from: Address,
        response: &OracleResponse,
        gas: u64,
    ) -> Result<TxHash, ChainError> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(Submission {
            from,
            response: response.clone(),
            gas,
        });
        if self.failing_submissions.contains(&from) {
            return Err(rejected());
        }
        Ok(TxHash::from_low_u64_be(submissions.len() as u64))
    }

    async fn subscribe(&self, kind: EventKind, _from_block: u64) -> Result<EventStream, ChainError> {
        self.streams
            .lock()
            .unwrap()
            .remove(&kind)
            .ok_or(ChainError::ConnectionClosed)
    }
}

/// Hands out the given statuses in order, cycling.
pub struct SequenceStatusSource {
    statuses: Vec<FlightStatus>,
    next: AtomicUsize,
}

impl SequenceStatusSource {
    pub fn new(statuses: Vec<FlightStatus>) -> Self {
        Self {
            statuses,
            next: AtomicUsize::new(0),
        }
    }
}

impl StatusCodeSource for SequenceStatusSource {
    fn next_status(&self) -> FlightStatus {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.statuses[i % self.statuses.len()]
    }
}
