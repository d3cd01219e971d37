//! Simulated oracle responses from the node's own accounts
//!
//! Every account whose assigned indexes contain the requested index reports a
//! status code, mimicking independent oracle nodes.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::status_source::StatusCodeSource;
use crate::chain::OracleContract;
use crate::models::oracle::{OracleRequest, OracleResponse};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSummary {
    pub submitted: usize,
    pub failed: usize,
}

pub struct ResponseSimulator {
    contract: Arc<dyn OracleContract>,
    statuses: Arc<dyn StatusCodeSource>,
    gas_limit: u64,
}

impl ResponseSimulator {
    pub fn new(
        contract: Arc<dyn OracleContract>,
        statuses: Arc<dyn StatusCodeSource>,
        gas_limit: u64,
    ) -> Self {
        Self {
            contract,
            statuses,
            gas_limit,
        }
    }

    /// Submits one response per matching (account, index) pair. Nothing is
    /// returned as an error; failures are logged and counted.
    pub async fn simulate_oracle_response(&self, request: &OracleRequest) -> SimulationSummary {
        let mut summary = SimulationSummary::default();

        let accounts = match self.contract.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                error!(error = %err, "Error simulating oracle response");
                return summary;
            }
        };

        for account in accounts {
            let indexes = match self.contract.my_indexes(account).await {
                Ok(indexes) => indexes,
                Err(err) => {
                    error!(?account, error = %err, "Error fetching oracle indexes");
                    continue;
                }
            };
            debug!(?account, ?indexes, "Oracle indexes");

            for index in indexes.into_iter().filter(|index| *index == request.index) {
                let status = self.statuses.next_status();
                info!(
                    flight = %request.flight,
                    index,
                    status = status.code(),
                    ?account,
                    "Submitting oracle response"
                );

                let response = OracleResponse::for_request(request, status);
                match self
                    .contract
                    .submit_oracle_response(account, &response, self.gas_limit)
                    .await
                {
                    Ok(_) => summary.submitted += 1,
                    Err(err) => {
                        summary.failed += 1;
                        error!(?account, error = %err, "Error submitting oracle response");
                    }
                }
            }
        }

        summary
    }
}
