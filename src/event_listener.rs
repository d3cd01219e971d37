//! Event listener for FlightSurety contract events

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::chain::{EventStream, OracleContract};
use crate::error::ChainError;
use crate::models::oracle::{EventKind, EventPayload, OracleRequest};
use crate::services::ResponseSimulator;

/// Follows the `OracleRequest` and `FlightStatusInfo` streams, logging every
/// event and forwarding live requests to a [`RequestDispatcher`]. Requests
/// replayed from history are logged only.
pub struct EventListener {
    contract: Arc<dyn OracleContract>,
    from_block: u64,
    requests: mpsc::UnboundedSender<OracleRequest>,
}

impl EventListener {
    pub fn new(
        contract: Arc<dyn OracleContract>,
        from_block: u64,
        requests: mpsc::UnboundedSender<OracleRequest>,
    ) -> Self {
        Self {
            contract,
            from_block,
            requests,
        }
    }

    /// Subscribes to both streams and listens until they end. Only a failure
    /// to subscribe is returned; errors inside a stream are logged.
    pub async fn start(self) -> Result<(), ChainError> {
        let oracle_requests = self
            .contract
            .subscribe(EventKind::OracleRequest, self.from_block)
            .await?;
        let status_info = self
            .contract
            .subscribe(EventKind::FlightStatusInfo, self.from_block)
            .await?;

        info!(from_block = self.from_block, "Listening for contract events");

        tokio::join!(
            watch_oracle_requests(oracle_requests, self.requests),
            watch_flight_status_info(status_info),
        );

        warn!("contract event streams closed");
        Ok(())
    }
}

async fn watch_oracle_requests(
    mut stream: EventStream,
    requests: mpsc::UnboundedSender<OracleRequest>,
) {
    while let Some(item) = stream.recv().await {
        match item {
            Ok(event) => {
                info!(
                    block = ?event.block_number,
                    tx = ?event.tx_hash,
                    replayed = event.replayed,
                    payload = ?event.payload,
                    "OracleRequest event"
                );
                if event.replayed {
                    continue;
                }
                if let EventPayload::OracleRequest(request) = event.payload {
                    if requests.send(request).is_err() {
                        debug!("request dispatcher is gone; not forwarding");
                    }
                }
            }
            Err(err) => error!(error = %err, "OracleRequest event error"),
        }
    }
}

async fn watch_flight_status_info(mut stream: EventStream) {
    while let Some(item) = stream.recv().await {
        match item {
            Ok(event) => {
                info!(
                    block = ?event.block_number,
                    tx = ?event.tx_hash,
                    replayed = event.replayed,
                    payload = ?event.payload,
                    "FlightStatusInfo event"
                );
            }
            Err(err) => error!(error = %err, "FlightStatusInfo event error"),
        }
    }
}

/// Turns observed requests into simulated responses when enabled.
///
/// Nothing is submitted until `registered` reads `true`, so registration and
/// response transactions never overlap.
pub struct RequestDispatcher {
    simulator: Arc<ResponseSimulator>,
    auto_respond: bool,
    registered: watch::Receiver<bool>,
}

impl RequestDispatcher {
    pub fn new(
        simulator: Arc<ResponseSimulator>,
        auto_respond: bool,
        registered: watch::Receiver<bool>,
    ) -> Self {
        Self {
            simulator,
            auto_respond,
            registered,
        }
    }

    /// Handles requests one at a time until every sender is dropped.
    pub async fn run(mut self, mut requests: mpsc::UnboundedReceiver<OracleRequest>) {
        while let Some(request) = requests.recv().await {
            if !self.auto_respond {
                debug!(index = request.index, flight = %request.flight, "auto respond disabled; ignoring request");
                continue;
            }

            // a dropped sender means registration will never report; go ahead
            if self.registered.wait_for(|done| *done).await.is_err() {
                debug!("registration status unavailable; dispatching anyway");
            }

            let summary = self.simulator.simulate_oracle_response(&request).await;
            info!(
                index = request.index,
                flight = %request.flight,
                submitted = summary.submitted,
                failed = summary.failed,
                "Simulated oracle responses"
            );
        }
    }
}
