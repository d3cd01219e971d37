//! Registers node accounts as oracles

use std::sync::Arc;

use tracing::{error, info};

use crate::chain::OracleContract;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub attempted: usize,
    pub registered: usize,
    pub failed: usize,
}

pub struct OracleRegistrar {
    contract: Arc<dyn OracleContract>,
    oracle_cap: usize,
    gas_limit: u64,
}

impl OracleRegistrar {
    pub fn new(contract: Arc<dyn OracleContract>, oracle_cap: usize, gas_limit: u64) -> Self {
        Self {
            contract,
            oracle_cap,
            gas_limit,
        }
    }

    /// Registers up to `oracle_cap` accounts one after another, all paying the
    /// fee read at the start. Failures are logged and never returned.
    pub async fn register_oracles(&self) -> RegistrationSummary {
        let mut summary = RegistrationSummary::default();

        let fee = match self.contract.registration_fee().await {
            Ok(fee) => fee,
            Err(err) => {
                error!(error = %err, "Error registering oracles: could not read registration fee");
                return summary;
            }
        };

        let accounts = match self.contract.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                error!(error = %err, "Error registering oracles: could not list accounts");
                return summary;
            }
        };

        for account in accounts.iter().take(self.oracle_cap) {
            info!(?account, fee = %fee, "Registering oracle account");
            summary.attempted += 1;

            match self
                .contract
                .register_oracle(*account, fee, self.gas_limit)
                .await
            {
                Ok(tx_hash) => {
                    summary.registered += 1;
                    info!(?account, ?tx_hash, "Oracle registered");
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(?account, error = %err, "Error registering oracle");
                }
            }
        }

        info!(
            processed = summary.attempted,
            registered = summary.registered,
            failed = summary.failed,
            "Oracles registered"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::U256;
    use crate::testing::{accounts, FakeContract};

    #[tokio::test]
    async fn registers_at_most_twenty_accounts() {
        let fake = Arc::new(FakeContract::new(accounts(25)).with_fee(U256::from(1_000)));
        let registrar = OracleRegistrar::new(fake.clone(), 20, 5_000_000);

        let summary = registrar.register_oracles().await;

        assert_eq!(
            summary,
            RegistrationSummary {
                attempted: 20,
                registered: 20,
                failed: 0
            }
        );
        let calls = fake.registrations();
        assert_eq!(calls.len(), 20);
        assert_eq!(
            calls.iter().map(|c| c.from).collect::<Vec<_>>(),
            accounts(25)[..20].to_vec()
        );
        assert!(calls.iter().all(|c| c.gas == 5_000_000));
    }

    #[tokio::test]
    async fn registers_every_account_when_fewer_than_cap() {
        let fake = Arc::new(FakeContract::new(accounts(7)));
        let registrar = OracleRegistrar::new(fake.clone(), 20, 5_000_000);

        assert_eq!(registrar.register_oracles().await.attempted, 7);
        assert_eq!(fake.registrations().len(), 7);
    }

    #[tokio::test]
    async fn pays_the_fee_read_at_batch_start() {
        // the fake raises its fee after every read
        let fake = Arc::new(
            FakeContract::new(accounts(5))
                .with_fee(U256::from(10))
                .with_fee_drift(U256::one()),
        );
        let registrar = OracleRegistrar::new(fake.clone(), 20, 5_000_000);

        registrar.register_oracles().await;

        assert_eq!(fake.fee_reads(), 1);
        assert!(fake.registrations().iter().all(|c| c.fee == U256::from(10)));
    }

    #[tokio::test]
    async fn failed_account_does_not_stop_the_batch() {
        let all = accounts(4);
        let fake = Arc::new(FakeContract::new(all.clone()).failing_registration(all[1]));
        let registrar = OracleRegistrar::new(fake.clone(), 20, 5_000_000);

        let summary = registrar.register_oracles().await;

        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.registered, 3);
        assert_eq!(summary.failed, 1);
        let attempted: Vec<_> = fake.registrations().iter().map(|c| c.from).collect();
        assert_eq!(attempted, all);
    }

    #[tokio::test]
    async fn unreadable_fee_aborts_quietly() {
        let fake = Arc::new(FakeContract::new(accounts(3)).failing_fee());
        let registrar = OracleRegistrar::new(fake.clone(), 20, 5_000_000);

        assert_eq!(registrar.register_oracles().await, RegistrationSummary::default());
        assert!(fake.registrations().is_empty());
    }
}
