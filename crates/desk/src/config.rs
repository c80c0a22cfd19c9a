//! Desk configuration, read from the environment.

use anyhow::{Context, Result};

use billdesk_billing::StockPolicy;

use crate::seed::SeedProfile;

pub const STOCK_POLICY_VAR: &str = "BILLDESK_STOCK_POLICY";
pub const SEED_VAR: &str = "BILLDESK_SEED";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeskConfig {
    pub stock_policy: StockPolicy,
    pub seed: SeedProfile,
}

impl DeskConfig {
    /// Read `BILLDESK_STOCK_POLICY` and `BILLDESK_SEED`; unset variables fall
    /// back to `reserve` and `demo`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stock_policy = match lookup(STOCK_POLICY_VAR) {
            Some(raw) => raw
                .parse::<StockPolicy>()
                .with_context(|| format!("{STOCK_POLICY_VAR} is invalid"))?,
            None => StockPolicy::default(),
        };

        let seed = match lookup(SEED_VAR) {
            Some(raw) => raw
                .parse::<SeedProfile>()
                .with_context(|| format!("{SEED_VAR} is invalid"))?,
            None => SeedProfile::default(),
        };

        Ok(Self { stock_policy, seed })
    }
}
