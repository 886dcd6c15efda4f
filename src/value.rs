use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Identifies a class of native tokens, e.g. a minting policy hash.
pub type PolicyId = String;
pub type AssetName = String;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ValueError {
    #[error("coin overflow")]
    CoinOverflow,
    #[error("not enough coin: have {available}, need {required}")]
    InsufficientCoin { available: u64, required: u64 },
    #[error("asset quantity overflow for {policy}.{name}")]
    AssetOverflow { policy: PolicyId, name: AssetName },
    #[error("not enough of asset {policy}.{name}: have {available}, need {required}")]
    InsufficientAsset {
        policy: PolicyId,
        name: AssetName,
        available: u64,
        required: u64,
    },
}

/// A multi-asset value: an amount of the native coin plus any number of tokens.
/// Tokens with zero quantity are never stored, so two equal values always compare equal.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Value {
    coin: u64,
    assets: BTreeMap<PolicyId, BTreeMap<AssetName, u64>>,
}

impl Value {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn lovelaces(coin: u64) -> Self {
        Self {
            coin,
            assets: BTreeMap::new(),
        }
    }

    /// Adds `quantity` of the given token to the value, saturating at `u64::MAX`.
    pub fn with_asset(mut self, policy: &str, name: &str, quantity: u64) -> Self {
        if quantity > 0 {
            let held = self
                .assets
                .entry(policy.to_string())
                .or_default()
                .entry(name.to_string())
                .or_insert(0);
            *held = held.saturating_add(quantity);
        }
        self
    }

    pub fn coin(&self) -> u64 {
        self.coin
    }

    pub fn asset(&self, policy: &str, name: &str) -> u64 {
        self.assets
            .get(policy)
            .and_then(|assets| assets.get(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn assets(&self) -> &BTreeMap<PolicyId, BTreeMap<AssetName, u64>> {
        &self.assets
    }

    pub fn is_coin_only(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn checked_add(&self, rhs: &Value) -> Result<Value, ValueError> {
        let mut result = self.clone();
        result.coin = result
            .coin
            .checked_add(rhs.coin)
            .ok_or(ValueError::CoinOverflow)?;
        for (policy, assets) in &rhs.assets {
            let entry = result.assets.entry(policy.clone()).or_default();
            for (name, quantity) in assets {
                let current = entry.entry(name.clone()).or_insert(0);
                *current = current
                    .checked_add(*quantity)
                    .ok_or_else(|| ValueError::AssetOverflow {
                        policy: policy.clone(),
                        name: name.clone(),
                    })?;
            }
        }
        Ok(result)
    }

    /// Subtracts `rhs`, failing if any component would go negative.
    pub fn checked_sub(&self, rhs: &Value) -> Result<Value, ValueError> {
        let mut result = self.clone();
        result.coin = result
            .coin
            .checked_sub(rhs.coin)
            .ok_or(ValueError::InsufficientCoin {
                available: self.coin,
                required: rhs.coin,
            })?;
        for (policy, assets) in &rhs.assets {
            for (name, quantity) in assets {
                let available = self.asset(policy, name);
                let remaining =
                    available
                        .checked_sub(*quantity)
                        .ok_or_else(|| ValueError::InsufficientAsset {
                            policy: policy.clone(),
                            name: name.clone(),
                            available,
                            required: *quantity,
                        })?;
                result.set_asset(policy, name, remaining);
            }
        }
        Ok(result)
    }

    fn set_asset(&mut self, policy: &str, name: &str, quantity: u64) {
        if quantity == 0 {
            if let Some(assets) = self.assets.get_mut(policy) {
                assets.remove(name);
                if assets.is_empty() {
                    self.assets.remove(policy);
                }
            }
        } else {
            self.assets
                .entry(policy.to_string())
                .or_default()
                .insert(name.to_string(), quantity);
        }
    }

    /// Sums the values, failing on overflow.
    pub fn checked_sum<'a, I: IntoIterator<Item = &'a Value>>(
        values: I,
    ) -> Result<Value, ValueError> {
        values
            .into_iter()
            .try_fold(Value::zero(), |acc, value| acc.checked_add(value))
    }
}

impl From<u64> for Value {
    fn from(coin: u64) -> Self {
        Self::lovelaces(coin)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lovelace", self.coin)?;
        for (policy, assets) in &self.assets {
            for (name, quantity) in assets {
                write!(f, " + {} {}.{}", quantity, policy, name)?;
            }
        }
        Ok(())
    }
}
