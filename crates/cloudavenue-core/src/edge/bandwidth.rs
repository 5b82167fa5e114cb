// ── Bandwidth allocation ──
//
// Every Tier-0 VRF has a class of service that fixes both its total
// capacity and the ladder of bandwidths an edge on it may request.

use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::error::CoreError;

/// Bandwidth of a freshly created edge, in Mbps.
pub const DEFAULT_BANDWIDTH: u32 = 5;

/// Below this headroom a Tier-0 cannot host one more edge.
pub const MIN_REMAINING: u32 = 5;

const STANDARD: &[u32] = &[5, 25, 50, 75, 100, 150, 200, 250, 300];
const PREMIUM_EXTRA: &[u32] = &[400, 500, 600, 700, 800, 900, 1000];
const DEDICATED_MEDIUM_EXTRA: &[u32] = &[2000];
const DEDICATED_LARGE_EXTRA: &[u32] = &[3000, 4000, 5000, 6000];

/// Class of service of a Tier-0 VRF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier0Class {
    Standard,
    Premium,
    DedicatedMedium,
    DedicatedLarge,
}

impl Tier0Class {
    /// Total capacity of the Tier-0, in Mbps.
    pub fn capacity(self) -> u32 {
        match self {
            Self::Standard => 300,
            Self::Premium => 1000,
            Self::DedicatedMedium => 3500,
            Self::DedicatedLarge => 10000,
        }
    }

    /// Allowed edge bandwidths, strictly increasing.
    pub fn ladder(self) -> Vec<u32> {
        let tiers: &[&[u32]] = match self {
            Self::Standard => &[STANDARD],
            Self::Premium => &[STANDARD, PREMIUM_EXTRA],
            Self::DedicatedMedium => &[STANDARD, PREMIUM_EXTRA, DEDICATED_MEDIUM_EXTRA],
            Self::DedicatedLarge => &[
                STANDARD,
                PREMIUM_EXTRA,
                DEDICATED_MEDIUM_EXTRA,
                DEDICATED_LARGE_EXTRA,
            ],
        };
        tiers.iter().flat_map(|tier| tier.iter().copied()).collect()
    }

    pub fn allows(self, bandwidth: u32) -> bool {
        self.ladder().contains(&bandwidth)
    }

    /// Fail with `InvalidFormat` when `bandwidth` is off the ladder.
    pub fn validate(self, bandwidth: u32) -> Result<(), CoreError> {
        if self.allows(bandwidth) {
            Ok(())
        } else {
            Err(CoreError::invalid(
                "bandwidth",
                format!(
                    "{bandwidth} Mbps is not allowed on a {self} tier-0 (allowed: {:?})",
                    self.ladder()
                ),
            ))
        }
    }
}

impl FromStr for Tier0Class {
    type Err = CoreError;

    /// Accepts the upstream `VRF_`-prefixed spelling and the bare class.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("VRF_") {
            "STANDARD" => Ok(Self::Standard),
            "PREMIUM" => Ok(Self::Premium),
            "DEDICATED_MEDIUM" => Ok(Self::DedicatedMedium),
            "DEDICATED_LARGE" => Ok(Self::DedicatedLarge),
            other => Err(CoreError::invalid(
                "tier-0 class of service",
                format!("unknown class {other}"),
            )),
        }
    }
}

/// Bandwidth budget of one Tier-0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier0Capacity {
    pub tier0: String,
    pub class: Tier0Class,
    pub total: u32,
    pub allocated: u32,
}

impl Tier0Capacity {
    /// Build the budget from the bandwidths of every edge on the Tier-0.
    pub fn new(tier0: impl Into<String>, class: Tier0Class, edge_bandwidths: &[u32]) -> Self {
        Self {
            tier0: tier0.into(),
            class,
            total: class.capacity(),
            allocated: edge_bandwidths.iter().fold(0, |acc, b| acc.saturating_add(*b)),
        }
    }

    /// Unallocated Mbps, saturating at zero.
    pub fn available(&self) -> u32 {
        self.total.saturating_sub(self.allocated)
    }

    /// Headroom for one more edge; fails when below the smallest rung.
    pub fn remaining(&self) -> Result<u32, CoreError> {
        let available = self.available();
        if available < MIN_REMAINING {
            return Err(CoreError::CapacityExhausted {
                tier0: self.tier0.clone(),
                remaining: available,
            });
        }
        Ok(available)
    }

    /// Check that an edge currently using `current` Mbps may move to
    /// `requested` Mbps.
    pub fn ensure_fits(&self, requested: u32, current: u32) -> Result<(), CoreError> {
        self.class.validate(requested)?;
        let headroom = self.available().saturating_add(current);
        if requested > headroom {
            return Err(CoreError::CapacityExhausted {
                tier0: self.tier0.clone(),
                remaining: self.available(),
            });
        }
        Ok(())
    }
}
