//! Price calculator: quotes and addon availability over a built matrix.

use serde::{Deserialize, Serialize};

use crate::model::{serialize_amount, AddonKey, AddonRule, PackageTier, PricingMatrix};

/// Per-unit surcharge for extra units (hours past the cutoff).
pub const UNIT_RATE: f64 = 60.0;

/// One number per tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPrices {
    pub basic: f64,
    pub classic: f64,
    pub signature: f64,
}

impl Default for TierPrices {
    /// Published starting prices, used when the sheet has no base for a tier.
    fn default() -> Self {
        Self { basic: 500.0, classic: 900.0, signature: 1500.0 }
    }
}

impl TierPrices {
    pub fn get(&self, tier: PackageTier) -> f64 {
        match tier {
            PackageTier::Basic => self.basic,
            PackageTier::Classic => self.classic,
            PackageTier::Signature => self.signature,
        }
    }

    pub fn set(&mut self, tier: PackageTier, value: f64) {
        match tier {
            PackageTier::Basic => self.basic = value,
            PackageTier::Classic => self.classic = value,
            PackageTier::Signature => self.signature = value,
        }
    }
}

/// Pricing constants the sheet does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSchedule {
    pub unit_rate: f64,
    pub fallback_base: TierPrices,
}

impl Default for PriceSchedule {
    fn default() -> Self {
        Self { unit_rate: UNIT_RATE, fallback_base: TierPrices::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLine {
    pub key: AddonKey,
    #[serde(serialize_with = "serialize_amount")]
    pub price: f64,
}

/// Itemized price for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub event_type: String,
    pub tier: PackageTier,
    #[serde(serialize_with = "serialize_amount")]
    pub base: f64,
    pub base_from_fallback: bool,
    pub extra_units: u32,
    #[serde(serialize_with = "serialize_amount")]
    pub extra_units_charge: f64,
    /// Selected addons that were honored, with their surcharge.
    pub addons: Vec<QuoteLine>,
    /// Selected addons that are not available for this event and tier.
    pub ignored: Vec<AddonKey>,
    pub total: i64,
}

impl PriceSchedule {
    /// Price a configuration.
    ///
    /// Selections are honored only when the addon is `Available` for the
    /// event and tier; anything else is listed in `ignored` and costs
    /// nothing. Duplicate selections count once. The total is rounded to
    /// the nearest whole unit.
    pub fn quote(
        &self,
        matrix: &PricingMatrix,
        event: &str,
        tier: PackageTier,
        checked: &[AddonKey],
        extra_units: u32,
    ) -> Quote {
        let (base, base_from_fallback) = match matrix.base_price(event, tier) {
            Some(price) if price.is_finite() => (price, false),
            _ => (self.fallback_base.get(tier), true),
        };
        let extra_units_charge = f64::from(extra_units) * self.unit_rate;

        let mut addons: Vec<QuoteLine> = Vec::new();
        let mut ignored: Vec<AddonKey> = Vec::new();
        for &key in checked {
            if addons.iter().any(|l| l.key == key) || ignored.contains(&key) {
                continue;
            }
            let rule = matrix.rule(event, tier, key);
            if rule.is_available() {
                addons.push(QuoteLine { key, price: rule.surcharge() });
            } else {
                ignored.push(key);
            }
        }

        let sum = base + extra_units_charge + addons.iter().map(|l| l.price).sum::<f64>();

        Quote {
            event_type: event.to_string(),
            tier,
            base,
            base_from_fallback,
            extra_units,
            extra_units_charge,
            addons,
            ignored,
            total: sum.round() as i64,
        }
    }

    pub fn compute_price(
        &self,
        matrix: &PricingMatrix,
        event: &str,
        tier: PackageTier,
        checked: &[AddonKey],
        extra_units: u32,
    ) -> i64 {
        self.quote(matrix, event, tier, checked, extra_units).total
    }
}

/// [`PriceSchedule::compute_price`] with the default schedule.
pub fn compute_price(
    matrix: &PricingMatrix,
    event: &str,
    tier: PackageTier,
    checked: &[AddonKey],
    extra_units: u32,
) -> i64 {
    PriceSchedule::default().compute_price(matrix, event, tier, checked, extra_units)
}

/// An addon the customer may opt into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferedAddon {
    pub key: AddonKey,
    pub label: &'static str,
    #[serde(serialize_with = "serialize_amount")]
    pub price: f64,
}

/// Addon keys for one event and tier, split by state, each in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddonAvailability {
    pub available: Vec<OfferedAddon>,
    pub included: Vec<AddonKey>,
    pub hidden: Vec<AddonKey>,
}

/// Which checkboxes to render and which to badge as included.
pub fn addon_availability(matrix: &PricingMatrix, event: &str, tier: PackageTier) -> AddonAvailability {
    let mut out = AddonAvailability::default();
    for key in AddonKey::DISPLAY_ORDER {
        match matrix.rule(event, tier, key) {
            rule @ AddonRule::Available { .. } => out.available.push(OfferedAddon {
                key,
                label: key.label(),
                price: rule.surcharge(),
            }),
            AddonRule::Included => out.included.push(key),
            AddonRule::Hidden => out.hidden.push(key),
        }
    }
    out
}

/// Cheapest positive base price per tier over all event types.
///
/// Tiers with no positive base anywhere get the schedule's fallback.
pub fn min_base_by_tier(matrix: &PricingMatrix, schedule: &PriceSchedule) -> TierPrices {
    let mut out = schedule.fallback_base;
    for tier in PackageTier::ALL {
        let min = matrix
            .event_types()
            .iter()
            .filter_map(|ev| matrix.base_price(ev, tier))
            .filter(|p| p.is_finite() && *p > 0.0)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |m| m.min(p))));
        if let Some(min) = min {
            out.set(tier, min);
        }
    }
    out
}
