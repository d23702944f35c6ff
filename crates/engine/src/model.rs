use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Package tier
// ---------------------------------------------------------------------------

/// One of the three package tiers, identified by its stable slug.
///
/// Display names ("Standard", "Premium", "Signature") belong to the UI;
/// the sheet's plan names are mapped here by [`crate::header::plan_name_to_slug`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageTier {
    Basic,
    Classic,
    Signature,
}

impl PackageTier {
    pub const ALL: [PackageTier; 3] = [PackageTier::Basic, PackageTier::Classic, PackageTier::Signature];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Classic => "classic",
            Self::Signature => "signature",
        }
    }
}

impl std::fmt::Display for PackageTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PackageTier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::UnknownTier(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Addon key
// ---------------------------------------------------------------------------

/// Canonical addon vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddonKey {
    Album,
    SecondPhotog,
    ThirdPhotog,
    SecondVideographer,
    DontPublish,
    Drone,
    Video,
    Video4k,
    Raw,
    Express,
    PrintOnSite,
    Usb,
}

impl AddonKey {
    pub const ALL: [AddonKey; 12] = [
        AddonKey::Album,
        AddonKey::SecondPhotog,
        AddonKey::ThirdPhotog,
        AddonKey::SecondVideographer,
        AddonKey::DontPublish,
        AddonKey::Drone,
        AddonKey::Video,
        AddonKey::Video4k,
        AddonKey::Raw,
        AddonKey::Express,
        AddonKey::PrintOnSite,
        AddonKey::Usb,
    ];

    /// Order in which the configurator lists addons. The privacy toggle is always last.
    pub const DISPLAY_ORDER: [AddonKey; 12] = [
        AddonKey::SecondPhotog,
        AddonKey::ThirdPhotog,
        AddonKey::Video,
        AddonKey::Video4k,
        AddonKey::Drone,
        AddonKey::Album,
        AddonKey::Express,
        AddonKey::Raw,
        AddonKey::PrintOnSite,
        AddonKey::Usb,
        AddonKey::SecondVideographer,
        AddonKey::DontPublish,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::SecondPhotog => "secondPhotog",
            Self::ThirdPhotog => "thirdPhotog",
            Self::SecondVideographer => "secondVideographer",
            Self::DontPublish => "dontPublish",
            Self::Drone => "drone",
            Self::Video => "video",
            Self::Video4k => "video4k",
            Self::Raw => "raw",
            Self::Express => "express",
            Self::PrintOnSite => "printOnSite",
            Self::Usb => "usb",
        }
    }

    /// Human label used in quotes and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Album => "Album (premium)",
            Self::SecondPhotog => "Drugi fotograf",
            Self::ThirdPhotog => "Treći fotograf",
            Self::SecondVideographer => "Dodatni kamerman",
            Self::DontPublish => "Ne objavljuj u portfoliju / na mrežama",
            Self::Drone => "Dron",
            Self::Video => "Video",
            Self::Video4k => "4K video",
            Self::Raw => "RAW fajlovi",
            Self::Express => "Ekspres obrada",
            Self::PrintOnSite => "Izrada fotografija na licu mesta",
            Self::Usb => "USB",
        }
    }
}

impl std::fmt::Display for AddonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AddonKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::UnknownAddon(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Addon rule
// ---------------------------------------------------------------------------

/// Resolved state of one addon for an (event type, tier) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AddonRule {
    /// Bundled at no charge.
    Included,
    /// Opt-in, with an optional surcharge (absent means free).
    Available {
        #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_amount")]
        price: Option<f64>,
    },
    /// Not offered; never shown.
    Hidden,
}

impl AddonRule {
    pub fn available(price: f64) -> Self {
        AddonRule::Available { price: Some(price) }
    }

    /// Free opt-in. The privacy toggle always resolves to this.
    pub fn free() -> Self {
        AddonRule::available(0.0)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AddonRule::Available { .. })
    }

    /// Charge applied when the addon is selected; zero unless available with a price.
    pub fn surcharge(&self) -> f64 {
        match self {
            AddonRule::Available { price } => price.filter(|p| p.is_finite()).unwrap_or(0.0),
            AddonRule::Included | AddonRule::Hidden => 0.0,
        }
    }

    /// Default when the sheet says nothing about `key`.
    pub fn default_for(key: AddonKey) -> Self {
        if key == AddonKey::DontPublish {
            AddonRule::free()
        } else {
            AddonRule::Hidden
        }
    }
}

/// Whole amounts serialize as integers (`900`, not `900.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Amount(pub f64);

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = self.0;
        if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
            serializer.serialize_i64(n as i64)
        } else {
            serializer.serialize_f64(n)
        }
    }
}

pub(crate) fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Amount(*value).serialize(serializer)
}

fn serialize_opt_amount<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => Amount(*v).serialize(serializer),
        None => serializer.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// Pricing matrix
// ---------------------------------------------------------------------------

type TierKey = (String, PackageTier);
type AddonSlot = (String, PackageTier, AddonKey);

/// Event type × tier × addon pricing, built once per load and read-only afterwards.
///
/// Composite keys keep every lookup a single map access; missing addon
/// entries resolve through [`AddonRule::default_for`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingMatrix {
    pub(crate) event_types: Vec<String>,
    pub(crate) base: BTreeMap<TierKey, f64>,
    pub(crate) addons: BTreeMap<AddonSlot, AddonRule>,
    pub(crate) extras_included: BTreeMap<TierKey, Vec<String>>,
    pub(crate) notes: BTreeMap<TierKey, String>,
}

impl PricingMatrix {
    /// Event types in the order the sheet introduced them.
    pub fn event_types(&self) -> &[String] {
        &self.event_types
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.event_types.iter().any(|e| e == event)
    }

    pub fn is_empty(&self) -> bool {
        self.event_types.is_empty()
    }

    pub fn base_price(&self, event: &str, tier: PackageTier) -> Option<f64> {
        self.base.get(&(event.to_string(), tier)).copied()
    }

    /// Rule for an addon, falling back to the structural default.
    pub fn rule(&self, event: &str, tier: PackageTier, key: AddonKey) -> AddonRule {
        self.explicit_rule(event, tier, key)
            .unwrap_or_else(|| AddonRule::default_for(key))
    }

    /// Rule only if the sheet (or a build default) set one.
    pub fn explicit_rule(&self, event: &str, tier: PackageTier, key: AddonKey) -> Option<AddonRule> {
        self.addons.get(&(event.to_string(), tier, key)).copied()
    }

    /// Explicitly set rules for one event and tier, in canonical key order.
    pub fn rules_for(&self, event: &str, tier: PackageTier) -> Vec<(AddonKey, AddonRule)> {
        AddonKey::ALL
            .into_iter()
            .filter_map(|key| self.explicit_rule(event, tier, key).map(|rule| (key, rule)))
            .collect()
    }

    pub fn extras(&self, event: &str, tier: PackageTier) -> &[String] {
        self.extras_included
            .get(&(event.to_string(), tier))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn note(&self, event: &str, tier: PackageTier) -> Option<&str> {
        self.notes.get(&(event.to_string(), tier)).map(String::as_str)
    }

    // -- build-time mutation ------------------------------------------------

    /// First sighting of an event type seeds zero base prices for every tier.
    pub(crate) fn register_event(&mut self, event: &str) {
        if self.has_event(event) {
            return;
        }
        self.event_types.push(event.to_string());
        for tier in PackageTier::ALL {
            self.base.insert((event.to_string(), tier), 0.0);
        }
    }

    pub(crate) fn set_base(&mut self, event: &str, tier: PackageTier, price: f64) {
        self.base.insert((event.to_string(), tier), price);
    }

    pub(crate) fn set_rule(&mut self, event: &str, tier: PackageTier, key: AddonKey, rule: AddonRule) {
        self.addons.insert((event.to_string(), tier, key), rule);
    }

    pub(crate) fn set_rule_if_absent(&mut self, event: &str, tier: PackageTier, key: AddonKey, rule: AddonRule) {
        self.addons.entry((event.to_string(), tier, key)).or_insert(rule);
    }

    pub(crate) fn push_extra(&mut self, event: &str, tier: PackageTier, label: &str) {
        self.extras_included
            .entry((event.to_string(), tier))
            .or_default()
            .push(label.to_string());
    }

    pub(crate) fn set_note(&mut self, event: &str, tier: PackageTier, note: &str) {
        self.notes.insert((event.to_string(), tier), note.to_string());
    }
}

/// Nested `event → tier → …` document, the shape the configurator consumes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatrixDocument<'a> {
    event_types: &'a [String],
    base: BTreeMap<&'a str, BTreeMap<PackageTier, Amount>>,
    addons: BTreeMap<&'a str, BTreeMap<PackageTier, BTreeMap<AddonKey, AddonRule>>>,
    extras_included: BTreeMap<&'a str, BTreeMap<PackageTier, &'a [String]>>,
    notes: BTreeMap<&'a str, BTreeMap<PackageTier, &'a str>>,
}

impl Serialize for PricingMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut doc = MatrixDocument {
            event_types: &self.event_types,
            base: BTreeMap::new(),
            addons: BTreeMap::new(),
            extras_included: BTreeMap::new(),
            notes: BTreeMap::new(),
        };

        for event in &self.event_types {
            let ev = event.as_str();
            for tier in PackageTier::ALL {
                let base = self.base_price(ev, tier).unwrap_or(0.0);
                doc.base.entry(ev).or_default().insert(tier, Amount(base));
                doc.addons
                    .entry(ev)
                    .or_default()
                    .insert(tier, self.rules_for(ev, tier).into_iter().collect());
                doc.extras_included.entry(ev).or_default().insert(tier, self.extras(ev, tier));
                doc.notes.entry(ev).or_default().insert(tier, self.note(ev, tier).unwrap_or(""));
            }
        }

        doc.serialize(serializer)
    }
}
