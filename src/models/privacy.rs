use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrivacyTech {
    RingSignatures,
    ZeroKnowledge,
    MimbleWimble,
    CoinJoin,
    Mixnet,
    ConfidentialCompute,
    StealthAddresses,
    Unknown,
}

impl std::fmt::Display for PrivacyTech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyTech::RingSignatures => write!(f, "Ring Signatures"),
            PrivacyTech::ZeroKnowledge => write!(f, "zk-SNARKs/STARKs"),
            PrivacyTech::MimbleWimble => write!(f, "MimbleWimble"),
            PrivacyTech::CoinJoin => write!(f, "CoinJoin"),
            PrivacyTech::Mixnet => write!(f, "Mixnet"),
            PrivacyTech::ConfidentialCompute => write!(f, "Confidential Compute"),
            PrivacyTech::StealthAddresses => write!(f, "Stealth Addresses"),
            PrivacyTech::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrivacyLevel {
    High,
    Medium,
    Minimal,
}

impl std::fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyLevel::High => write!(f, "High"),
            PrivacyLevel::Medium => write!(f, "Medium"),
            PrivacyLevel::Minimal => write!(f, "Minimal"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PrivacyMetadata {
    pub tech: PrivacyTech,
    pub level: PrivacyLevel,
    /// 0..=100
    pub score: u8,
}

impl PrivacyMetadata {
    pub const UNKNOWN: PrivacyMetadata = PrivacyMetadata {
        tech: PrivacyTech::Unknown,
        level: PrivacyLevel::Minimal,
        score: 0,
    };

    const fn new(tech: PrivacyTech, level: PrivacyLevel, score: u8) -> Self {
        Self { tech, level, score }
    }
}

use PrivacyLevel::{High, Medium, Minimal};
use PrivacyTech::*;

const TABLE: &[(&str, PrivacyMetadata)] = &[
    ("monero", PrivacyMetadata::new(RingSignatures, High, 95)),
    ("zcash", PrivacyMetadata::new(ZeroKnowledge, High, 90)),
    ("dash", PrivacyMetadata::new(CoinJoin, Medium, 55)),
    ("decred", PrivacyMetadata::new(CoinJoin, Medium, 50)),
    ("horizen", PrivacyMetadata::new(ZeroKnowledge, Medium, 65)),
    ("zano", PrivacyMetadata::new(RingSignatures, High, 90)),
    ("firo", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("beam", PrivacyMetadata::new(MimbleWimble, High, 85)),
    ("grin", PrivacyMetadata::new(MimbleWimble, High, 85)),
    ("haven-protocol", PrivacyMetadata::new(RingSignatures, High, 80)),
    ("dero", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("pirate-chain", PrivacyMetadata::new(ZeroKnowledge, High, 92)),
    ("oxen", PrivacyMetadata::new(RingSignatures, High, 80)),
    ("session-token", PrivacyMetadata::new(Mixnet, High, 80)),
    ("wownero", PrivacyMetadata::new(RingSignatures, High, 88)),
    ("ghost-by-mcafee", PrivacyMetadata::new(RingSignatures, High, 75)),
    ("particl", PrivacyMetadata::new(RingSignatures, High, 80)),
    ("verge", PrivacyMetadata::new(StealthAddresses, Medium, 45)),
    ("nym", PrivacyMetadata::new(Mixnet, High, 85)),
    ("secret", PrivacyMetadata::new(ConfidentialCompute, High, 75)),
    ("oasis-network", PrivacyMetadata::new(ConfidentialCompute, Medium, 60)),
    ("aleo", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("mina-protocol", PrivacyMetadata::new(ZeroKnowledge, Medium, 55)),
    ("iron-fish", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("aztec", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("railgun", PrivacyMetadata::new(ZeroKnowledge, High, 80)),
    ("tornado-cash", PrivacyMetadata::new(ZeroKnowledge, High, 80)),
    ("keep-network", PrivacyMetadata::new(ConfidentialCompute, Minimal, 30)),
    ("nucypher", PrivacyMetadata::new(ConfidentialCompute, Minimal, 30)),
    ("threshold-network-token", PrivacyMetadata::new(ConfidentialCompute, Minimal, 35)),
    ("phala-network", PrivacyMetadata::new(ConfidentialCompute, Medium, 60)),
    ("automata", PrivacyMetadata::new(ConfidentialCompute, Medium, 50)),
    ("beldex", PrivacyMetadata::new(RingSignatures, High, 80)),
    ("navcoin", PrivacyMetadata::new(ZeroKnowledge, Medium, 60)),
    ("pivx", PrivacyMetadata::new(ZeroKnowledge, Medium, 60)),
    ("zcoin", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("epic-cash", PrivacyMetadata::new(MimbleWimble, High, 80)),
    ("litecoin", PrivacyMetadata::new(MimbleWimble, Minimal, 25)),
    ("ergo", PrivacyMetadata::new(ZeroKnowledge, Medium, 50)),
    ("concordium", PrivacyMetadata::new(ZeroKnowledge, Minimal, 35)),
    ("hopr", PrivacyMetadata::new(Mixnet, High, 80)),
    ("orchid-protocol", PrivacyMetadata::new(Mixnet, Medium, 55)),
    ("sentinel", PrivacyMetadata::new(Mixnet, Medium, 55)),
    ("mysterium", PrivacyMetadata::new(Mixnet, Medium, 50)),
    ("deeponion", PrivacyMetadata::new(CoinJoin, Medium, 55)),
    ("bitcoin-private", PrivacyMetadata::new(ZeroKnowledge, Medium, 55)),
    ("komodo", PrivacyMetadata::new(ZeroKnowledge, Minimal, 35)),
    ("zclassic", PrivacyMetadata::new(ZeroKnowledge, High, 75)),
    ("arrr", PrivacyMetadata::new(ZeroKnowledge, High, 92)),
    ("umbra", PrivacyMetadata::new(StealthAddresses, Medium, 50)),
    ("labyrinth", PrivacyMetadata::new(ZeroKnowledge, Medium, 60)),
    ("manta-network", PrivacyMetadata::new(ZeroKnowledge, Medium, 60)),
    ("penumbra", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("namada", PrivacyMetadata::new(ZeroKnowledge, High, 85)),
    ("dusk-network", PrivacyMetadata::new(ZeroKnowledge, High, 80)),
    ("mobilecoin", PrivacyMetadata::new(RingSignatures, High, 80)),
    ("xhaven", PrivacyMetadata::new(RingSignatures, High, 75)),
    ("spectre-network", PrivacyMetadata::new(RingSignatures, High, 75)),
];

lazy_static! {
    static ref PRIVACY_METADATA: HashMap<&'static str, PrivacyMetadata> =
        TABLE.iter().copied().collect();
}

/// Classification for `coin_id`, or [`PrivacyMetadata::UNKNOWN`] when unmapped.
pub fn lookup(coin_id: &str) -> PrivacyMetadata {
    PRIVACY_METADATA
        .get(coin_id)
        .copied()
        .unwrap_or(PrivacyMetadata::UNKNOWN)
}

pub fn known_ids() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(id, _)| *id)
}
