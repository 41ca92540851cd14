//! Configuration for the predictor and cache models.
//!
//! This module defines the configuration structures used to build a
//! simulation context. It provides:
//! 1. **Defaults:** Table sizes and cache geometry used when a field is omitted.
//! 2. **Structures:** Predictor and per-level cache configuration.
//! 3. **Enums:** Predictor kind and cache replacement policy, with name lookup.
//!
//! Configuration is usually supplied as JSON (`Config::from_json`) or built with
//! `Config::default()`.

use serde::Deserialize;

use crate::common::error::Result;

/// Default configuration constants.
mod defaults {
    /// Default log2 size of the main pattern history tables (64K entries).
    pub const LG_PHT_ENTRIES: u32 = 16;

    /// Default log2 size of the bimodal choice table (64K entries).
    pub const LG_CHOICE_ENTRIES: u32 = 16;

    /// Extra word-address bits dropped before hashing the PC.
    pub const PC_SHIFT: u32 = 0;

    /// Default global history length in bits.
    pub const HISTORY_LENGTH: usize = 64;

    /// Default cache level name.
    pub const CACHE_NAME: &str = "l1D";

    /// Default cache line size in bytes.
    pub const CACHE_LINE: usize = 16;

    /// Default associativity (1 way = direct-mapped).
    pub const CACHE_WAYS: usize = 1;

    /// Default number of sets.
    pub const CACHE_SETS: usize = 64;

    /// Default access latency in cycles.
    pub const CACHE_LATENCY: u64 = 1;

    /// Seed for random replacement.
    pub const CACHE_SEED: u64 = 0x5eed;
}

/// Branch predictor algorithms.
///
/// Deserialized from a free-form name; unknown names select [`Tage`](Self::Tage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum PredictorKind {
    /// PC XOR folded global history into one counter table.
    GShare,
    /// Choice table selecting between taken- and not-taken-biased tables.
    Bimodal,
    /// Sparse table keyed by exact (history, PC) pairs.
    GTagged,
    /// History-only indexed table with asymmetric hysteresis.
    UberHistory,
    /// Tagged geometric history predictor.
    #[default]
    Tage,
}

impl PredictorKind {
    /// Every selectable kind with its configuration name.
    pub const NAMES: [(&'static str, Self); 5] = [
        ("gshare", Self::GShare),
        ("bimodal", Self::Bimodal),
        ("gtagged", Self::GTagged),
        ("uberhistory", Self::UberHistory),
        ("tage", Self::Tage),
    ];

    /// Resolves a configuration name, returning `None` when it is not known.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, kind)| kind)
    }

    /// Resolves a configuration name, falling back to the default predictor.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_default()
    }

    /// Configuration name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GShare => "gshare",
            Self::Bimodal => "bimodal",
            Self::GTagged => "gtagged",
            Self::UberHistory => "uberhistory",
            Self::Tage => "tage",
        }
    }
}

impl From<String> for PredictorKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Cache organizations and replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// One way per set.
    #[serde(alias = "direct")]
    DirectMapped,
    /// Single set, true LRU.
    #[serde(alias = "full_lru")]
    FullAssocLru,
    /// Single set, random victim.
    #[serde(alias = "full_random")]
    FullAssocRandom,
    /// True LRU per set.
    #[serde(alias = "lru")]
    SetAssocLru,
    /// Random victim per set.
    #[serde(alias = "random")]
    SetAssocRandom,
    /// Tree pseudo-LRU packed into one 64-bit word per set.
    #[serde(alias = "plru")]
    PlruLowAssoc,
    /// Tree pseudo-LRU with one byte per tree node.
    PlruHighAssoc,
    /// Exact LRU driven by the instruction counter.
    #[serde(alias = "timestamp")]
    TimestampLru,
}

impl ReplacementPolicy {
    /// Picks the organization implied by the geometry: one way is
    /// direct-mapped, one set is fully associative, anything else is
    /// set-associative LRU.
    pub const fn select(ways: usize, sets: usize) -> Self {
        if ways == 1 {
            Self::DirectMapped
        } else if sets == 1 {
            Self::FullAssocLru
        } else {
            Self::SetAssocLru
        }
    }

    /// Short name used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DirectMapped => "direct_mapped",
            Self::FullAssocLru => "full_assoc_lru",
            Self::FullAssocRandom => "full_assoc_random",
            Self::SetAssocLru => "set_assoc_lru",
            Self::SetAssocRandom => "set_assoc_random",
            Self::PlruLowAssoc => "plru_low_assoc",
            Self::PlruHighAssoc => "plru_high_assoc",
            Self::TimestampLru => "timestamp_lru",
        }
    }

    /// Returns `true` for organizations that hold every line in one set.
    pub const fn is_fully_associative(self) -> bool {
        matches!(self, Self::FullAssocLru | Self::FullAssocRandom)
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Branch predictor configuration.
    pub predictor: PredictorConfig,
    /// Cache levels, closest to the core first. Empty disables the cache model.
    pub caches: Vec<CacheConfig>,
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`](crate::common::ConfigError::Parse) if the
    /// document is malformed or a field has the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// A configuration with the default predictor and a single default L1.
    pub fn with_default_l1() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            caches: vec![CacheConfig::default()],
        }
    }
}

/// Branch predictor parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Predictor algorithm.
    #[serde(default)]
    pub kind: PredictorKind,
    /// log2 of the main table size.
    #[serde(default = "PredictorConfig::default_lg_pht")]
    pub lg_pht_entries: u32,
    /// log2 of the bimodal choice table size.
    #[serde(default = "PredictorConfig::default_lg_choice")]
    pub lg_choice_entries: u32,
    /// Extra PC bits dropped before gshare indexing.
    #[serde(default = "PredictorConfig::default_pc_shift")]
    pub pc_shift: u32,
    /// Global history length in bits. Raised to the predictor's requirement.
    #[serde(default = "PredictorConfig::default_history")]
    pub history_length: usize,
}

impl PredictorConfig {
    const fn default_lg_pht() -> u32 {
        defaults::LG_PHT_ENTRIES
    }
    const fn default_lg_choice() -> u32 {
        defaults::LG_CHOICE_ENTRIES
    }
    const fn default_pc_shift() -> u32 {
        defaults::PC_SHIFT
    }
    const fn default_history() -> usize {
        defaults::HISTORY_LENGTH
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            kind: PredictorKind::default(),
            lg_pht_entries: defaults::LG_PHT_ENTRIES,
            lg_choice_entries: defaults::LG_CHOICE_ENTRIES,
            pc_shift: defaults::PC_SHIFT,
            history_length: defaults::HISTORY_LENGTH,
        }
    }
}

/// Geometry and policy of one cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Level name used in reports.
    #[serde(default = "CacheConfig::default_name")]
    pub name: String,
    /// Line size in bytes.
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,
    /// Associativity.
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,
    /// Number of sets.
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,
    /// Hit latency in cycles.
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,
    /// Explicit organization; derived from the geometry when absent.
    #[serde(default)]
    pub policy: Option<ReplacementPolicy>,
    /// Enables reuse-distance accounting.
    #[serde(default)]
    pub stack_distance: bool,
    /// Seed for random replacement.
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,
}

impl CacheConfig {
    fn default_name() -> String {
        defaults::CACHE_NAME.to_string()
    }
    const fn default_line() -> usize {
        defaults::CACHE_LINE
    }
    const fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }
    const fn default_sets() -> usize {
        defaults::CACHE_SETS
    }
    const fn default_latency() -> u64 {
        defaults::CACHE_LATENCY
    }
    const fn default_seed() -> u64 {
        defaults::CACHE_SEED
    }

    /// Builds a configuration for the given geometry with default name,
    /// latency and policy selection.
    pub fn new(line_bytes: usize, ways: usize, sets: usize) -> Self {
        Self {
            line_bytes,
            ways,
            sets,
            ..Self::default()
        }
    }

    /// Sets the level name.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Sets the hit latency.
    #[must_use]
    pub const fn with_latency(mut self, latency: u64) -> Self {
        self.latency = latency;
        self
    }

    /// Forces a replacement policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ReplacementPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Enables reuse-distance accounting.
    #[must_use]
    pub const fn with_stack_distance(mut self) -> Self {
        self.stack_distance = true;
        self
    }

    /// Policy to build: the explicit one, or the geometry-derived selection.
    pub fn resolved_policy(&self) -> ReplacementPolicy {
        self.policy
            .unwrap_or_else(|| ReplacementPolicy::select(self.ways, self.sets))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            sets: defaults::CACHE_SETS,
            latency: defaults::CACHE_LATENCY,
            policy: None,
            stack_distance: false,
            seed: defaults::CACHE_SEED,
        }
    }
}
