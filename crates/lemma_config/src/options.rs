//! Pragma options and their infective/coinfective classification.
//!
//! Every module is checked under a [`PragmaOptions`] value: the session's base
//! options with the module's own `OPTIONS` pragmas applied on top. The value
//! used is recorded in the module's interface so that importers can check
//! that the two configurations are compatible.

use lemma_common::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The set of boolean pragma flags a module can be checked with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PragmaOptions {
    /// `--safe`: disallow postulates and unsafe pragmas.
    pub safe: bool,
    /// `--without-K`: disable the K rule in pattern matching.
    #[serde(rename = "without-K")]
    pub without_k: bool,
    /// `--cubical-compatible`: generate support code for cubical importers.
    pub cubical_compatible: bool,
    /// `--no-universe-polymorphism`.
    pub no_universe_polymorphism: bool,
    /// `--no-sized-types`.
    pub no_sized_types: bool,
    /// `--no-guardedness`.
    pub no_guardedness: bool,
    /// `--prop`: enable the `Prop` universe.
    pub prop: bool,
    /// `--two-level`: enable the strict universe hierarchy.
    pub two_level: bool,
    /// `--cumulativity`: enable subtyping between universes.
    pub cumulativity: bool,
    /// `--rewriting`: enable user-defined rewrite rules.
    pub rewriting: bool,
    /// `--cubical`: enable cubical primitives.
    pub cubical: bool,
    /// `--guarded`: enable guarded type theory primitives.
    pub guarded: bool,
    /// `--flat-split`: allow splitting on flat arguments.
    pub flat_split: bool,
    /// `--allow-unsolved-metas`: report unsolved metas as warnings instead of errors.
    pub allow_unsolved_metas: bool,
}

/// A single addressable pragma flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionFlag {
    /// `--safe`.
    Safe,
    /// `--without-K`.
    WithoutK,
    /// `--cubical-compatible`.
    CubicalCompatible,
    /// `--no-universe-polymorphism`.
    NoUniversePolymorphism,
    /// `--no-sized-types`.
    NoSizedTypes,
    /// `--no-guardedness`.
    NoGuardedness,
    /// `--prop`.
    Prop,
    /// `--two-level`.
    TwoLevel,
    /// `--cumulativity`.
    Cumulativity,
    /// `--rewriting`.
    Rewriting,
    /// `--cubical`.
    Cubical,
    /// `--guarded`.
    Guarded,
    /// `--flat-split`.
    FlatSplit,
    /// `--allow-unsolved-metas`.
    AllowUnsolvedMetas,
}

/// Flags that, when enabled in an importer, must also be enabled in every
/// module it imports (transitively).
pub const COINFECTIVE: &[OptionFlag] = &[
    OptionFlag::Safe,
    OptionFlag::WithoutK,
    OptionFlag::CubicalCompatible,
    OptionFlag::NoUniversePolymorphism,
    OptionFlag::NoSizedTypes,
    OptionFlag::NoGuardedness,
];

/// Flags that, when enabled in an imported module, must also be enabled in
/// every module importing it.
pub const INFECTIVE: &[OptionFlag] = &[
    OptionFlag::Prop,
    OptionFlag::TwoLevel,
    OptionFlag::Cumulativity,
    OptionFlag::Rewriting,
    OptionFlag::Cubical,
    OptionFlag::Guarded,
    OptionFlag::FlatSplit,
];

impl OptionFlag {
    /// Every flag, in declaration order.
    pub const ALL: &'static [OptionFlag] = &[
        OptionFlag::Safe,
        OptionFlag::WithoutK,
        OptionFlag::CubicalCompatible,
        OptionFlag::NoUniversePolymorphism,
        OptionFlag::NoSizedTypes,
        OptionFlag::NoGuardedness,
        OptionFlag::Prop,
        OptionFlag::TwoLevel,
        OptionFlag::Cumulativity,
        OptionFlag::Rewriting,
        OptionFlag::Cubical,
        OptionFlag::Guarded,
        OptionFlag::FlatSplit,
        OptionFlag::AllowUnsolvedMetas,
    ];

    /// The command-line spelling of the flag, without the leading dashes.
    pub fn name(self) -> &'static str {
        match self {
            OptionFlag::Safe => "safe",
            OptionFlag::WithoutK => "without-K",
            OptionFlag::CubicalCompatible => "cubical-compatible",
            OptionFlag::NoUniversePolymorphism => "no-universe-polymorphism",
            OptionFlag::NoSizedTypes => "no-sized-types",
            OptionFlag::NoGuardedness => "no-guardedness",
            OptionFlag::Prop => "prop",
            OptionFlag::TwoLevel => "two-level",
            OptionFlag::Cumulativity => "cumulativity",
            OptionFlag::Rewriting => "rewriting",
            OptionFlag::Cubical => "cubical",
            OptionFlag::Guarded => "guarded",
            OptionFlag::FlatSplit => "flat-split",
            OptionFlag::AllowUnsolvedMetas => "allow-unsolved-metas",
        }
    }

    /// Looks a flag up by its command-line spelling (with or without `--`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim_start_matches("--");
        Self::ALL.iter().copied().find(|flag| flag.name() == name)
    }

    /// Returns `true` if this flag is in [`COINFECTIVE`].
    pub fn is_coinfective(self) -> bool {
        COINFECTIVE.contains(&self)
    }

    /// Returns `true` if this flag is in [`INFECTIVE`].
    pub fn is_infective(self) -> bool {
        INFECTIVE.contains(&self)
    }
}

impl fmt::Display for OptionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.name())
    }
}

impl PragmaOptions {
    /// Returns the value of a single flag.
    pub fn get(&self, flag: OptionFlag) -> bool {
        match flag {
            OptionFlag::Safe => self.safe,
            OptionFlag::WithoutK => self.without_k,
            OptionFlag::CubicalCompatible => self.cubical_compatible,
            OptionFlag::NoUniversePolymorphism => self.no_universe_polymorphism,
            OptionFlag::NoSizedTypes => self.no_sized_types,
            OptionFlag::NoGuardedness => self.no_guardedness,
            OptionFlag::Prop => self.prop,
            OptionFlag::TwoLevel => self.two_level,
            OptionFlag::Cumulativity => self.cumulativity,
            OptionFlag::Rewriting => self.rewriting,
            OptionFlag::Cubical => self.cubical,
            OptionFlag::Guarded => self.guarded,
            OptionFlag::FlatSplit => self.flat_split,
            OptionFlag::AllowUnsolvedMetas => self.allow_unsolved_metas,
        }
    }

    /// Sets the value of a single flag.
    pub fn set(&mut self, flag: OptionFlag, value: bool) {
        let slot = match flag {
            OptionFlag::Safe => &mut self.safe,
            OptionFlag::WithoutK => &mut self.without_k,
            OptionFlag::CubicalCompatible => &mut self.cubical_compatible,
            OptionFlag::NoUniversePolymorphism => &mut self.no_universe_polymorphism,
            OptionFlag::NoSizedTypes => &mut self.no_sized_types,
            OptionFlag::NoGuardedness => &mut self.no_guardedness,
            OptionFlag::Prop => &mut self.prop,
            OptionFlag::TwoLevel => &mut self.two_level,
            OptionFlag::Cumulativity => &mut self.cumulativity,
            OptionFlag::Rewriting => &mut self.rewriting,
            OptionFlag::Cubical => &mut self.cubical,
            OptionFlag::Guarded => &mut self.guarded,
            OptionFlag::FlatSplit => &mut self.flat_split,
            OptionFlag::AllowUnsolvedMetas => &mut self.allow_unsolved_metas,
        };
        *slot = value;
    }

    /// Returns a copy with `flag` enabled.
    pub fn with(mut self, flag: OptionFlag) -> Self {
        self.set(flag, true);
        self
    }

    /// Hash of the flag vector.
    ///
    /// Interfaces record the fingerprint of the session's base options; a
    /// different fingerprint in a later session forces a recheck.
    pub fn fingerprint(&self) -> ContentHash {
        let bits: Vec<u8> = OptionFlag::ALL
            .iter()
            .map(|flag| u8::from(self.get(*flag)))
            .collect();
        ContentHash::from_bytes(&bits)
    }
}
