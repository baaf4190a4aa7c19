use std::{fmt, str::FromStr, sync::OnceLock};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    bitops::{byte_intersect_popcount, byte_popcount},
    error::StrategyError,
    numerics::aligned_block::AlignedBlock,
};

/// Which implementation computes popcounts over aligned fingerprints.
///
/// The kernel never decides this for itself: a caller either asks for the
/// best available path with [`PopcountStrategy::detect`] or forces one and
/// validates it with [`PopcountStrategy::checked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PopcountStrategy {
    /// Lookup-table popcount, available everywhere.
    Scalar,
    /// `pshufb` nibble-table popcount, x86_64 with SSSE3 only.
    Ssse3,
}

impl PopcountStrategy {
    /// Probes the running CPU and picks the fastest supported strategy.
    pub fn detect() -> Self {
        let strategy = if Self::Ssse3.is_supported() {
            Self::Ssse3
        } else {
            Self::Scalar
        };
        debug!(%strategy, "detected popcount strategy");
        strategy
    }

    /// Same as [`detect`](Self::detect), probed once per process.
    pub fn detect_cached() -> Self {
        static DETECTED: OnceLock<PopcountStrategy> = OnceLock::new();
        *DETECTED.get_or_init(Self::detect)
    }

    pub fn is_supported(self) -> bool {
        match self {
            Self::Scalar => true,
            Self::Ssse3 => ssse3_available(),
        }
    }

    /// Returns `self` if the running CPU can execute it.
    pub fn checked(self) -> Result<Self, StrategyError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(StrategyError::Unsupported {
                strategy: self.name(),
            })
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Ssse3 => "ssse3",
        }
    }

    /// Number of bits set in `fp`.
    ///
    /// An unsupported strategy falls back to the scalar path, so this is
    /// always safe to call.
    pub fn popcount(self, fp: &[AlignedBlock]) -> u64 {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::Ssse3 if ssse3_available() => {
                // SAFETY: SSSE3 support was just checked.
                unsafe { crate::numerics::ssse3::popcount(fp) }
            }
            Self::Ssse3 => {
                trace!("ssse3 unavailable, using scalar popcount");
                byte_popcount(AlignedBlock::as_bytes(fp))
            }
            Self::Scalar => byte_popcount(AlignedBlock::as_bytes(fp)),
        }
    }

    /// Number of bits set in `fp1 & fp2`.
    ///
    /// # Panics
    ///
    /// Panics if the two fingerprints have different lengths.
    pub fn intersect_popcount(self, fp1: &[AlignedBlock], fp2: &[AlignedBlock]) -> u64 {
        assert_eq!(fp1.len(), fp2.len());
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::Ssse3 if ssse3_available() => {
                // SAFETY: SSSE3 support was just checked.
                unsafe { crate::numerics::ssse3::intersect_popcount(fp1, fp2) }
            }
            Self::Ssse3 => {
                trace!("ssse3 unavailable, using scalar intersection popcount");
                byte_intersect_popcount(AlignedBlock::as_bytes(fp1), AlignedBlock::as_bytes(fp2))
            }
            Self::Scalar => {
                byte_intersect_popcount(AlignedBlock::as_bytes(fp1), AlignedBlock::as_bytes(fp2))
            }
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn ssse3_available() -> bool {
    is_x86_feature_detected!("ssse3")
}

#[cfg(not(target_arch = "x86_64"))]
fn ssse3_available() -> bool {
    false
}

impl fmt::Display for PopcountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses `scalar`, `ssse3` or `auto`; `auto` runs [`PopcountStrategy::detect`].
/// Parsing does not check CPU support, see [`PopcountStrategy::checked`].
impl FromStr for PopcountStrategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Self::Scalar),
            "ssse3" => Ok(Self::Ssse3),
            "auto" => Ok(Self::detect_cached()),
            _ => Err(StrategyError::Unknown(s.to_string())),
        }
    }
}
