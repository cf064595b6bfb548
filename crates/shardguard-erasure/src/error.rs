//! Fragment codec error types.

use thiserror::Error;

/// Errors raised while constructing a codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fragment counts outside the supported range.
    #[error(
        "invalid fragment counts: {data} data + {parity} parity \
         (need data ≥ 1, parity ≥ 1, total ≤ 256)"
    )]
    InvalidFragmentCounts {
        /// Requested number of data fragments.
        data: usize,
        /// Requested number of parity fragments.
        parity: usize,
    },
}

/// Errors raised while decoding a fragment set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The fragment set has the wrong number of slots.
    #[error("fragment set has {actual} slots, codec expects {expected}")]
    WrongFragmentCount {
        /// Slots the codec was configured for (`k + m`).
        expected: usize,
        /// Slots actually supplied.
        actual: usize,
    },

    /// Too few fragments survive to reconstruct the payload.
    #[error("insufficient fragments: have {available}, need {needed}")]
    InsufficientFragments {
        /// Fragments present in the set.
        available: usize,
        /// Minimum required (`k`).
        needed: usize,
    },

    /// Surviving fragments disagree on their length.
    #[error("fragment length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the first present fragment.
        expected: usize,
        /// Conflicting length encountered.
        actual: usize,
    },

    /// Gaussian elimination found no pivot.
    ///
    /// Unreachable for fragment sets with intact positional identity; seeing
    /// it means a fragment was filed under the wrong index or the codec has
    /// a bug.
    #[error("decode matrix is singular")]
    MatrixSingular,

    /// The recovered length header does not fit the reconstructed payload.
    #[error("corrupt length header: {length} exceeds maximum {max}")]
    CorruptLength {
        /// Length read from the header.
        length: usize,
        /// Largest length the fragment set could hold.
        max: usize,
    },
}
