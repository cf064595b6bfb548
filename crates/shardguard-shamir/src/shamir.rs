//! Shamir's secret sharing over the pinned prime field.
//!
//! A secret of at most 65 bytes (anything below `2⁵²¹ − 1` as a big-endian
//! integer) becomes the constant term of a polynomial with uniformly random
//! higher coefficients. Shares are the polynomial's values at `x = 1 … N`;
//! any `T` of them pin the polynomial down and Lagrange interpolation at
//! zero recovers the constant term. `T − 1` shares are consistent with every
//! possible secret, which is the whole point.

// Allow truncation casts - share counts are far below the index width
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashSet;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::field::{add_mod, mod_inverse, mul_mod, random_element, sub_mod, FIELD_PRIME};

/// Errors that can occur while splitting or reconstructing a secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShamirError {
    /// Threshold must be at least 2; a threshold of 1 makes every share the
    /// secret itself.
    #[error("threshold must be at least 2")]
    ThresholdTooSmall,

    /// Threshold cannot exceed the number of shares produced.
    #[error("threshold ({threshold}) cannot exceed total shares ({total})")]
    ThresholdExceedsTotal {
        /// The requested threshold.
        threshold: usize,
        /// The total number of shares.
        total: usize,
    },

    /// Secret does not fit below the field modulus.
    #[error("secret too large for the field: {bits} bits, field holds {max_bits}")]
    SecretTooLarge {
        /// Bit length of the secret as an unsigned integer.
        bits: u64,
        /// Bit length of the field modulus.
        max_bits: u64,
    },

    /// Too few shares to reconstruct.
    #[error("insufficient shares: have {available}, need {needed}")]
    InsufficientShares {
        /// Shares provided.
        available: usize,
        /// Threshold required.
        needed: usize,
    },

    /// Share index 0 is reserved: the polynomial at zero *is* the secret.
    #[error("share index 0 is reserved")]
    ReservedIndex,

    /// Two shares carry the same index.
    #[error("duplicate share index: {0}")]
    DuplicateShareIndex(u32),

    /// Padded reconstruction asked for fewer bytes than the secret holds.
    #[error("reconstructed secret is {actual} bytes, expected at most {expected}")]
    SecretLongerThanExpected {
        /// Minimal byte length of the reconstructed secret.
        actual: usize,
        /// Byte length the caller asked for.
        expected: usize,
    },
}

/// A single share: one point `(x, y)` on the hidden polynomial.
///
/// Serializes with the field element as a lowercase hex string, the form the
/// surrounding system persists shares in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// The x-coordinate, 1-based.
    index: u32,

    /// The y-coordinate, an element of the prime field.
    #[serde(with = "hex_field_element")]
    value: BigUint,
}

impl Share {
    /// Create a share from its coordinates.
    ///
    /// # Panics
    /// Panics if `index` is 0 (reserved for the secret itself).
    #[must_use]
    pub fn new(index: u32, value: BigUint) -> Self {
        assert!(index != 0, "share index 0 is reserved");
        Self { index, value }
    }

    /// The share's x-coordinate.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The share's y-coordinate.
    #[must_use]
    pub const fn value(&self) -> &BigUint {
        &self.value
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep share values out of logs; T of them are a secret.
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("value_bits", &self.value.bits())
            .field("value", &"[redacted]")
            .finish()
    }
}

/// Serde helper: field element as a lowercase hex string.
mod hex_field_element {
    use num_bigint::BigUint;
    use num_traits::Num;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(16))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let digits = String::deserialize(deserializer)?;
        BigUint::from_str_radix(&digits, 16).map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polynomial Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluate the polynomial at `x` with Horner's method.
///
/// Coefficients are `[a₀, a₁, …]` for `a₀ + a₁·x + …`, all arithmetic
/// mod `p`.
fn poly_eval(coefficients: &[BigUint], x: &BigUint, p: &BigUint) -> BigUint {
    let mut acc = BigUint::zero();
    for coefficient in coefficients.iter().rev() {
        acc = (acc * x + coefficient) % p;
    }
    acc
}

/// Build a polynomial with the secret as constant term and `degree` random
/// higher coefficients.
fn random_polynomial<R: RngCore + CryptoRng>(
    rng: &mut R,
    secret: BigUint,
    degree: usize,
) -> Vec<BigUint> {
    let mut coefficients = Vec::with_capacity(degree + 1);
    coefficients.push(secret);
    for _ in 0..degree {
        coefficients.push(random_element(rng, &FIELD_PRIME));
    }
    coefficients
}

/// Lagrange interpolation at `x = 0`.
///
/// `f(0) = Σ yᵢ · Πⱼ≠ᵢ (0 − xⱼ)(xᵢ − xⱼ)⁻¹ mod p`. Callers have already
/// rejected duplicate indices, so the basis denominators are nonzero.
fn lagrange_interpolate_at_zero(shares: &[Share], p: &BigUint) -> BigUint {
    let zero = BigUint::zero();
    let mut acc = BigUint::zero();

    for (i, share_i) in shares.iter().enumerate() {
        let x_i = BigUint::from(share_i.index);
        let mut numerator = BigUint::from(1u32);
        let mut denominator = BigUint::from(1u32);

        for (j, share_j) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let x_j = BigUint::from(share_j.index);
            numerator = mul_mod(&numerator, &sub_mod(&zero, &x_j, p), p);
            denominator = mul_mod(&denominator, &sub_mod(&x_i, &x_j, p), p);
        }

        let denominator_inv =
            mod_inverse(&denominator, p).expect("shares should have unique indices");
        let basis = mul_mod(&numerator, &denominator_inv, p);
        acc = add_mod(&acc, &mul_mod(&share_i.value, &basis, p), p);
    }

    acc
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// `(T, N)` threshold splitter over the pinned 521-bit prime field.
///
/// Immutable after construction; one instance can serve any number of
/// concurrent split/reconstruct calls.
#[derive(Debug, Clone)]
pub struct ThresholdSecretSplitter {
    threshold: usize,
    total_shares: usize,
}

impl ThresholdSecretSplitter {
    /// Create a splitter producing `total_shares` shares with reconstruction
    /// threshold `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `ThresholdTooSmall` for thresholds below 2 and
    /// `ThresholdExceedsTotal` when `threshold > total_shares`.
    pub fn new(threshold: usize, total_shares: usize) -> Result<Self, ShamirError> {
        if threshold < 2 {
            return Err(ShamirError::ThresholdTooSmall);
        }
        if threshold > total_shares {
            return Err(ShamirError::ThresholdExceedsTotal {
                threshold,
                total: total_shares,
            });
        }
        Ok(Self {
            threshold,
            total_shares,
        })
    }

    /// Reconstruction threshold (`T`).
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Total shares produced per split (`N`).
    #[must_use]
    pub const fn total_shares(&self) -> usize {
        self.total_shares
    }

    /// Split a secret into `N` shares using the thread-local CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `SecretTooLarge` if the secret, read as a big-endian unsigned
    /// integer, is not below the field modulus.
    pub fn split(&self, secret: &[u8]) -> Result<Vec<Share>, ShamirError> {
        self.split_with_rng(&mut rand::thread_rng(), secret)
    }

    /// Split a secret using a provided RNG (for testing/determinism).
    ///
    /// The polynomial's random coefficients are drawn from `rng` and cleared
    /// before this returns; they are never logged or persisted.
    ///
    /// # Errors
    ///
    /// Returns `SecretTooLarge` if the secret does not fit below the field
    /// modulus.
    pub fn split_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        secret: &[u8],
    ) -> Result<Vec<Share>, ShamirError> {
        let p = &*FIELD_PRIME;
        let secret_int = BigUint::from_bytes_be(secret);
        if secret_int >= *p {
            return Err(ShamirError::SecretTooLarge {
                bits: secret_int.bits(),
                max_bits: p.bits(),
            });
        }

        let mut coefficients = random_polynomial(rng, secret_int, self.threshold - 1);

        let shares = (1..=self.total_shares)
            .map(|x| Share {
                index: x as u32,
                value: poly_eval(&coefficients, &BigUint::from(x), p),
            })
            .collect();

        // The random coefficients are as sensitive as the secret: T - 1 of
        // them plus one share reconstruct it.
        for coefficient in &mut coefficients {
            coefficient.set_zero();
        }

        tracing::debug!(
            threshold = self.threshold,
            total = self.total_shares,
            "Split secret into shares"
        );

        Ok(shares)
    }

    /// Reconstruct the secret from at least `T` shares.
    ///
    /// Uses the first `T` shares in slice order; any subset with distinct
    /// indices yields the same secret. The result is the minimal big-endian
    /// form — a secret that began with zero bytes comes back shorter (use
    /// [`Self::reconstruct_padded`] when the length is known).
    ///
    /// # Errors
    ///
    /// Returns `InsufficientShares`, `ReservedIndex`, or
    /// `DuplicateShareIndex` for defective share sets.
    pub fn reconstruct(&self, shares: &[Share]) -> Result<RecoveredSecret, ShamirError> {
        if shares.len() < self.threshold {
            return Err(ShamirError::InsufficientShares {
                available: shares.len(),
                needed: self.threshold,
            });
        }

        let mut seen = HashSet::new();
        for share in shares {
            if share.index == 0 {
                return Err(ShamirError::ReservedIndex);
            }
            if !seen.insert(share.index) {
                return Err(ShamirError::DuplicateShareIndex(share.index));
            }
        }

        let subset = &shares[..self.threshold];
        let secret_int = lagrange_interpolate_at_zero(subset, &FIELD_PRIME);

        tracing::debug!(
            shares_used = self.threshold,
            shares_offered = shares.len(),
            "Reconstructed secret"
        );

        Ok(RecoveredSecret(secret_int.to_bytes_be()))
    }

    /// Reconstruct and left-pad with zero bytes to `expected_len`.
    ///
    /// This is the exact inverse of splitting a fixed-length key: leading
    /// zero bytes that the minimal integer form drops are restored.
    ///
    /// # Errors
    ///
    /// Everything [`Self::reconstruct`] returns, plus
    /// `SecretLongerThanExpected` when the secret cannot fit in
    /// `expected_len` bytes.
    pub fn reconstruct_padded(
        &self,
        shares: &[Share],
        expected_len: usize,
    ) -> Result<RecoveredSecret, ShamirError> {
        let minimal = self.reconstruct(shares)?;
        if minimal.len() > expected_len {
            return Err(ShamirError::SecretLongerThanExpected {
                actual: minimal.len(),
                expected: expected_len,
            });
        }

        let mut padded = vec![0u8; expected_len - minimal.len()];
        padded.extend_from_slice(minimal.as_bytes());
        Ok(RecoveredSecret(padded))
    }
}

/// Wrapper for a reconstructed secret that zeroizes on drop.
#[derive(Zeroize, ZeroizeOnDrop, PartialEq)]
pub struct RecoveredSecret(Vec<u8>);

impl RecoveredSecret {
    /// Access the secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length of the secret.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for RecoveredSecret {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for RecoveredSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveredSecret")
            .field("len", &self.0.len())
            .field("data", &"[redacted]")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
