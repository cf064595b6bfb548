//! Arithmetic in `ℤ/Pℤ` for the share polynomial.
//!
//! The modulus is pinned: shares written by one build must reconstruct under
//! every later build, so changing the prime is a breaking change to every
//! stored share set.

use std::sync::LazyLock;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Signed, Zero};
use rand::{CryptoRng, RngCore};

/// The field modulus: `2⁵²¹ − 1`, the 13th Mersenne prime.
///
/// Large enough to embed any 512-bit secret, and prime, so every nonzero
/// element is invertible and Lagrange interpolation is always defined.
pub static FIELD_PRIME: LazyLock<BigUint> =
    LazyLock::new(|| (BigUint::one() << 521u32) - BigUint::one());

/// `(a + b) mod p`.
#[must_use]
pub fn add_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a + b) % p
}

/// `(a − b) mod p`, wrapping through the modulus when `b > a`.
#[must_use]
pub fn sub_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    let a = a % p;
    let b = b % p;
    if a >= b {
        a - b
    } else {
        p - b + a
    }
}

/// `(a · b) mod p`.
#[must_use]
pub fn mul_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Modular inverse by the extended Euclidean algorithm.
///
/// Returns `None` when `a` and `modulus` are not coprime (for a prime
/// modulus, exactly when `a ≡ 0`).
#[must_use]
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if modulus.is_zero() {
        return None;
    }

    // Signed arithmetic keeps the Bézout coefficient bookkeeping readable;
    // the result is reduced back into [0, modulus) at the end.
    let modulus_signed = BigInt::from(modulus.clone());
    let mut r_prev = modulus_signed.clone();
    let mut r = BigInt::from(a % modulus);
    let mut t_prev = BigInt::zero();
    let mut t = BigInt::one();

    while !r.is_zero() {
        let quotient = &r_prev / &r;
        let r_next = &r_prev - &quotient * &r;
        r_prev = std::mem::replace(&mut r, r_next);
        let t_next = &t_prev - &quotient * &t;
        t_prev = std::mem::replace(&mut t, t_next);
    }

    if !r_prev.is_one() {
        return None;
    }

    let mut result = t_prev % &modulus_signed;
    if result.is_negative() {
        result += &modulus_signed;
    }
    result.to_biguint()
}

/// Draw a uniform field element in `[0, p)`.
///
/// Rejection sampling over `bits(p)`-bit draws: candidates at or above the
/// modulus are discarded, which keeps the distribution exactly uniform.
pub fn random_element<R: RngCore + CryptoRng>(rng: &mut R, p: &BigUint) -> BigUint {
    let bits = p.bits();
    loop {
        let candidate = rng.gen_biguint(bits);
        if &candidate < p {
            return candidate;
        }
    }
}
