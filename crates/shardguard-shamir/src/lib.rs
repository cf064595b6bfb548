//! `(T, N)` threshold secret sharing over a 521-bit prime field.
//!
//! This crate implements the key-escrow half of the fragment-storage design:
//! a symmetric key is split into `N` shares of which any `T` reconstruct it
//! exactly, while any `T − 1` reveal nothing at all. Shamir's scheme over
//! `ℤ/Pℤ` with `P = 2⁵²¹ − 1`: the secret becomes the constant term of a
//! random polynomial of degree `T − 1`, shares are evaluations at
//! `x = 1 … N`, and reconstruction is Lagrange interpolation at zero.
//!
//! # Overview
//!
//! - Polynomial coefficients come from a CSPRNG and exist only inside the
//!   split call; they are cleared before it returns.
//! - Reconstructed secrets are handed back in a [`RecoveredSecret`] wrapper
//!   that zeroizes on drop and redacts its `Debug` output.
//! - [`Share`] values serialize with serde (hex-encoded field element), the
//!   format the surrounding system persists shares in. File layout stays a
//!   caller concern.
//!
//! # Example
//!
//! ```rust
//! use shardguard_shamir::ThresholdSecretSplitter;
//!
//! let splitter = ThresholdSecretSplitter::new(3, 5).unwrap();
//! let shares = splitter.split(b"an AES key, usually").unwrap();
//!
//! // Any three shares recover the key.
//! let recovered = splitter.reconstruct(&shares[1..4]).unwrap();
//! assert_eq!(recovered.as_bytes(), b"an AES key, usually");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod field;
pub mod shamir;

pub use shamir::{RecoveredSecret, ShamirError, Share, ThresholdSecretSplitter};
