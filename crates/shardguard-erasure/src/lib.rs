//! Systematic `(k, m)` erasure coding over GF(2⁸) for fragment storage.
//!
//! This crate implements the fragment engine used to protect opaque blobs
//! (typically ciphertext) against partial loss of their storage substrate:
//! a blob is split into `k + m` equal-length fragments of which any `k`
//! suffice to reconstruct it exactly.
//!
//! # Overview
//!
//! - The first `k` fragments are the blob itself (length-prefixed, padded,
//!   cut into contiguous blocks); the next `m` are parity.
//! - Parity rows come from a Cauchy block, so **any** `k` fragments — data,
//!   parity, or any mix — reconstruct the original. Losing up to `m`
//!   fragments is survivable; losing `m + 1` is not.
//! - Fragments carry no header. Positional identity in `[0, k + m)` is the
//!   only metadata, and the caller must preserve it.
//! - Engines are immutable after construction and safe to share across
//!   threads; the only shared state is compile-time field tables and the
//!   encode matrix.
//!
//! # Example
//!
//! ```rust
//! use shardguard_erasure::FragmentCodec;
//!
//! let codec = FragmentCodec::new(3, 2).unwrap();
//! let fragments = codec.encode(b"patient record ciphertext");
//!
//! // Lose two fragments out of five.
//! let mut set: Vec<Option<Vec<u8>>> = fragments.into_iter().map(Some).collect();
//! set[0] = None;
//! set[4] = None;
//!
//! let recovered = codec.decode(&set).unwrap();
//! assert_eq!(recovered, b"patient record ciphertext");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod config;
mod error;
mod gf256;
mod golden;
mod matrix;

pub use codec::FragmentCodec;
pub use config::CodecParams;
pub use error::{ConfigError, DecodeError};
pub use gf256::{gf_div, gf_inv, gf_mul, gf_pow};
