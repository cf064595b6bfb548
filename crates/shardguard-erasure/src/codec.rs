//! Fragment codec: encode a payload into `k + m` fragments, decode from any
//! `k` of them.

// Allow truncation casts - payload lengths are bounded by the 4-byte header
#![allow(clippy::cast_possible_truncation)]

use crate::config::{CodecParams, LENGTH_HEADER};
use crate::error::{ConfigError, DecodeError};
use crate::gf256::gf_mul;
use crate::matrix::{invert, EncodeMatrix};

/// Systematic `(k, m)` erasure coder over GF(2⁸).
///
/// Immutable after construction; one instance can serve any number of
/// concurrent encode/decode calls.
pub struct FragmentCodec {
    data_fragments: usize,
    parity_fragments: usize,
    matrix: EncodeMatrix,
}

impl FragmentCodec {
    /// Create a codec with `data_fragments` data and `parity_fragments`
    /// parity fragments.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFragmentCounts` unless both counts are
    /// at least 1 and their sum is at most 256 (the field size).
    pub fn new(data_fragments: usize, parity_fragments: usize) -> Result<Self, ConfigError> {
        Self::from_params(&CodecParams {
            data_fragments,
            parity_fragments,
        })
    }

    /// Create a codec from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFragmentCounts` if `params` fail
    /// validation.
    pub fn from_params(params: &CodecParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let matrix = EncodeMatrix::new(params.data_fragments, params.parity_fragments);
        tracing::debug!(
            data = params.data_fragments,
            parity = params.parity_fragments,
            "Built fragment codec"
        );
        Ok(Self {
            data_fragments: params.data_fragments,
            parity_fragments: params.parity_fragments,
            matrix,
        })
    }

    /// Number of data fragments (`k`).
    #[must_use]
    pub const fn data_fragments(&self) -> usize {
        self.data_fragments
    }

    /// Number of parity fragments (`m`).
    #[must_use]
    pub const fn parity_fragments(&self) -> usize {
        self.parity_fragments
    }

    /// Total fragments produced per payload (`k + m`).
    #[must_use]
    pub const fn total_fragments(&self) -> usize {
        self.data_fragments + self.parity_fragments
    }

    /// Length of every fragment for a payload of `payload_len` bytes.
    #[must_use]
    pub const fn fragment_len(&self, payload_len: usize) -> usize {
        (payload_len + LENGTH_HEADER).div_ceil(self.data_fragments)
    }

    /// Encode a payload into `k + m` equal-length fragments.
    ///
    /// The payload is prefixed with its big-endian length, zero-padded to a
    /// multiple of the fragment length, and cut into contiguous blocks; the
    /// blocks become the data fragments and each parity fragment is a
    /// GF(2⁸) linear combination of them. Payloads of any length round-trip,
    /// including empty ones.
    ///
    /// # Panics
    /// Panics if the payload length does not fit the 4-byte header.
    #[must_use]
    pub fn encode(&self, payload: &[u8]) -> Vec<Vec<u8>> {
        assert!(
            u32::try_from(payload.len()).is_ok(),
            "payload length must fit the 4-byte header"
        );
        let k = self.data_fragments;
        let fragment_len = self.fragment_len(payload.len());

        let mut padded = Vec::with_capacity(k * fragment_len);
        padded.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        padded.extend_from_slice(payload);
        padded.resize(k * fragment_len, 0);

        let mut fragments: Vec<Vec<u8>> = Vec::with_capacity(self.total_fragments());
        fragments.extend(padded.chunks(fragment_len).map(<[u8]>::to_vec));

        for p in 0..self.parity_fragments {
            let row = self.matrix.row(k + p);
            let mut parity = vec![0u8; fragment_len];
            for (coeff, block) in row.iter().zip(&fragments[..k]) {
                for (out, &byte) in parity.iter_mut().zip(block.iter()) {
                    *out ^= gf_mul(*coeff, byte);
                }
            }
            fragments.push(parity);
        }

        fragments
    }

    /// Decode a fragment set back into the original payload.
    ///
    /// The set must have exactly `k + m` slots, in the positions the
    /// fragments were produced at; `None` marks an erased slot. Any `k`
    /// surviving fragments suffice. The set is never mutated — repaired
    /// fragments live in engine-local buffers.
    ///
    /// # Errors
    ///
    /// - `WrongFragmentCount` if the slice length is not `k + m`.
    /// - `InsufficientFragments` if fewer than `k` slots are present.
    /// - `LengthMismatch` if present fragments disagree on their length.
    /// - `MatrixSingular` if elimination finds no pivot (unreachable for
    ///   sets with intact positional identity).
    /// - `CorruptLength` if the recovered length header is out of range.
    pub fn decode(&self, fragments: &[Option<Vec<u8>>]) -> Result<Vec<u8>, DecodeError> {
        let k = self.data_fragments;
        if fragments.len() != self.total_fragments() {
            return Err(DecodeError::WrongFragmentCount {
                expected: self.total_fragments(),
                actual: fragments.len(),
            });
        }

        let present: Vec<(usize, &[u8])> = fragments
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref().map(|frag| (index, frag)))
            .collect();
        if present.len() < k {
            return Err(DecodeError::InsufficientFragments {
                available: present.len(),
                needed: k,
            });
        }

        let fragment_len = present[0].1.len();
        if let Some(&(_, bad)) = present.iter().find(|(_, frag)| frag.len() != fragment_len) {
            return Err(DecodeError::LengthMismatch {
                expected: fragment_len,
                actual: bad.len(),
            });
        }

        // Fast path: every data fragment survived, the payload is sitting in
        // the first k slots already.
        if fragments[..k].iter().all(Option::is_some) {
            let mut padded = Vec::with_capacity(k * fragment_len);
            for frag in fragments[..k].iter().filter_map(|slot| slot.as_deref()) {
                padded.extend_from_slice(frag);
            }
            return unpack(&padded);
        }

        // Deterministic selection: the first k present slots in ascending
        // order. Any k would do; this one makes reruns reproducible.
        let selected = &present[..k];
        let rows: Vec<usize> = selected.iter().map(|&(index, _)| index).collect();
        tracing::debug!(
            available = present.len(),
            rows = ?rows,
            "Repairing erased data fragments"
        );

        let submatrix: Vec<Vec<u8>> = rows.iter().map(|&r| self.matrix.row(r).to_vec()).collect();
        let inverse = invert(&submatrix).ok_or(DecodeError::MatrixSingular)?;

        let mut padded = Vec::with_capacity(k * fragment_len);
        for slot in 0..k {
            if let Some(frag) = fragments[slot].as_deref() {
                padded.extend_from_slice(frag);
                continue;
            }
            let start = padded.len();
            padded.resize(start + fragment_len, 0);
            for (&coeff, &(_, frag)) in inverse[slot].iter().zip(selected.iter()) {
                if coeff == 0 {
                    continue;
                }
                for (offset, &byte) in frag.iter().enumerate() {
                    padded[start + offset] ^= gf_mul(coeff, byte);
                }
            }
        }

        unpack(&padded)
    }
}

/// Strip the length header from the reassembled data blocks.
fn unpack(padded: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let Some(max_len) = padded.len().checked_sub(LENGTH_HEADER) else {
        return Err(DecodeError::CorruptLength {
            length: 0,
            max: padded.len(),
        });
    };

    let mut header = [0u8; LENGTH_HEADER];
    header.copy_from_slice(&padded[..LENGTH_HEADER]);
    let length = u32::from_be_bytes(header) as usize;

    if length > max_len {
        return Err(DecodeError::CorruptLength {
            length,
            max: max_len,
        });
    }

    Ok(padded[LENGTH_HEADER..LENGTH_HEADER + length].to_vec())
}
