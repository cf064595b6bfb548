//! Codec parameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Bytes of big-endian length header prepended to every payload.
pub(crate) const LENGTH_HEADER: usize = 4;

/// Fragment codec parameters.
///
/// Controls how many data and parity fragments each payload is cut into.
/// The field size caps the total at 256 fragments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecParams {
    /// Number of data fragments (`k`). Any `k` surviving fragments
    /// reconstruct the payload.
    ///
    /// Default: 4
    pub data_fragments: usize,

    /// Number of parity fragments (`m`). Up to `m` fragments may be lost.
    ///
    /// Default: 2
    pub parity_fragments: usize,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            data_fragments: 4,
            parity_fragments: 2,
        }
    }
}

impl CodecParams {
    /// Check the parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFragmentCounts` unless
    /// `data_fragments ≥ 1`, `parity_fragments ≥ 1`, and the total is at
    /// most 256.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_fragments == 0
            || self.parity_fragments == 0
            || self.data_fragments + self.parity_fragments > 256
        {
            return Err(ConfigError::InvalidFragmentCounts {
                data: self.data_fragments,
                parity: self.parity_fragments,
            });
        }
        Ok(())
    }

    /// Total fragments produced per payload (`k + m`).
    #[must_use]
    pub const fn total_fragments(&self) -> usize {
        self.data_fragments + self.parity_fragments
    }

    /// Fragments that may be lost while staying decodable.
    #[must_use]
    pub const fn max_erasures(&self) -> usize {
        self.parity_fragments
    }

    /// Length of every fragment for a payload of `payload_len` bytes.
    ///
    /// The header travels inside the data fragments, so the payload grows by
    /// four bytes before it is cut into `k` blocks.
    #[must_use]
    pub const fn fragment_len(&self, payload_len: usize) -> usize {
        (payload_len + LENGTH_HEADER).div_ceil(self.data_fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = CodecParams::default();
        assert_eq!(params.data_fragments, 4);
        assert_eq!(params.parity_fragments, 2);
        assert_eq!(params.total_fragments(), 6);
        assert_eq!(params.max_erasures(), 2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_counts() {
        let params = CodecParams {
            data_fragments: 0,
            parity_fragments: 2,
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidFragmentCounts { data: 0, parity: 2 })
        ));

        let params = CodecParams {
            data_fragments: 3,
            parity_fragments: 0,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_enforces_field_size() {
        let params = CodecParams {
            data_fragments: 250,
            parity_fragments: 6,
        };
        assert!(params.validate().is_ok());

        let params = CodecParams {
            data_fragments: 250,
            parity_fragments: 7,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn fragment_len_rounds_up() {
        let params = CodecParams {
            data_fragments: 3,
            parity_fragments: 2,
        };
        // 59-byte payload + 4-byte header = 63 bytes over 3 fragments.
        assert_eq!(params.fragment_len(59), 21);
        // Empty payload still carries the header.
        assert_eq!(params.fragment_len(0), 2);
        assert_eq!(params.fragment_len(1), 2);
        assert_eq!(params.fragment_len(2), 2);
        assert_eq!(params.fragment_len(3), 3);
    }

    #[test]
    fn params_serialization_roundtrip() {
        let params = CodecParams {
            data_fragments: 5,
            parity_fragments: 3,
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: CodecParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
