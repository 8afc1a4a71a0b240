//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use blake2::Blake2b;
use digest::{consts::U32, Digest};
use serde::{Deserialize, Serialize};

use conclave_codec::CodecError;

type Blake2b256 = Blake2b<U32>;

const HASH_DOMAIN: &[u8] = b"conclave.transaction.v1";

/// A 32-byte transaction hash, displayed as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const fn from_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Domain-separated hash of a serialized signable payload.
    pub(crate) fn of_payload(payload: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(HASH_DOMAIN);
        hasher.update((payload.len() as u64).to_le_bytes());
        hasher.update(payload);
        Self(hasher.finalize().into())
    }
}

impl FromStr for TxHash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| CodecError::Decode(format!("invalid transaction hash: {e}")))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for TxHash {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.to_string()
    }
}

impl Display for TxHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_and_displays_hex() {
        let hash = TxHash::from_array([0xab; 32]);
        let s = hash.to_string();
        assert_eq!(s.len(), 64);
        assert_eq!(s.parse::<TxHash>().unwrap(), hash);
        "abcd".parse::<TxHash>().unwrap_err();
        "zz".repeat(32).parse::<TxHash>().unwrap_err();
    }

    #[test]
    fn it_hashes_deterministically_with_domain_separation() {
        let a = TxHash::of_payload(b"payload");
        let b = TxHash::of_payload(b"payload");
        let c = TxHash::of_payload(b"payloae");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
