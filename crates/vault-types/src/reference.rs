use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of the transaction that produced a state.
///
/// A `TxId` is a 32-byte hash. Identical transaction content always produces
/// the same `TxId`, so states are addressable by `(TxId, output index)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId([u8; 32]);

impl TxId {
    /// Compute a `TxId` by hashing raw transaction bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create a `TxId` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The null transaction id (all zeros). Represents "no transaction".
    pub const fn null() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null transaction id.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.short_hex())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for TxId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Unique reference to one persisted state: producing transaction + output index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRef {
    /// The transaction that produced the state.
    pub txid: TxId,
    /// Zero-based index of the state among the transaction's outputs.
    pub index: u32,
}

impl StateRef {
    /// Create a reference from a transaction id and output index.
    pub fn new(txid: TxId, index: u32) -> Self {
        Self { txid, index }
    }
}

impl fmt::Debug for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateRef({}:{})", self.txid.short_hex(), self.index)
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid.to_hex(), self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txid_from_bytes_is_deterministic() {
        let a = TxId::from_bytes(b"tx payload");
        let b = TxId::from_bytes(b"tx payload");
        let c = TxId::from_bytes(b"other payload");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn null_txid() {
        assert!(TxId::null().is_null());
        assert!(!TxId::from_bytes(b"x").is_null());
    }

    #[test]
    fn hex_roundtrip() {
        let id = TxId::from_bytes(b"roundtrip");
        let parsed = TxId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(
            TxId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(matches!(
            TxId::from_hex("abcd"),
            Err(TypeError::InvalidLength { expected: 32, .. })
        ));
    }

    #[test]
    fn state_ref_ordering_follows_txid_then_index() {
        let tx = TxId::from_bytes(b"tx");
        let a = StateRef::new(tx, 0);
        let b = StateRef::new(tx, 1);
        assert!(a < b);
    }

    #[test]
    fn display_format() {
        let r = StateRef::new(TxId::null(), 3);
        let s = format!("{r}");
        assert!(s.ends_with(":3"));
        assert_eq!(s.len(), 64 + 2);
    }

    #[test]
    fn serde_roundtrip() {
        let r = StateRef::new(TxId::from_bytes(b"serde"), 7);
        let json = serde_json::to_string(&r).unwrap();
        let parsed: StateRef = serde_json::from_str(&json).unwrap();
        assert_eq!(r, parsed);
    }
}
