use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;
use crate::reference::StateRef;

/// The root marker category every state type implements.
///
/// It carries no discriminating information, so the registry never emits it
/// and a query targeting it means "all persisted types".
pub const ROOT_CATEGORY: &str = "VaultState";

/// Consumption status of a state, or a filter over it.
///
/// `All` is only meaningful as a filter ("no status constraint"); a stored
/// record is always `Unconsumed` or `Consumed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateStatus {
    Unconsumed,
    Consumed,
    All,
}

impl fmt::Display for StateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StateStatus::Unconsumed => "unconsumed",
            StateStatus::Consumed => "consumed",
            StateStatus::All => "all",
        };
        write!(f, "{s}")
    }
}

/// Identity of the notary responsible for a state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notary {
    /// Human-readable notary name.
    pub name: String,
    /// The notary's public key hash.
    pub key: [u8; 32],
}

impl Notary {
    pub fn new(name: impl Into<String>, key: [u8; 32]) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }
}

/// Opaque serialized state payload.
///
/// The vault never interprets payload bytes; callers that know the concrete
/// type can decode through [`SerializedState::decode`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedState(Vec<u8>);

impl SerializedState {
    /// Wrap already-serialized bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Serialize a typed state into an opaque payload.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, TypeError> {
        let bytes =
            bincode::serialize(value).map_err(|e| TypeError::Serialization(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Decode the payload into a typed state.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, TypeError> {
        bincode::deserialize(&self.0).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SerializedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerializedState({} bytes)", self.0.len())
    }
}

/// One persisted ledger state with its vault metadata.
///
/// Records are owned by the storage collaborator; the query layer only reads
/// them. Invariant: `consumed_at` is set iff `status == Consumed`. A present
/// `lock_id` pins the record to an in-flight soft-lock reservation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Unique reference: producing transaction + output index.
    pub state_ref: StateRef,
    /// Opaque serialized state payload.
    pub payload: SerializedState,
    /// Concrete state type name, used for polymorphic dispatch.
    pub contract_type: String,
    /// When the state was recorded into the vault.
    pub recorded_at: DateTime<Utc>,
    /// When the state was consumed, if it has been.
    pub consumed_at: Option<DateTime<Utc>>,
    /// Consumption status. Never `All` in a stored record.
    pub status: StateStatus,
    /// Notary responsible for the state.
    pub notary: Notary,
    /// Soft-lock owner, if the state is reserved by an in-flight operation.
    pub lock_id: Option<Uuid>,
    /// When the soft lock was last updated.
    pub lock_updated_at: Option<DateTime<Utc>>,
}

impl StateRecord {
    /// Create a fresh unconsumed record.
    pub fn new_unconsumed(
        state_ref: StateRef,
        payload: SerializedState,
        contract_type: impl Into<String>,
        recorded_at: DateTime<Utc>,
        notary: Notary,
    ) -> Self {
        Self {
            state_ref,
            payload,
            contract_type: contract_type.into(),
            recorded_at,
            consumed_at: None,
            status: StateStatus::Unconsumed,
            notary,
            lock_id: None,
            lock_updated_at: None,
        }
    }

    /// Transition the record to consumed, maintaining the timestamp invariant.
    pub fn consume(&mut self, at: DateTime<Utc>) {
        self.status = StateStatus::Consumed;
        self.consumed_at = Some(at);
    }

    /// Apply or clear a soft lock.
    pub fn set_lock(&mut self, lock_id: Option<Uuid>, at: DateTime<Utc>) {
        self.lock_id = lock_id;
        self.lock_updated_at = Some(at);
    }

    /// Returns `true` if the record satisfies the given status filter.
    pub fn matches_status(&self, status: StateStatus) -> bool {
        status == StateStatus::All || self.status == status
    }

    /// Check the consumed-timestamp invariant.
    pub fn check_invariant(&self) -> Result<(), TypeError> {
        match (self.status, self.consumed_at.is_some()) {
            (StateStatus::Consumed, true) | (StateStatus::Unconsumed, false) => Ok(()),
            _ => Err(TypeError::ConsumedTimestampMismatch),
        }
    }
}
