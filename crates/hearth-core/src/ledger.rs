//! The ledger's state store as seen by actions: opaque bytes keyed by signer.

use crate::id::Address;
use crate::serialize::DeserializeError;
use crate::state::RootState;
use std::collections::BTreeMap;

/// An immutable snapshot of every player's encoded state.
///
/// Actions never write into the snapshot they were given; they return a new
/// one with their signer's entry replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    states: BTreeMap<Address, Vec<u8>>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_state(&self, address: Address) -> Option<&[u8]> {
        self.states.get(&address).map(Vec::as_slice)
    }

    /// A copy of this snapshot with `address` set to `bytes`.
    #[must_use = "the original snapshot is unchanged"]
    pub fn with_state(mut self, address: Address, bytes: Vec<u8>) -> Self {
        self.states.insert(address, bytes);
        self
    }

    /// Decode the player state for `address`. A signer with no entry yet
    /// owns an empty aggregate.
    pub fn root_state(&self, address: Address) -> Result<RootState, DeserializeError> {
        match self.get_state(address) {
            Some(bytes) => RootState::from_bytes(bytes),
            None => Ok(RootState::default()),
        }
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.states.keys()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
