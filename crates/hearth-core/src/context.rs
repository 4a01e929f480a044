use crate::catalog::Catalog;
use crate::id::{Address, BlockIndex};
use crate::rng::ActionRng;

/// Everything the ledger supplies to an action besides the previous state.
#[derive(Debug)]
pub struct ActionContext<'a> {
    pub signer: Address,
    pub block_index: BlockIndex,
    /// Dry run. Actions behave identically; the caller discards the result.
    pub rehearsal: bool,
    pub random: ActionRng,
    pub catalog: &'a Catalog,
}

impl<'a> ActionContext<'a> {
    pub fn new(catalog: &'a Catalog, signer: Address, block_index: BlockIndex) -> Self {
        Self {
            signer,
            block_index,
            rehearsal: false,
            random: ActionRng::new(0),
            catalog,
        }
    }

    pub fn rehearsal(mut self, rehearsal: bool) -> Self {
        self.rehearsal = rehearsal;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random = ActionRng::new(seed);
        self
    }
}
