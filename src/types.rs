multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal — one entry of the fixed ballot
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    /// Opaque identifier (at most 32 bytes), never interpreted.
    pub name: ManagedBuffer<M>,
    pub vote_count: BigUint<M>,
}

impl<M: ManagedTypeApi> Proposal<M> {
    pub fn new(name: ManagedBuffer<M>) -> Self {
        Proposal {
            name,
            vote_count: BigUint::zero(),
        }
    }
}

// ============================================================
// Voter — per-identity voting rights record
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Voter<M: ManagedTypeApi> {
    /// 0 means no right to vote. Grows with inbound delegation until the
    /// record votes.
    pub weight: BigUint<M>,
    /// One-way flag, set by either a direct vote or a delegation.
    pub voted: bool,
    /// Final chain end this voter delegated to.
    pub delegate: Option<ManagedAddress<M>>,
    /// Index of the proposal voted for directly.
    pub vote: Option<usize>,
}

impl<M: ManagedTypeApi> Voter<M> {
    /// Record of an identity that was never touched.
    pub fn unregistered() -> Self {
        Voter {
            weight: BigUint::zero(),
            voted: false,
            delegate: None,
            vote: None,
        }
    }

    pub fn has_right(&self) -> bool {
        self.weight > 0u64
    }
}
