#![no_std]

multiversx_sc::imports!();

pub mod errors;
pub mod types;

use errors::*;
use types::{Proposal, Voter};

// ============================================================
// Constants
// ============================================================

/// Proposal names are fixed-size identifiers (or hashes of off-chain content).
pub const PROPOSAL_NAME_MAX_LEN: usize = 32;

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait Ballot {
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// The deployer becomes the chairperson and receives the first vote.
    #[init]
    fn init(&self, proposal_names: MultiValueEncoded<ManagedBuffer>) {
        let chairperson = self.blockchain().get_caller();

        for name in proposal_names.into_iter() {
            require!(
                name.len() <= PROPOSAL_NAME_MAX_LEN,
                ERR_PROPOSAL_NAME_TOO_LONG
            );
            self.proposals().push(&Proposal::new(name));
        }

        self.chairperson().set(&chairperson);

        let mut record = Voter::unregistered();
        record.weight = BigUint::from(1u64);
        self.store_voter(&chairperson, &record);
        self.total_granted().set(1u64);

        self.ballot_created_event(&chairperson, self.proposals().len());
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: grantRight / grantRightBatch
    // Chairperson only. A batch is rejected as a whole if any
    // single entry is not eligible.
    // ========================================================

    #[endpoint(grantRight)]
    fn grant_right(&self, voter: ManagedAddress) {
        self.require_chairperson();
        self.grant_right_to(&voter);
    }

    #[endpoint(grantRightBatch)]
    fn grant_right_batch(&self, voters: MultiValueEncoded<ManagedAddress>) {
        self.require_chairperson();
        for voter in voters.into_iter() {
            self.grant_right_to(&voter);
        }
    }

    // ========================================================
    // ENDPOINT: delegate
    // Hands the caller's weight to the end of the target's
    // delegate chain.
    // ========================================================

    #[endpoint(delegate)]
    fn delegate(&self, to: ManagedAddress) {
        let caller = self.blockchain().get_caller();
        let mut sender = self.voter_or_default(&caller);
        require!(!sender.voted, ERR_ALREADY_VOTED);
        require!(to != caller, ERR_SELF_DELEGATION);

        let chain_end = self.resolve_delegate(&caller, to);

        sender.voted = true;
        sender.delegate = Some(chain_end.clone());
        self.store_voter(&caller, &sender);

        let mut end_record = self.voter_or_default(&chain_end);
        if let (true, Some(proposal_index)) = (end_record.voted, end_record.vote) {
            // Chain end already voted: its weight is frozen, so credit the
            // proposal it chose directly.
            self.credit_proposal(proposal_index, &sender.weight);
        } else {
            end_record.weight += &sender.weight;
            self.store_voter(&chain_end, &end_record);
        }

        self.delegated_event(&caller, &chain_end, &sender.weight);
    }

    // ========================================================
    // ENDPOINT: vote
    // ========================================================

    #[endpoint(vote)]
    fn vote(&self, proposal_index: usize) {
        let caller = self.blockchain().get_caller();
        let mut sender = self.voter_or_default(&caller);
        require!(sender.has_right(), ERR_NO_RIGHT);
        require!(!sender.voted, ERR_ALREADY_VOTED);
        require!(
            proposal_index < self.proposals().len(),
            ERR_INVALID_PROPOSAL
        );

        sender.voted = true;
        sender.vote = Some(proposal_index);
        self.store_voter(&caller, &sender);
        self.credit_proposal(proposal_index, &sender.weight);

        self.vote_cast_event(&caller, proposal_index, &sender.weight);
    }

    // ========================================================
    // INTERNAL: voter registry
    // ========================================================

    fn require_chairperson(&self) {
        let caller = self.blockchain().get_caller();
        require!(caller == self.chairperson().get(), ERR_UNAUTHORIZED);
    }

    fn grant_right_to(&self, voter_address: &ManagedAddress) {
        let mut voter = self.voter_or_default(voter_address);
        require!(!voter.voted, ERR_ALREADY_VOTED);
        // Also covers weight that arrived through delegation before the grant.
        require!(voter.weight == 0u64, ERR_ALREADY_HAS_RIGHTS);

        voter.weight = BigUint::from(1u64);
        self.store_voter(voter_address, &voter);
        self.total_granted().update(|total| *total += 1);

        self.right_granted_event(voter_address);
    }

    /// Every identity implicitly holds the zero record until first written.
    fn voter_or_default(&self, address: &ManagedAddress) -> Voter<Self::Api> {
        let mapper = self.voters(address);
        if mapper.is_empty() {
            Voter::unregistered()
        } else {
            mapper.get()
        }
    }

    fn store_voter(&self, address: &ManagedAddress, voter: &Voter<Self::Api>) {
        self.voters(address).set(voter);
        self.participants().insert(address.clone());
    }

    // ========================================================
    // INTERNAL: delegation resolver
    // Delegated records form a forest, so the walk ends at a
    // record without a delegate. The hop cap only trips if that
    // invariant was ever broken.
    // ========================================================

    fn resolve_delegate(&self, caller: &ManagedAddress, target: ManagedAddress) -> ManagedAddress {
        let max_hops = self.participants().len();
        let mut current = target;
        let mut hops = 0usize;

        while let Some(next) = self.voter_or_default(&current).delegate {
            require!(&next != caller, ERR_DELEGATION_CYCLE);
            hops += 1;
            require!(hops <= max_hops, ERR_DELEGATION_CHAIN_TOO_LONG);
            current = next;
        }

        current
    }

    fn credit_proposal(&self, proposal_index: usize, weight: &BigUint) {
        // VecMapper is 1-based
        let slot = proposal_index + 1;
        let mut proposal = self.proposals().get(slot);
        proposal.vote_count += weight;
        self.proposals().set(slot, &proposal);
    }

    // ========================================================
    // INTERNAL: tally
    // Single pass in ledger order. Ties are kept in ascending
    // index order; a strictly higher count restarts the list.
    // ========================================================

    fn compute_winners(&self) -> ManagedVec<usize> {
        let mut winners = ManagedVec::new();
        let mut max_count = BigUint::zero();

        for (index, proposal) in self.proposals().iter().enumerate() {
            if proposal.vote_count > max_count {
                max_count = proposal.vote_count;
                winners.clear();
                winners.push(index);
            } else if proposal.vote_count == max_count {
                winners.push(index);
            }
        }

        winners
    }

    // ========================================================
    // VIEWS — read-only queries
    // ========================================================

    #[view(winningProposals)]
    fn winning_proposals(&self) -> MultiValueEncoded<usize> {
        let mut result = MultiValueEncoded::new();
        for index in self.compute_winners().iter() {
            result.push(index);
        }
        result
    }

    #[view(winnerNames)]
    fn winner_names(&self) -> MultiValueEncoded<ManagedBuffer> {
        let mut result = MultiValueEncoded::new();
        for index in self.compute_winners().iter() {
            result.push(self.proposals().get(index + 1).name);
        }
        result
    }

    #[view(getChairperson)]
    fn get_chairperson(&self) -> ManagedAddress {
        self.chairperson().get()
    }

    #[view(getProposalCount)]
    fn get_proposal_count(&self) -> usize {
        self.proposals().len()
    }

    #[view(getProposal)]
    fn get_proposal(&self, index: usize) -> Proposal<Self::Api> {
        require!(index < self.proposals().len(), ERR_INVALID_PROPOSAL);
        self.proposals().get(index + 1)
    }

    #[view(getProposals)]
    fn get_proposals(&self) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for proposal in self.proposals().iter() {
            result.push(proposal);
        }
        result
    }

    #[view(getVoter)]
    fn get_voter(&self, address: &ManagedAddress) -> Voter<Self::Api> {
        self.voter_or_default(address)
    }

    /// (granted, tallied, pending). Weight is only ever moved, so
    /// granted == tallied + pending holds after every transaction.
    #[view(getWeightSummary)]
    fn get_weight_summary(&self) -> MultiValue3<BigUint, BigUint, BigUint> {
        let granted = BigUint::from(self.total_granted().get());

        let mut tallied = BigUint::zero();
        for proposal in self.proposals().iter() {
            tallied += &proposal.vote_count;
        }

        let mut pending = BigUint::zero();
        for address in self.participants().iter() {
            let voter = self.voter_or_default(&address);
            if !voter.voted {
                pending += &voter.weight;
            }
        }

        (granted, tallied, pending).into()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("ballotCreated")]
    fn ballot_created_event(
        &self,
        #[indexed] chairperson: &ManagedAddress,
        proposal_count: usize,
    );

    #[event("rightGranted")]
    fn right_granted_event(&self, #[indexed] voter: &ManagedAddress);

    #[event("delegated")]
    fn delegated_event(
        &self,
        #[indexed] from: &ManagedAddress,
        #[indexed] to: &ManagedAddress,
        weight: &BigUint,
    );

    #[event("voteCast")]
    fn vote_cast_event(
        &self,
        #[indexed] voter: &ManagedAddress,
        #[indexed] proposal_index: usize,
        weight: &BigUint,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("chairperson")]
    fn chairperson(&self) -> SingleValueMapper<ManagedAddress>;

    // ── Proposal ledger ──

    #[storage_mapper("proposals")]
    fn proposals(&self) -> VecMapper<Proposal<Self::Api>>;

    // ── Voter registry ──

    #[storage_mapper("voters")]
    fn voters(&self, address: &ManagedAddress) -> SingleValueMapper<Voter<Self::Api>>;

    /// Every identity with a materialized voter record.
    #[storage_mapper("participants")]
    fn participants(&self) -> UnorderedSetMapper<ManagedAddress>;

    /// Number of rights ever granted, each worth weight 1.
    #[storage_mapper("totalGranted")]
    fn total_granted(&self) -> SingleValueMapper<u64>;
}
