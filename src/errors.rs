// User-error messages. Each one aborts the transaction, so state is left
// exactly as it was before the call.

pub const ERR_UNAUTHORIZED: &str = "Only the chairperson can grant voting rights";
pub const ERR_ALREADY_VOTED: &str = "Already voted";
pub const ERR_ALREADY_HAS_RIGHTS: &str = "Voter already has voting rights";
pub const ERR_NO_RIGHT: &str = "No right to vote";
pub const ERR_SELF_DELEGATION: &str = "Self-delegation is disallowed";
pub const ERR_DELEGATION_CYCLE: &str = "Found loop in delegation";
pub const ERR_INVALID_PROPOSAL: &str = "Proposal does not exist";
pub const ERR_PROPOSAL_NAME_TOO_LONG: &str = "Proposal name exceeds 32 bytes";
pub const ERR_DELEGATION_CHAIN_TOO_LONG: &str = "Delegation chain longer than voter registry";
