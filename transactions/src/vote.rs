//! Operations against the voting contract.

use ballot_types::{AccountId, ContractId, InvokeContractOp, Operation, ScVal};

/// Contract function that records a vote.
pub const CAST_VOTE_FN: &str = "cast_vote";
/// Contract function that returns one proposal (or the `id == 0` sentinel).
pub const VIEW_PROPOSAL_FN: &str = "view_proposal";

/// Arguments for `cast_vote`, in the order the contract declares them:
/// `(proposal_id: u64, choice: bool, voter: address)`.
pub fn cast_vote_args(proposal_id: u64, choice: bool, voter: &AccountId) -> Vec<ScVal> {
    vec![
        ScVal::U64(proposal_id),
        ScVal::Bool(choice),
        ScVal::account(voter.clone()),
    ]
}

pub fn cast_vote_op(
    contract: &ContractId,
    proposal_id: u64,
    choice: bool,
    voter: &AccountId,
) -> Operation {
    Operation::InvokeContract(InvokeContractOp::new(
        contract.clone(),
        CAST_VOTE_FN,
        cast_vote_args(proposal_id, choice, voter),
    ))
}

/// Arguments for `view_proposal`: `(proposal_id: u64)`.
pub fn view_proposal_args(proposal_id: u64) -> Vec<ScVal> {
    vec![ScVal::U64(proposal_id)]
}
