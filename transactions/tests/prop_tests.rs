use proptest::prelude::*;

use ballot_crypto::{account_id_from_public_key, keypair_from_seed};
use ballot_transactions::{cast_vote_op, TransactionBuilder, CAST_VOTE_FN};
use ballot_types::{Account, ContractId, NetworkId, ScAddress, ScVal, Timestamp};

const CONTRACT: &str = "CAUYK67YNHDL4772UCM6NCTMHLEB7B3WCP637OARYEJGJJV75DBYCTYC";

proptest! {
    /// `cast_vote` arguments are always `(u64 proposal, bool choice, address voter)`.
    #[test]
    fn cast_vote_arguments_keep_type_and_order(
        proposal_id in any::<u64>(),
        choice in any::<bool>(),
        seed in prop::array::uniform32(any::<u8>()),
    ) {
        let voter = account_id_from_public_key(&keypair_from_seed(&seed).public);
        let contract = ContractId::parse(CONTRACT).unwrap();
        let op = cast_vote_op(&contract, proposal_id, choice, &voter);
        let invoke = op.as_invoke().unwrap();

        prop_assert_eq!(invoke.function.as_str(), CAST_VOTE_FN);
        prop_assert_eq!(invoke.args.len(), 3);
        prop_assert_eq!(&invoke.args[0], &ScVal::U64(proposal_id));
        prop_assert_eq!(&invoke.args[1], &ScVal::Bool(choice));
        prop_assert_eq!(&invoke.args[2], &ScVal::Address(ScAddress::Account(voter)));
    }

    /// A transaction built from a snapshot always carries the next sequence.
    #[test]
    fn built_sequence_is_snapshot_plus_one(sequence in 0u64..u64::MAX) {
        let voter = account_id_from_public_key(&keypair_from_seed(&[1u8; 32]).public);
        let contract = ContractId::parse(CONTRACT).unwrap();
        let unsigned = TransactionBuilder::new(&Account::new(voter.clone(), sequence), 100, NetworkId::Testnet)
            .add_operation(cast_vote_op(&contract, 1, true, &voter))
            .build_at(Timestamp::new(0))
            .unwrap();
        prop_assert_eq!(unsigned.tx().sequence, sequence + 1);
    }
}
