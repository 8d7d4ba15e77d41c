use proptest::prelude::*;

use ballot_types::codec::{from_wire, to_wire};
use ballot_types::{ScVal, TxHash};

fn scalar() -> impl Strategy<Value = ScVal> {
    prop_oneof![
        any::<bool>().prop_map(ScVal::Bool),
        any::<u32>().prop_map(ScVal::U32),
        any::<i32>().prop_map(ScVal::I32),
        any::<u64>().prop_map(ScVal::U64),
        any::<i64>().prop_map(ScVal::I64),
        any::<u128>().prop_map(ScVal::U128),
        any::<i128>().prop_map(ScVal::I128),
        "[a-z_]{1,32}".prop_map(ScVal::Symbol),
        ".*".prop_map(ScVal::String),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(ScVal::Bytes),
    ]
}

fn nested() -> impl Strategy<Value = ScVal> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ScVal::Vec),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(ScVal::Map),
        ]
    })
}

proptest! {
    /// The tagged JSON form never changes a value's declared type.
    #[test]
    fn tagged_form_preserves_kind(value in nested()) {
        let tagged = value.to_tagged();
        prop_assert_eq!(tagged["type"].as_str(), Some(value.kind()));
        let back = ScVal::from_tagged(&tagged).unwrap();
        prop_assert_eq!(back, value);
    }

    /// Wire decoding returns exactly what was encoded, including wide integers.
    #[test]
    fn wire_form_is_lossless(value in nested()) {
        let wire = to_wire(&value).unwrap();
        let back: ScVal = from_wire(&wire).unwrap();
        prop_assert_eq!(back, value);
    }

    /// Hex parsing of hashes accepts any 32-byte value in either case.
    #[test]
    fn tx_hash_hex_any_case(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let upper = hash.to_hex().to_uppercase();
        prop_assert_eq!(TxHash::from_hex(&upper).unwrap(), hash);
    }
}
