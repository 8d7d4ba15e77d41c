//! Wire codec for envelopes and values.
//!
//! Everything that crosses the RPC or signer boundary as an opaque string
//! uses the same form: lowercase hex of the bincode serialisation.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TypesError;

pub fn to_wire<T: Serialize>(value: &T) -> Result<String, TypesError> {
    let bytes = bincode::serialize(value).map_err(|e| TypesError::Encode(e.to_string()))?;
    Ok(hex::encode(bytes))
}

pub fn from_wire<T: DeserializeOwned>(wire: &str) -> Result<T, TypesError> {
    let bytes = hex::decode(wire.trim()).map_err(|e| TypesError::Decode(format!("hex: {e}")))?;
    bincode::deserialize(&bytes).map_err(|e| TypesError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ScVal;

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            from_wire::<ScVal>("not hex"),
            Err(TypesError::Decode(_))
        ));
        assert!(matches!(from_wire::<ScVal>("ffffffff"), Err(TypesError::Decode(_))));
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        let wire = to_wire(&ScVal::Bool(true)).unwrap();
        let back: ScVal = from_wire(&format!("{wire}\n")).unwrap();
        assert_eq!(back, ScVal::Bool(true));
    }
}
