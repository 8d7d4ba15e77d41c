//! Typed contract values.
//!
//! Every argument passed to a contract and every value returned from one is
//! an [`ScVal`]. Values cross HTTP boundaries in an explicit tagged form,
//! `{"type": <kind>, "value": <payload>}`, so a caller can never have a
//! parameter silently re-encoded as a different type. 64- and 128-bit
//! integers travel as decimal strings in that form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::address::{AccountId, ContractId};
use crate::error::TypesError;

/// Longest symbol a contract accepts.
pub const MAX_SYMBOL_LEN: usize = 32;

/// An address argument: either an account or a contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScAddress {
    Account(AccountId),
    Contract(ContractId),
}

impl ScAddress {
    /// Parse a strkey, choosing the variant from its prefix.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        match s.chars().next() {
            Some(AccountId::PREFIX) => Ok(Self::Account(AccountId::parse(s)?)),
            Some(ContractId::PREFIX) => Ok(Self::Contract(ContractId::parse(s)?)),
            _ => Err(TypesError::InvalidValue(format!("not an address: {s}"))),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Account(id) => id.as_str(),
            Self::Contract(id) => id.as_str(),
        }
    }
}

/// A typed contract value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScVal {
    Void,
    Bool(bool),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    U128(u128),
    I128(i128),
    Symbol(String),
    String(String),
    Bytes(Vec<u8>),
    Address(ScAddress),
    Vec(Vec<ScVal>),
    Map(Vec<(ScVal, ScVal)>),
}

fn valid_symbol(s: &str) -> bool {
    s.len() <= MAX_SYMBOL_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl ScVal {
    /// Build a symbol, rejecting names the contract runtime would refuse.
    pub fn symbol(s: impl Into<String>) -> Result<Self, TypesError> {
        let s = s.into();
        if !valid_symbol(&s) {
            return Err(TypesError::InvalidValue(format!("invalid symbol: {s:?}")));
        }
        Ok(Self::Symbol(s))
    }

    pub fn account(id: AccountId) -> Self {
        Self::Address(ScAddress::Account(id))
    }

    /// The tag used in the JSON form.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool(_) => "bool",
            Self::U32(_) => "u32",
            Self::I32(_) => "i32",
            Self::U64(_) => "u64",
            Self::I64(_) => "i64",
            Self::U128(_) => "u128",
            Self::I128(_) => "i128",
            Self::Symbol(_) => "symbol",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Address(_) => "address",
            Self::Vec(_) => "vec",
            Self::Map(_) => "map",
        }
    }

    /// Encode as `{"type": kind, "value": payload}`.
    pub fn to_tagged(&self) -> Value {
        let value = match self {
            Self::Void => Value::Null,
            Self::Bool(b) => json!(b),
            Self::U32(n) => json!(n),
            Self::I32(n) => json!(n),
            Self::U64(n) => json!(n.to_string()),
            Self::I64(n) => json!(n.to_string()),
            Self::U128(n) => json!(n.to_string()),
            Self::I128(n) => json!(n.to_string()),
            Self::Symbol(s) | Self::String(s) => json!(s),
            Self::Bytes(b) => json!(hex::encode(b)),
            Self::Address(a) => json!(a.as_str()),
            Self::Vec(items) => Value::Array(items.iter().map(Self::to_tagged).collect()),
            Self::Map(entries) => Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| Value::Array(vec![k.to_tagged(), v.to_tagged()]))
                    .collect(),
            ),
        };
        json!({ "type": self.kind(), "value": value })
    }

    /// Decode the tagged JSON form.
    ///
    /// Integer payloads are accepted either as JSON numbers or decimal
    /// strings; the declared `type` always decides the resulting variant.
    pub fn from_tagged(tagged: &Value) -> Result<Self, TypesError> {
        let obj = tagged
            .as_object()
            .ok_or_else(|| invalid("expected an object with `type` and `value`", tagged))?;
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("missing `type`", tagged))?;
        let value = obj.get("value").unwrap_or(&Value::Null);

        let parsed = match kind {
            "void" => Self::Void,
            "bool" => Self::Bool(
                value
                    .as_bool()
                    .ok_or_else(|| invalid("bool expects true/false", value))?,
            ),
            "u32" => Self::U32(parse_int(value)?),
            "i32" => Self::I32(parse_int(value)?),
            "u64" => Self::U64(parse_int(value)?),
            "i64" => Self::I64(parse_int(value)?),
            "u128" => Self::U128(parse_int(value)?),
            "i128" => Self::I128(parse_int(value)?),
            "symbol" => Self::symbol(expect_str(value)?)?,
            "string" => Self::String(expect_str(value)?.to_string()),
            "bytes" => Self::Bytes(
                hex::decode(expect_str(value)?)
                    .map_err(|e| TypesError::InvalidValue(format!("bytes: {e}")))?,
            ),
            "address" => Self::Address(ScAddress::parse(expect_str(value)?)?),
            "vec" => Self::Vec(
                expect_array(value)?
                    .iter()
                    .map(Self::from_tagged)
                    .collect::<Result<_, _>>()?,
            ),
            "map" => {
                let mut entries = Vec::new();
                for pair in expect_array(value)? {
                    match pair.as_array().map(Vec::as_slice) {
                        Some([k, v]) => entries.push((Self::from_tagged(k)?, Self::from_tagged(v)?)),
                        _ => return Err(invalid("map entries are [key, value] pairs", pair)),
                    }
                }
                Self::Map(entries)
            }
            other => {
                return Err(TypesError::InvalidValue(format!("unknown type tag: {other}")));
            }
        };
        Ok(parsed)
    }

    /// Convert to a plain JSON value for display and for callers that do
    /// not care about contract types.
    ///
    /// Maps keyed by symbols or strings become objects (this is how contract
    /// structs arrive); other maps become `[key, value]` pairs. 128-bit
    /// integers become decimal strings.
    pub fn to_native(&self) -> Value {
        match self {
            Self::Void => Value::Null,
            Self::Bool(b) => json!(b),
            Self::U32(n) => json!(n),
            Self::I32(n) => json!(n),
            Self::U64(n) => json!(n),
            Self::I64(n) => json!(n),
            Self::U128(n) => json!(n.to_string()),
            Self::I128(n) => json!(n.to_string()),
            Self::Symbol(s) | Self::String(s) => json!(s),
            Self::Bytes(b) => json!(hex::encode(b)),
            Self::Address(a) => json!(a.as_str()),
            Self::Vec(items) => Value::Array(items.iter().map(Self::to_native).collect()),
            Self::Map(entries) => {
                let keyed = entries
                    .iter()
                    .all(|(k, _)| matches!(k, Self::Symbol(_) | Self::String(_)));
                if keyed {
                    let mut obj = Map::new();
                    for (k, v) in entries {
                        if let Self::Symbol(key) | Self::String(key) = k {
                            obj.insert(key.clone(), v.to_native());
                        }
                    }
                    Value::Object(obj)
                } else {
                    Value::Array(
                        entries
                            .iter()
                            .map(|(k, v)| Value::Array(vec![k.to_native(), v.to_native()]))
                            .collect(),
                    )
                }
            }
        }
    }
}

fn invalid(what: &str, got: &Value) -> TypesError {
    TypesError::InvalidValue(format!("{what}, got {got}"))
}

fn expect_str(value: &Value) -> Result<&str, TypesError> {
    value.as_str().ok_or_else(|| invalid("expected a string", value))
}

fn expect_array(value: &Value) -> Result<&Vec<Value>, TypesError> {
    value.as_array().ok_or_else(|| invalid("expected an array", value))
}

fn parse_int<T: std::str::FromStr>(value: &Value) -> Result<T, TypesError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => return Err(invalid("expected an integer", other)),
    };
    text.parse::<T>()
        .map_err(|_| TypesError::InvalidValue(format!("integer out of range: {text}")))
}
