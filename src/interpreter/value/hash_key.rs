use crate::{
    error::RuntimeError,
    interpreter::value::core::{Value, ValueType},
};

/// A deterministic key derived from a hashable value.
///
/// Keys pair the value's type tag with a 64-bit payload, so equal payloads of
/// different types (for example the integer `1` and the boolean `true`) can
/// never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    /// The type tag of the value the key was derived from.
    pub value_type: ValueType,
    /// The derived 64-bit payload.
    pub value:      u64,
}

impl Value {
    /// Derives the hash key for this value.
    ///
    /// Booleans map to 0 or 1, integers to their bit pattern, and strings to
    /// the 64-bit FNV-1a digest of their bytes.
    ///
    /// # Errors
    /// Every other variant is not hashable and produces
    /// [`RuntimeError::UnusableHashKey`].
    ///
    /// # Example
    /// ```
    /// use tensora::interpreter::value::core::Value;
    ///
    /// let a = Value::from("key");
    /// let b = Value::from("key");
    ///
    /// assert_eq!(a.hash_key().unwrap(), b.hash_key().unwrap());
    /// assert!(Value::Null.hash_key().is_err());
    /// ```
    pub fn hash_key(&self) -> Result<HashKey, RuntimeError> {
        match self {
            Self::Boolean(b) => Ok(HashKey { value_type: self.type_of(),
                                             value:      u64::from(*b), }),
            #[allow(clippy::cast_sign_loss)]
            Self::Integer(v) => Ok(HashKey { value_type: self.type_of(),
                                             value:      *v as u64, }),
            Self::String(s) => Ok(HashKey { value_type: self.type_of(),
                                            value:      fnv1a(s.as_bytes()), }),
            _ => Err(RuntimeError::UnusableHashKey { key: self.type_of() }),
        }
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over a byte slice.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
