use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Display};
use uuid::Uuid;

use crate::common::{KEY_SEPARATOR, UUID_SENTINEL};
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};

/// Positions of the hyphens in a hyphenated UUID.
const UUID_HYPHENS: [usize; 4] = [8, 13, 18, 23];
const UUID_VERSION_POSITION: usize = 14;
const UUID_VARIANT_POSITION: usize = 19;
const UUID_LENGTH: usize = 36;

/// The identifier stored in a document's `_id` field.
///
/// Identifiers come in two schemes that share one namespace:
/// - `Int`: auto-increment natural numbers handed out by the collection index
/// - `Uuid`: RFC4122 version 4 strings, requested by inserting `_id: "uuid"`
///
/// Serialized as the bare JSON number or string, so a stored document reads
/// `{"_id": 1, ...}` or `{"_id": "0F4C...", ...}`.
#[derive(PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(u64),
    Uuid(String),
}

impl DocumentId {
    /// Generates a new `Uuid` identifier.
    pub fn new_uuid() -> Self {
        DocumentId::Uuid(generate_uuid_v4())
    }

    /// Returns `true` for UUID identifiers.
    pub fn is_uuid(&self) -> bool {
        matches!(self, DocumentId::Uuid(_))
    }

    /// Storage key of the document with this id inside `collection_name`.
    ///
    /// UUIDs are used verbatim; integers are prefixed with the collection
    /// name, e.g. `orders-7`.
    pub fn storage_key(&self, collection_name: &str) -> String {
        match self {
            DocumentId::Uuid(uuid) => uuid.clone(),
            DocumentId::Int(id) => format!("{}{}{}", collection_name, KEY_SEPARATOR, id),
        }
    }

    /// Converts this id back into a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            DocumentId::Int(id) => Value::from(*id),
            DocumentId::Uuid(uuid) => Value::from(uuid.as_str()),
        }
    }
}

impl TryFrom<&Value> for DocumentId {
    type Error = MonguitoError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        if let Some(id) = natural_number(value) {
            return Ok(DocumentId::Int(id));
        }
        match value.as_str() {
            Some(uuid) if is_uuid_v4(uuid) => Ok(DocumentId::Uuid(uuid.to_string())),
            _ => {
                log::error!("Invalid document _id {}, expecting number or UUID", value);
                Err(MonguitoError::new(
                    &format!("Invalid document _id {}, expecting number or UUID", value),
                    ErrorKind::InvalidId,
                ))
            }
        }
    }
}

impl TryFrom<Value> for DocumentId {
    type Error = MonguitoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        DocumentId::try_from(&value)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        DocumentId::Int(id)
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        match id {
            DocumentId::Int(id) => Value::from(id),
            DocumentId::Uuid(uuid) => Value::String(uuid),
        }
    }
}

impl From<&DocumentId> for Value {
    fn from(id: &DocumentId) -> Self {
        id.to_value()
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Int(id) => write!(f, "{}", id),
            DocumentId::Uuid(uuid) => write!(f, "{}", uuid),
        }
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Int(id) => write!(f, "_id:{}", id),
            DocumentId::Uuid(uuid) => write!(f, "_id:\"{}\"", uuid),
        }
    }
}

/// Returns the value as `u64` when it is a non-negative integral number.
fn natural_number(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(number) => number,
        _ => return None,
    };
    if let Some(id) = number.as_u64() {
        return Some(id);
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float >= 0.0 && float < u64::MAX as f64 => {
            Some(float as u64)
        }
        _ => None,
    }
}

/// `true` iff `value` is a number, integral and not negative.
pub fn is_natural_number(value: &Value) -> bool {
    natural_number(value).is_some()
}

/// `true` iff `candidate` is a 36 character RFC4122 version 4 UUID.
///
/// Hyphens must sit at positions 8, 13, 18 and 23, position 14 must be `4`,
/// position 19 one of `8`, `9`, `A`, `B`, and every other position a
/// hexadecimal digit. Letter case is ignored.
pub fn is_uuid_v4(candidate: &str) -> bool {
    if candidate.len() != UUID_LENGTH {
        return false;
    }

    candidate.chars().enumerate().all(|(position, digit)| {
        let digit = digit.to_ascii_uppercase();
        if UUID_HYPHENS.contains(&position) {
            digit == '-'
        } else if position == UUID_VERSION_POSITION {
            digit == '4'
        } else if position == UUID_VARIANT_POSITION {
            matches!(digit, '8' | '9' | 'A' | 'B')
        } else {
            digit.is_ascii_hexdigit()
        }
    })
}

/// `true` iff `value` is a natural number or a UUID v4 string.
pub fn is_valid_document_id(value: &Value) -> bool {
    is_natural_number(value) || value.as_str().map(is_uuid_v4).unwrap_or(false)
}

/// Generates a random, upper-case, hyphenated UUID v4.
pub fn generate_uuid_v4() -> String {
    Uuid::new_v4().hyphenated().to_string().to_uppercase()
}

/// Decides the `_id` of a document about to be inserted.
///
/// `requested` is the `_id` the caller supplied, if any. Absent means "take
/// the next auto-increment value" and the sentinel `"uuid"` means "generate
/// a UUID". Anything else is rejected: callers cannot pick identifiers.
pub(crate) fn assign_document_id(
    requested: Option<&Value>,
    next_identity: impl FnOnce() -> MonguitoResult<u64>,
) -> MonguitoResult<DocumentId> {
    match requested {
        None => Ok(DocumentId::Int(next_identity()?)),
        Some(Value::String(sentinel)) if sentinel == UUID_SENTINEL => Ok(DocumentId::new_uuid()),
        Some(other) => {
            log::error!("Invalid _id value {}, only '{}' is allowed", other, UUID_SENTINEL);
            Err(MonguitoError::new(
                &format!("Invalid _id value {}, only '{}' is allowed", other, UUID_SENTINEL),
                ErrorKind::InvalidId,
            ))
        }
    }
}
