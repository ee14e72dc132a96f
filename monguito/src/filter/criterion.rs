use serde_json::Value;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::collection::DocumentId;
use crate::common::{Fields, DOC_ID};
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::filter::strict_equals;

/// A boxed document predicate.
pub type Predicate = Arc<dyn Fn(&Fields) -> bool + Send + Sync>;

/// Selects documents during `find`, `update` and `remove`.
///
/// A criterion is either a flat field-equality mapping, where every listed
/// field must strictly equal the document's field, or an arbitrary
/// predicate over the document's fields.
///
/// # Examples
///
/// ```rust,ignore
/// use monguito::filter::Criterion;
/// use serde_json::json;
///
/// let delivered = Criterion::equals(json!({"status": "Delivered", "seller": "Armani"}))?;
/// let big = Criterion::predicate(|doc| doc["total"].as_f64().unwrap_or(0.0) > 700.0);
/// ```
#[derive(Clone)]
pub enum Criterion {
    Equality(Fields),
    Predicate(Predicate),
}

impl Criterion {
    /// Builds an equality criterion from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCriterion` when `value` is not an object.
    pub fn equals(value: Value) -> MonguitoResult<Criterion> {
        match value {
            Value::Object(fields) => Ok(Criterion::Equality(fields)),
            other => {
                log::error!("Invalid criterion {}, expecting object or function", other);
                Err(MonguitoError::new(
                    &format!("Invalid criterion {}, expecting object or function", other),
                    ErrorKind::InvalidCriterion,
                ))
            }
        }
    }

    /// Builds an equality criterion on a single field.
    pub fn field<V: Into<Value>>(name: &str, value: V) -> Criterion {
        let mut fields = Fields::new();
        fields.insert(name.to_string(), value.into());
        Criterion::Equality(fields)
    }

    /// Builds a criterion from a predicate over document fields.
    pub fn predicate<F>(predicate: F) -> Criterion
    where
        F: Fn(&Fields) -> bool + Send + Sync + 'static,
    {
        Criterion::Predicate(Arc::new(predicate))
    }

    /// Evaluates this criterion against one document.
    pub fn matches(&self, fields: &Fields) -> bool {
        match self {
            Criterion::Equality(expected) => expected.iter().all(|(name, value)| {
                fields
                    .get(name)
                    .map(|actual| strict_equals(actual, value))
                    .unwrap_or(false)
            }),
            Criterion::Predicate(predicate) => predicate(fields),
        }
    }
}

/// Criterion matching the document whose `_id` is `id`.
pub fn by_id(id: &DocumentId) -> Criterion {
    Criterion::field(DOC_ID, id.to_value())
}

impl TryFrom<Value> for Criterion {
    type Error = MonguitoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Criterion::equals(value)
    }
}

impl From<Fields> for Criterion {
    fn from(fields: Fields) -> Self {
        Criterion::Equality(fields)
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Equality(fields) => write!(f, "{}", Value::Object(fields.clone())),
            Criterion::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}

impl Debug for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Criterion({})", self)
    }
}
