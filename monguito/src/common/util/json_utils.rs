use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::common::RENDER_INDENT;
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};

/// The field mapping of a stored document, in insertion order.
pub type Fields = Map<String, Value>;

/// Renders any serializable value as tab-indented JSON.
pub fn render_pretty<T: Serialize + ?Sized>(value: &T) -> MonguitoResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(RENDER_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|err| {
        log::error!("Rendered JSON is not valid UTF-8: {}", err);
        MonguitoError::new(
            &format!("Rendered JSON is not valid UTF-8: {}", err),
            ErrorKind::EncodingError,
        )
    })
}

/// Borrows `value` as a field mapping, failing with `InvalidArgument` when it
/// is anything other than a JSON object.
pub fn expect_object<'a>(value: &'a Value, context: &str) -> MonguitoResult<&'a Fields> {
    match value {
        Value::Object(fields) => Ok(fields),
        Value::Null => {
            log::error!("{}, argument can't be null", context);
            Err(MonguitoError::new(
                &format!("{}, argument can't be null", context),
                ErrorKind::InvalidArgument,
            ))
        }
        _ => {
            log::error!("{}, invalid argument, expecting object", context);
            Err(MonguitoError::new(
                &format!("{}, invalid argument, expecting object", context),
                ErrorKind::InvalidArgument,
            ))
        }
    }
}
