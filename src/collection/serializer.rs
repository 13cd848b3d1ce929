use crate::collection::Collection;
use crate::error::SerializeError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Pretty JSON with a four-space indent. Non-ASCII is written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializeError> {
    let mut out = Vec::with_capacity(4096);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(out)?)
}

/// Encode the finished collection.
pub fn serialize_collection(collection: &Collection) -> Result<String, SerializeError> {
    to_pretty_json(collection)
}
