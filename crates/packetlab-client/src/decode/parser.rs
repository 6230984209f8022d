use serde_json::{Map, Value};
use thiserror::Error;

use super::model::{Decode, Field, Packet, Proto};

/// Maximum accepted nesting depth for protocol layers and fields.
///
/// Real decodes stay in single digits; the guard exists so a pathological
/// document fails with [`DecodeError::DepthExceeded`] instead of exhausting
/// the stack.
pub const MAX_FIELD_DEPTH: usize = 100;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} at {context}")]
    UnexpectedShape {
        context: String,
        expected: &'static str,
    },
    #[error("field tree exceeds maximum depth {max}")]
    DepthExceeded { max: usize },
}

/// Decode a raw JSON document into a [`Decode`] tree.
///
/// Parsing relies on serde_json's own recursion limit, so text nested beyond
/// it fails with [`DecodeError::Json`] rather than overflowing the stack.
pub fn decode_document(raw: &[u8]) -> Result<Decode, DecodeError> {
    let value: Value = serde_json::from_slice(raw)?;
    decode_from_value(&value)
}

/// Decode an already-parsed JSON value into a [`Decode`] tree.
///
/// Unknown keys are ignored; known keys with the wrong type fail with
/// [`DecodeError::UnexpectedShape`]. Nesting beyond [`MAX_FIELD_DEPTH`] fails
/// with [`DecodeError::DepthExceeded`] and never partially constructs a tree.
pub fn decode_from_value(value: &Value) -> Result<Decode, DecodeError> {
    let obj = expect_object(value, "decode")?;
    let packets = opt_list(obj, "packets", "decode", packet_from_value)?;
    Ok(Decode { packets })
}

fn packet_from_value(value: &Value, context: &str) -> Result<Packet, DecodeError> {
    let obj = expect_object(value, context)?;
    let protos = opt_list(obj, "protos", context, |value, context| {
        proto_from_value(value, context, 0)
    })?;
    Ok(Packet { protos })
}

fn proto_from_value(value: &Value, context: &str, depth: usize) -> Result<Proto, DecodeError> {
    check_depth(depth)?;
    let obj = expect_object(value, context)?;
    Ok(Proto {
        name: opt_string(obj, "name", context)?,
        pos: opt_string(obj, "pos", context)?,
        show: opt_string(obj, "show", context)?,
        show_name: opt_string(obj, "show_name", context)?,
        value: opt_string(obj, "value", context)?,
        size: opt_string(obj, "size", context)?,
        fields: opt_list(obj, "fields", context, |value, context| {
            field_from_value(value, context, depth + 1)
        })?,
        protos: opt_list(obj, "protos", context, |value, context| {
            proto_from_value(value, context, depth + 1)
        })?,
    })
}

fn field_from_value(value: &Value, context: &str, depth: usize) -> Result<Field, DecodeError> {
    check_depth(depth)?;
    let obj = expect_object(value, context)?;
    Ok(Field {
        name: opt_string(obj, "name", context)?,
        show_name: opt_string(obj, "show_name", context)?,
        hide: opt_string(obj, "hide", context)?,
        size: opt_string(obj, "size", context)?,
        pos: opt_string(obj, "pos", context)?,
        show: opt_string(obj, "show", context)?,
        fields: opt_list(obj, "fields", context, |value, context| {
            field_from_value(value, context, depth + 1)
        })?,
        protos: opt_list(obj, "protos", context, |value, context| {
            proto_from_value(value, context, depth + 1)
        })?,
    })
}

fn check_depth(depth: usize) -> Result<(), DecodeError> {
    if depth >= MAX_FIELD_DEPTH {
        return Err(DecodeError::DepthExceeded {
            max: MAX_FIELD_DEPTH,
        });
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    context: &str,
) -> Result<&'a Map<String, Value>, DecodeError> {
    value.as_object().ok_or_else(|| DecodeError::UnexpectedShape {
        context: context.to_string(),
        expected: "object",
    })
}

fn opt_string(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<String>, DecodeError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::UnexpectedShape {
            context: format!("{context}.{key}"),
            expected: "string",
        }),
    }
}

fn opt_list<T>(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
    decode: impl Fn(&Value, &str) -> Result<T, DecodeError>,
) -> Result<Option<Vec<T>>, DecodeError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(decode(item, &format!("{context}.{key}[{index}]"))?);
            }
            Ok(Some(out))
        }
        Some(_) => Err(DecodeError::UnexpectedShape {
            context: format!("{context}.{key}"),
            expected: "array",
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DecodeError, MAX_FIELD_DEPTH, decode_document, decode_from_value};

    #[test]
    fn decode_empty_document() {
        let decode = decode_from_value(&json!({})).unwrap();
        assert!(decode.packets.is_none());

        let decode = decode_from_value(&json!({ "packets": [] })).unwrap();
        assert_eq!(decode.packets.unwrap().len(), 0);
    }

    #[test]
    fn decode_nested_fields() {
        let value = json!({
            "packets": [{
                "protos": [{
                    "name": "tcp",
                    "fields": [{
                        "name": "tcp.flags",
                        "show": "0x18",
                        "hide": "false",
                        "fields": [{ "name": "tcp.flags.ack", "show": "true" }]
                    }]
                }]
            }]
        });

        let decode = decode_from_value(&value).unwrap();
        let packets = decode.packets.unwrap();
        let protos = packets[0].protos.as_ref().unwrap();
        assert_eq!(protos[0].name.as_deref(), Some("tcp"));
        let fields = protos[0].fields.as_ref().unwrap();
        assert_eq!(fields[0].hide.as_deref(), Some("false"));
        let children = fields[0].fields.as_ref().unwrap();
        assert_eq!(children[0].show.as_deref(), Some("true"));
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let value = json!({
            "packets": [{ "protos": [{ "name": "ip", "geninfo": {"num": "1"} }] }],
            "engine": "dissector-2"
        });
        let decode = decode_from_value(&value).unwrap();
        let packets = decode.packets.unwrap();
        let protos = packets[0].protos.as_ref().unwrap();
        assert_eq!(protos[0].name.as_deref(), Some("ip"));
    }

    #[test]
    fn decode_rejects_wrong_types() {
        let err = decode_from_value(&json!({ "packets": "nope" })).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape { .. }));

        let err =
            decode_from_value(&json!({ "packets": [{ "protos": [{ "pos": 42 }] }] })).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("string"), "unexpected message: {msg}");
    }

    #[test]
    fn decode_rejects_constructed_depth_overflow() {
        let mut field = json!({ "name": "leaf" });
        for _ in 0..MAX_FIELD_DEPTH + 10 {
            field = json!({ "name": "node", "fields": [field] });
        }
        let value = json!({ "packets": [{ "protos": [{ "fields": [field] }] }] });

        let err = decode_from_value(&value).unwrap_err();
        assert!(matches!(err, DecodeError::DepthExceeded { .. }));
    }

    #[test]
    fn decode_rejects_raw_depth_overflow() {
        let mut raw = String::from("{\"packets\":[{\"protos\":[{\"fields\":[");
        for _ in 0..1000 {
            raw.push_str("{\"fields\":[");
        }
        raw.push_str("{}");
        for _ in 0..1000 {
            raw.push_str("]}");
        }
        raw.push_str("]}]}]}");

        let err = decode_document(raw.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Json(_) | DecodeError::DepthExceeded { .. }
        ));
    }
}
