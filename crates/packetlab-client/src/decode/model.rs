use serde::{Deserialize, Serialize};

/// One cell of a capture summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Cell value; `None` when the server omitted the key.
    pub value: Option<String>,
}

/// Column labels for a capture summary, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub sections: Option<Vec<Section>>,
}

/// Column values for one summarized packet.
///
/// `sections[i]` corresponds positionally to the owning summary's
/// `structure.sections[i]` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPacket {
    pub sections: Option<Vec<Section>>,
}

/// Tabular overview of a capture: one row per packet.
///
/// # Examples
/// ```
/// use packetlab_client::decode::Summary;
///
/// let raw = r#"{"structure":{"sections":[{"value":"Time"}]},
///               "summaries":[{"sections":[{"value":"0.000"}]}]}"#;
/// let summary: Summary = serde_json::from_str(raw)?;
/// let structure = summary.structure.unwrap();
/// assert_eq!(structure.sections.unwrap()[0].value.as_deref(), Some("Time"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub structure: Option<Structure>,
    pub summaries: Option<Vec<SummaryPacket>>,
}

/// One field of a decoded protocol layer.
///
/// Fields nest to unbounded depth (`fields` holds child `Field`s); the tree is
/// produced by [`decode_document`](super::decode_document), which enforces
/// [`MAX_FIELD_DEPTH`](super::MAX_FIELD_DEPTH).
///
/// `show_name`, `hide` and `show` carry the server's literal `"true"` /
/// `"false"` vocabulary as strings; the server treats them as tri-state
/// capable, so they are deliberately not coerced to `bool`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: Option<String>,
    pub show_name: Option<String>,
    pub hide: Option<String>,
    pub size: Option<String>,
    pub pos: Option<String>,
    pub show: Option<String>,
    pub fields: Option<Vec<Field>>,
    pub protos: Option<Vec<Proto>>,
}

/// One protocol layer of a decoded packet.
///
/// `fields` and `protos` are accepted for forward compatibility; the current
/// server schema does not populate them on protocol layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proto {
    pub name: Option<String>,
    pub pos: Option<String>,
    pub show: Option<String>,
    pub show_name: Option<String>,
    pub value: Option<String>,
    pub size: Option<String>,
    pub fields: Option<Vec<Field>>,
    pub protos: Option<Vec<Proto>>,
}

/// One decoded packet: protocol layers ordered outer-to-inner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    pub protos: Option<Vec<Proto>>,
}

/// Top-level decode result for a capture (or filtered subset of it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decode {
    pub packets: Option<Vec<Packet>>,
}

/// One byte of a hex/ASCII dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiByte {
    pub byte: Option<String>,
    pub pos: Option<i64>,
}

/// One line of a hex/ASCII dump.
///
/// `ascii` and `hex` render the same bytes and are index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiLine {
    pub raw: Option<String>,
    pub offset: Option<String>,
    pub ascii: Option<Vec<AsciiByte>>,
    pub hex: Option<Vec<AsciiByte>>,
}

/// Dump of one packet or one reassembled stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiFrame {
    pub name: Option<String>,
    pub lines: Option<Vec<AsciiLine>>,
}

/// Hex/ASCII dump of a capture frame.
///
/// `reassembled` is present only for reassembled TCP streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ascii {
    pub frame: Option<AsciiFrame>,
    pub reassembled: Option<AsciiFrame>,
}
