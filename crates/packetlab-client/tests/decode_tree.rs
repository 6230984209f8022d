use serde_json::json;

use packetlab_client::decode::{
    Ascii, DecodeError, MAX_FIELD_DEPTH, Summary, decode_document, decode_from_value,
};

/// A realistic decode document: two packets, layered protocols, fields nested
/// five levels deep under the TCP layer.
fn sample_decode_document() -> serde_json::Value {
    let deep_field = json!({
        "name": "l1", "show": "outer", "fields": [{
            "name": "l2", "fields": [{
                "name": "l3", "fields": [{
                    "name": "l4", "fields": [{
                        "name": "l5", "show": "innermost", "hide": "false"
                    }]
                }]
            }]
        }]
    });
    json!({
        "packets": [
            {
                "protos": [
                    { "name": "eth", "pos": "0", "size": "14" },
                    { "name": "ip", "pos": "14", "size": "20" },
                    { "name": "tcp", "pos": "34", "size": "32", "fields": [deep_field] }
                ]
            },
            {
                "protos": [
                    { "name": "eth", "pos": "0", "size": "14" },
                    { "name": "arp", "pos": "14", "size": "28", "fields": [
                        { "name": "arp.opcode", "show": "1", "show_name": "true" },
                        { "name": "arp.src.hw_mac", "show": "00:11:22:33:44:55" }
                    ]}
                ]
            }
        ]
    })
}

#[test]
fn decode_round_trip_preserves_order_and_depth() {
    let decode = decode_from_value(&sample_decode_document()).unwrap();

    let packets = decode.packets.as_ref().unwrap();
    assert_eq!(packets.len(), 2);

    // Layer order is outer-to-inner, exactly as the document lists them.
    let layers: Vec<_> = packets[0]
        .protos
        .as_ref()
        .unwrap()
        .iter()
        .map(|proto| proto.name.as_deref().unwrap())
        .collect();
    assert_eq!(layers, ["eth", "ip", "tcp"]);

    // Walk down five levels of fields.
    let mut field = &packets[0].protos.as_ref().unwrap()[2].fields.as_ref().unwrap()[0];
    for expected in ["l1", "l2", "l3", "l4"] {
        assert_eq!(field.name.as_deref(), Some(expected));
        field = &field.fields.as_ref().unwrap()[0];
    }
    assert_eq!(field.name.as_deref(), Some("l5"));
    assert_eq!(field.show.as_deref(), Some("innermost"));
    assert!(field.fields.is_none());

    // Sibling field order within a layer is preserved.
    let arp_fields = packets[1].protos.as_ref().unwrap()[1].fields.as_ref().unwrap();
    assert_eq!(arp_fields[0].name.as_deref(), Some("arp.opcode"));
    assert_eq!(arp_fields[1].name.as_deref(), Some("arp.src.hw_mac"));
}

#[test]
fn decode_preserves_string_typed_booleans() {
    let decode = decode_from_value(&sample_decode_document()).unwrap();
    let packets = decode.packets.unwrap();

    let tcp_field = &packets[0].protos.as_ref().unwrap()[2].fields.as_ref().unwrap()[0];
    let l5 = &tcp_field.fields.as_ref().unwrap()[0].fields.as_ref().unwrap()[0].fields.as_ref().unwrap()[0].fields.as_ref().unwrap()[0];
    assert_eq!(l5.hide.as_deref(), Some("false"));

    let arp_field = &packets[1].protos.as_ref().unwrap()[1].fields.as_ref().unwrap()[0];
    assert_eq!(arp_field.show_name.as_deref(), Some("true"));
}

#[test]
fn decode_with_zero_packets_yields_empty_list() {
    let decode = decode_from_value(&json!({ "packets": [] })).unwrap();
    assert_eq!(decode.packets.unwrap().len(), 0);
}

#[test]
fn thousand_deep_field_tree_fails_without_crashing() {
    let mut raw = String::from("{\"packets\":[{\"protos\":[");
    for _ in 0..1000 {
        raw.push_str("{\"fields\":[");
    }
    raw.push_str("{\"name\":\"leaf\"}");
    for _ in 0..1000 {
        raw.push_str("]}");
    }
    raw.push_str("]}]}");

    let err = decode_document(raw.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Json(_) | DecodeError::DepthExceeded { .. }
    ));
}

#[test]
fn constructed_tree_past_depth_limit_reports_depth() {
    let mut field = json!({ "name": "leaf" });
    for _ in 0..MAX_FIELD_DEPTH + 1 {
        field = json!({ "fields": [field] });
    }
    let value = json!({ "packets": [{ "protos": [{ "fields": [field] }] }] });

    let err = decode_from_value(&value).unwrap_err();
    assert!(matches!(err, DecodeError::DepthExceeded { max } if max == MAX_FIELD_DEPTH));
}

#[test]
fn summary_columns_align_with_structure() {
    let raw = json!({
        "structure": { "sections": [{ "value": "No." }, { "value": "Time" }, { "value": "Info" }] },
        "summaries": [
            { "sections": [{ "value": "1" }, { "value": "0.000" }, { "value": "SYN" }] },
            { "sections": [{ "value": "2" }, { "value": "0.104" }, { "value": "SYN, ACK" }] }
        ]
    });
    let summary: Summary = serde_json::from_value(raw).unwrap();

    let labels = summary.structure.unwrap().sections.unwrap();
    let rows = summary.summaries.unwrap();
    assert_eq!(labels.len(), 3);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.sections.as_ref().unwrap().len(), labels.len());
    }
    assert_eq!(
        rows[1].sections.as_ref().unwrap()[2].value.as_deref(),
        Some("SYN, ACK")
    );
}

#[test]
fn ascii_reassembled_frame_is_optional() {
    let raw = json!({
        "frame": {
            "name": "Frame (60 bytes)",
            "lines": [{
                "raw": "0000  00 11 22",
                "offset": "0000",
                "hex": [{ "byte": "00", "pos": 0 }, { "byte": "11", "pos": 1 }],
                "ascii": [{ "byte": ".", "pos": 0 }, { "byte": ".", "pos": 1 }]
            }]
        }
    });
    let ascii: Ascii = serde_json::from_value(raw).unwrap();

    assert!(ascii.reassembled.is_none());
    let frame = ascii.frame.unwrap();
    let line = &frame.lines.unwrap()[0];
    let hex = line.hex.as_ref().unwrap();
    let chars = line.ascii.as_ref().unwrap();
    assert_eq!(hex.len(), chars.len());
    assert_eq!(hex[1].pos, chars[1].pos);
}

#[test]
fn unknown_keys_are_ignored_everywhere() {
    let summary: Summary = serde_json::from_value(json!({
        "structure": { "sections": [], "width": 120 },
        "summaries": [],
        "engine": "dissector-2"
    }))
    .unwrap();
    assert_eq!(summary.structure.unwrap().sections.unwrap().len(), 0);

    let decode = decode_from_value(&json!({
        "packets": [{ "protos": [], "geninfo": { "num": "1" } }],
        "engine": "dissector-2"
    }))
    .unwrap();
    assert_eq!(decode.packets.unwrap()[0].protos.as_ref().unwrap().len(), 0);
}
