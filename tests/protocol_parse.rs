use packgate::proto::parser::epoch_seconds;
use packgate::proto::{parse_line, Message};

#[test]
fn decodes_a_full_record_with_escapes() {
    let message =
        parse_line("1,some-target,some-type,some-data,Hello%!(PACKER_COMMA) World\\n\\r")
            .expect("well-formed line");

    assert_eq!(message.timestamp, epoch_seconds(1));
    assert_eq!(message.target.as_deref(), Some("some-target"));
    assert_eq!(message.kind, "some-type");
    assert_eq!(
        message.data,
        vec!["some-data".to_string(), "Hello, World\n\r".to_string()]
    );
}

#[test]
fn empty_target_is_absent() {
    let message = parse_line("5,,ui,say,hi").expect("well-formed line");
    assert_eq!(message.target, None);
    assert_eq!(message.kind, Message::TYPE_UI);
    assert_eq!(message.data, vec!["say", "hi"]);
}

#[test]
fn preserves_empty_trailing_fields() {
    let message = parse_line("7,web,artifact,0,id,").expect("well-formed line");
    assert_eq!(message.kind, Message::TYPE_ARTIFACT);
    assert_eq!(message.data, vec!["0", "id", ""]);
}

#[test]
fn three_fields_make_a_message_with_empty_data() {
    let message = parse_line("3,,version").expect("well-formed line");
    assert_eq!(message.kind, Message::TYPE_VERSION);
    assert!(message.data.is_empty());
}

#[test]
fn field_count_is_unbounded() {
    let line = format!("9,web,artifact,{}", vec!["x"; 32].join(","));
    let message = parse_line(&line).expect("well-formed line");
    assert_eq!(message.data.len(), 32);
}

#[test]
fn malformed_lines_are_skipped() {
    assert_eq!(parse_line(""), None);
    assert_eq!(parse_line("no commas here"), None);
    assert_eq!(parse_line("1,web"), None);
    assert_eq!(parse_line("not-a-number,web,ui,say,hi"), None);
    assert_eq!(parse_line("1.5,web,ui"), None);
}

#[test]
fn comma_escape_only_applies_to_data_fields() {
    // The escape sequence in the kind field is left as-is; unescaping is a
    // data-field rule.
    let message = parse_line("1,,a%!(PACKER_COMMA)b,c%!(PACKER_COMMA)d").expect("line");
    assert_eq!(message.kind, "a%!(PACKER_COMMA)b");
    assert_eq!(message.data, vec!["c,d"]);
}
