//! End-to-end scenarios exercising the document assembler: table/array-of-tables redefinition
//! rules, frozen inline tables, the `parse_float` hook, and a few lexical edge cases that only
//! show up once a whole document is parsed rather than a single value.

use taml::{parse, parse_with, Error, Value};

#[test]
fn simple_key_value() {
    let doc = parse("key = \"value\"\n").unwrap();
    assert_eq!(doc.get("key").and_then(Value::as_str), Some("value"));
}

#[test]
fn array_of_tables_assembles_into_nested_array() {
    let input = "\
[[players]]
name = \"Lehtinen\"
[[players]]
name = \"Numminen\"
";
    let doc = parse(input).unwrap();
    let players = doc
        .get("players")
        .and_then(Value::as_array)
        .expect("players is an array");
    assert_eq!(players.len(), 2);
    let name = |i: usize| {
        players
            .get(i)
            .and_then(Value::as_table)
            .and_then(|t| t.get("name"))
            .and_then(Value::as_str)
    };
    assert_eq!(name(0), Some("Lehtinen"));
    assert_eq!(name(1), Some("Numminen"));
}

#[test]
fn dotted_key_table_cannot_be_reopened_with_a_header() {
    // `a.b.c = 1` implicitly creates table `a.b` via a dotted key, not a `[header]`; a later
    // `[a.b]` header is an attempt to redefine it and must fail.
    let input = "a.b.c = 1\n[a.b]\n";
    assert!(matches!(parse(input), Err(Error::Parse(_))));
}

#[test]
fn inline_table_is_frozen_against_later_dotted_keys() {
    let input = "a = {x = 1}\na.y = 2\n";
    assert!(matches!(parse(input), Err(Error::Parse(_))));
}

#[test]
fn custom_parse_float_sees_underscore_stripped_text() {
    let input = "precision = 0.982_492\n";
    let doc = parse_with(input, |text| Ok(Value::from(text.to_owned()))).unwrap();
    assert_eq!(doc.get("precision").and_then(Value::as_str), Some("0.982492"));
}

#[test]
fn unexpected_closing_brackets_error_at_byte_zero() {
    match parse("]]bad[[") {
        Err(Error::Parse(e)) => assert_eq!(e.offset(), 0),
        other => panic!("expected Error::Parse at offset 0, got {other:?}"),
    }
}

#[test]
fn lone_surrogate_escape_is_rejected() {
    let input = "bad = \"\\uD800\"\n";
    assert!(matches!(parse(input), Err(Error::Parse(_))));
}

#[test]
fn bare_cr_in_multiline_basic_string_is_rejected() {
    let input = "s = \"\"\"line\rmore\"\"\"\n";
    assert!(matches!(parse(input), Err(Error::Parse(_))));
}
