use std::collections::BTreeSet;

use exactjson::{
    encode, encode_with, modify, parse, parse_with, EncodeOptions, ErrorKind, ExactNumber,
    ParseOptions, Value,
};
use test_case::test_case;

#[test_case("null"; "null")]
#[test_case("true"; "true literal")]
#[test_case("0"; "zero")]
#[test_case("-42"; "negative int")]
#[test_case("42.5"; "float")]
#[test_case("18446744073709551615"; "max uint")]
#[test_case("\"plain\""; "plain string")]
#[test_case("\"esc \\\\ \\\" \\n\""; "escaped string")]
#[test_case("[]"; "empty array")]
#[test_case("[null,[false,[1.5]]]"; "nested arrays")]
#[test_case("{\"a\":{\"b\":[1,2,{\"c\":null}]}}"; "nested object")]
fn encode_of_parse_is_identity(input: &str) {
    let first = parse(input).unwrap();
    let encoded = encode(&first);
    let second = parse(&encoded).unwrap();
    assert_eq!(first, second);
    assert_eq!(encode(&second), encoded, "re-encoding is stable");
}

#[test_case("0.1"; "one tenth")]
#[test_case("0.30000000000000004"; "seventeen digits")]
#[test_case("-123.456"; "negative positional")]
#[test_case("1e300"; "huge exponent")]
#[test_case("4.9e-324"; "smallest subnormal")]
fn float_literals_survive_textually(input: &str) {
    assert_eq!(encode(&parse(input).unwrap()), input);
}

#[test_case("123456789012345678901234567890123456789"; "long integer")]
#[test_case("0.1000000000000000000000000001"; "long fraction")]
#[test_case("-7.25e4000"; "beyond float range")]
fn exact_mode_is_lossless_in_value(input: &str) {
    let options = ParseOptions { exact_floats: true };
    let value = parse_with(input, options).unwrap();
    let reparsed = parse_with(&encode(&value), options).unwrap();
    assert_eq!(value, reparsed);
    let (Value::Exact(a), Value::Exact(b)) = (&value, &reparsed) else {
        panic!("expected exact numbers");
    };
    assert_eq!(a.digits(), b.digits());
}

#[test]
fn surrogate_pair_escapes_reproduce_exactly() {
    assert_eq!(
        encode(&parse("\"\\ud83d\\ude00\"").unwrap()),
        "\"\\ud83d\\ude00\""
    );
}

#[test]
fn canonical_form_ignores_input_ordering_and_spacing() {
    let a = parse("{\"x\":1,\"y\":[1, 2]} // note\n").unwrap();
    let b = parse("/* head */ {\"y\":[1,2], \"x\":1}").unwrap();
    assert_eq!(a, b);
    assert_eq!(encode(&a), encode(&b));
}

#[test]
fn values_work_as_sorted_map_keys() {
    let mut keys: BTreeSet<Value> = BTreeSet::new();
    for input in ["null", "false", "1", "1.5", "\"1\"", "[1]", "{\"1\":1}"] {
        keys.insert(parse(input).unwrap());
        keys.insert(parse(input).unwrap());
    }
    assert_eq!(keys.len(), 7, "re-inserting adds nothing");
    let ordered: Vec<String> = keys.iter().map(encode).collect();
    assert_eq!(
        ordered,
        ["null", "false", "1", "1.5", "\"1\"", "[1]", "{\"1\":1}"]
    );
    // The integer and its float spelling are distinguishable keys.
    keys.insert(parse("1.0").unwrap());
    assert_eq!(keys.len(), 8);
}

#[test]
fn number_representations_interleave_in_the_total_order() {
    let mut values = vec![
        parse("2").unwrap(),
        parse("2.0").unwrap(),
        parse("1.5").unwrap(),
        Value::from(ExactNumber::parse("1.75").unwrap()),
        parse("-3").unwrap(),
    ];
    values.sort();
    let ordered: Vec<String> = values.iter().map(encode).collect();
    assert_eq!(ordered, ["-3", "1.5", "1.75", "2", "2"]);
    assert!(
        matches!(values[3], Value::Uint(2)) && matches!(values[4], Value::Float { .. }),
        "the float spelling of 2 sorts after the integer"
    );
}

#[test]
fn editing_shares_structure_and_preserves_sources() {
    let source = parse(r#"{"config":{"retries":3},"data":[[1],[2],[3]]}"#).unwrap();
    let mut derived = source.clone();
    modify(&mut derived)
        .key("data")
        .at(1)
        .assign(parse("[20]").unwrap())
        .unwrap();
    modify(&mut derived)
        .key("config")
        .key("retries")
        .assign(5.into())
        .unwrap();
    assert_eq!(
        encode(&source),
        r#"{"config":{"retries":3},"data":[[1],[2],[3]]}"#
    );
    assert_eq!(
        encode(&derived),
        r#"{"config":{"retries":5},"data":[[1],[20],[3]]}"#
    );
}

#[test]
fn bulk_edits_compose() {
    let mut value = parse(r#"{"rows":[0,1,2,3,4,5]}"#).unwrap();
    modify(&mut value)
        .key("rows")
        .erase_indexes_if(|index, _| index % 2 == 1)
        .unwrap();
    modify(&mut value)
        .key("rows")
        .at(1)
        .insert_all_at(vec![10.into(), 11.into()])
        .unwrap();
    modify(&mut value)
        .assign_entries(vec![("total".into(), 5.into())])
        .unwrap();
    assert_eq!(encode(&value), r#"{"rows":[0,10,11,2,4],"total":5}"#);
}

#[test]
fn failing_and_non_failing_access_paths_agree() {
    let value = parse(r#"{"present":[10]}"#).unwrap();
    assert_eq!(value.member("present").unwrap(), value.find("present").unwrap());
    assert!(value.find("absent").is_none());
    let err = value.member("absent").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ObjectKey { .. }));
    let array = value.member("present").unwrap();
    assert_eq!(array.element(0).unwrap(), array.find_index(0).unwrap());
    assert!(matches!(
        array.element(1).unwrap_err().kind(),
        ErrorKind::ArrayIndex { index: 1, len: 1 }
    ));
}

#[test]
fn encode_options_compose() {
    let value = parse("\"héllo\\u0001\"").unwrap();
    let default = encode_with(&value, &EncodeOptions::default()).unwrap();
    assert_eq!(default, "\"h\\u00e9llo\\u0001\"");
    let raw = EncodeOptions {
        raw_unicode: true,
        ..EncodeOptions::default()
    };
    assert_eq!(encode_with(&value, &raw).unwrap(), "\"héllo\\u0001\"");
}

#[test]
fn parse_errors_pinpoint_the_leftovers() {
    let err = parse("{\"a\": [1, 2,]}").unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::TrailingComma { container: "array" }
    ));
    assert_eq!(err.context(), Some("]}"));
}
