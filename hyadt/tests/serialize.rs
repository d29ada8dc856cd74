use hyadt::escape::{escape_string, unescape_string};
use hyadt::prelude::*;

#[test]
fn flat_construction() {
    let point = make_constructor("Point").call(args![3, 4]);
    assert_eq!(serialize_variant(&point).unwrap(), "Point 3 4");
    assert_eq!(point.to_string(), "Point 3 4");
}

#[test]
fn nullary_construction_is_its_tag() {
    assert_eq!(serialize_variant(&Variant::nullary("Nil")).unwrap(), "Nil");
}

#[test]
fn nested_constructions_are_parenthesized() {
    let list = Variant::new(
        "Cons",
        args![1, Variant::new("Cons", args![2, Variant::nullary("Nil")])],
    );
    assert_eq!(serialize_variant(&list).unwrap(), "Cons 1 (Cons 2 (Nil))");
}

#[test]
fn numbers_use_shortest_form() {
    let v = Variant::new("N", args![3.0, -2.5, 0.1, 1e21]);
    assert_eq!(serialize_variant(&v).unwrap(), "N 3 -2.5 0.1 1000000000000000000000");
}

#[test]
fn strings_are_quoted_and_escaped() {
    let v = Variant::new("Say", args!["hi \"you\"", "it's", "tab\tnew\nline", "back\\slash"]);
    assert_eq!(
        serialize_variant(&v).unwrap(),
        r#"Say "hi \"you\"" "it\'s" "tab\tnew\nline" "back\\slash""#
    );
}

#[test]
fn arrays_are_bracketed() {
    let v = Variant::new(
        "Bag",
        args![
            args![1, "two", Variant::new("Three", args![3])],
            Vec::<Value>::new(),
        ],
    );
    assert_eq!(serialize_variant(&v).unwrap(), r#"Bag [1,"two",(Three 3)] []"#);
}

#[test]
fn serialized_is_an_ordinary_tag() {
    let v = Variant::new("serialized", args!["text"]);
    assert_eq!(serialize_variant(&v).unwrap(), r#"serialized "text""#);

    let nested = Variant::new("Outer", args![v]);
    assert_eq!(serialize_variant(&nested).unwrap(), r#"Outer (serialized "text")"#);
}

#[test]
fn top_level_primitives_use_argument_form() {
    assert_eq!(serialize(&Value::from("a b")).unwrap(), r#""a b""#);
    assert_eq!(serialize(&Value::from(42)).unwrap(), "42");
    assert_eq!(serialize(&Value::from(args![1, 2])).unwrap(), "[1,2]");
}

#[test]
fn the_serializer_is_an_evaluator() {
    let serializer = hyadt::serialize::serializer();
    assert_eq!(serializer.table().len(), 1);
    assert!(serializer.table().default_handler().is_some());
}

#[test]
fn escape_round_trip() {
    for s in ["", "plain", "\\", "'\"", "\t\r\n", "\\t is literal", "ünïcödé"] {
        assert_eq!(unescape_string(&escape_string(s)), s);
    }
}

#[test]
fn numeric_tags_stay_constructions() {
    let three = Variant::nullary(3);
    assert_eq!(serialize_variant(&three).unwrap(), "(3)");
    assert_eq!(deserialize("(3)").unwrap(), Some(Value::from(three)));

    let with_fields = Variant::new(3, args![4]);
    assert_eq!(serialize_variant(&with_fields).unwrap(), "3 4");

    let nested = Variant::new("Wrap", args![Variant::nullary(3)]);
    assert_eq!(serialize_variant(&nested).unwrap(), "Wrap (3)");
    assert_eq!(serialize(&Value::from(args![Variant::nullary(3)])).unwrap(), "[(3)]");
}

#[test]
fn tags_must_be_identifiers() {
    assert!(Tag::from("Point").is_identifier());
    assert!(Tag::from("A-b").is_identifier());
    assert!(Tag::from(3).is_identifier());
    for name in ["", "My Tag", "a(b", "x,y", "[z]", "it's", "tab\there"] {
        assert!(!Tag::from(name).is_identifier(), "{name:?}");
    }

    let invalid = |name: &str| SerializeError::InvalidTag { tag: Tag::from(name) };
    assert_eq!(serialize_variant(&Variant::nullary("")), Err(invalid("")));
    assert_eq!(
        serialize_variant(&Variant::new("My Tag", args![1])),
        Err(invalid("My Tag"))
    );
    // nested in a field and inside an array
    let nested = Variant::new("Outer", args![Variant::new("a(b", args![])]);
    assert_eq!(serialize_variant(&nested), Err(invalid("a(b")));
    let in_array = Value::from(args![1, Variant::nullary("x y")]);
    assert_eq!(serialize(&in_array), Err(invalid("x y")));

    // the serializing evaluator rejects them on its own
    let serializer = hyadt::serialize::serializer();
    let err = serializer.reduce(&Variant::nullary("My Tag")).unwrap_err();
    assert!(matches!(err, EvalError::Handler { tag, .. } if tag.as_str() == "My Tag"));

    // formatting fails instead of writing an ambiguous encoding
    use std::fmt::Write;
    let mut out = String::new();
    assert!(write!(out, "{}", Variant::nullary("")).is_err());
}
