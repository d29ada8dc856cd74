use hyadt::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const TAGS: &[&str] = &["Point", "Cons", "Nil", "Leaf", "Node", "serialized", "x_1", "A-b"];
const ALPHABET: &[char] = &[
    'a', 'Z', '0', ' ', '"', '\'', '\\', '\t', '\r', '\n', '(', ')', '[', ']', ',', 'é', '∀',
];

fn random_string(rng: &mut ChaCha20Rng) -> String {
    let len = rng.random_range(0..8);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn random_number(rng: &mut ChaCha20Rng) -> f64 {
    match rng.random_range(0..3) {
        0 => rng.random_range(-1000..1000) as f64,
        1 => rng.random_range(-1.0e6..1.0e6),
        _ => rng.random_range(-1.0..1.0) * 1e-9,
    }
}

fn random_variant(rng: &mut ChaCha20Rng, depth: usize) -> Variant {
    let tag = TAGS[rng.random_range(0..TAGS.len())];
    let arity = rng.random_range(0..4);
    let fields = (0..arity).map(|_| random_value(rng, depth)).collect();
    Variant::new(tag, fields)
}

fn random_value(rng: &mut ChaCha20Rng, depth: usize) -> Value {
    let leaf = depth == 0 || rng.random_bool(0.4);
    match rng.random_range(0..if leaf { 2 } else { 4 }) {
        0 => Value::Str(random_string(rng)),
        1 => Value::Num(random_number(rng)),
        2 => {
            let len = rng.random_range(0..4);
            Value::Array((0..len).map(|_| random_value(rng, depth - 1)).collect())
        }
        _ => Value::Variant(random_variant(rng, depth - 1)),
    }
}

#[test]
fn random_variants_survive_the_text_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    for _ in 0..500 {
        let variant = random_variant(&mut rng, 4);
        let text = serialize_variant(&variant).unwrap();
        let decoded = deserialize(&text)
            .unwrap_or_else(|err| panic!("failed to decode {text:?}: {err}"))
            .expect("non-empty encoding");
        assert_eq!(decoded, Value::Variant(variant), "encoding {text:?}");
    }
}

#[test]
fn random_values_survive_the_text_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x1337);
    for _ in 0..500 {
        let value = random_value(&mut rng, 3);
        let text = serialize(&value).unwrap();
        let decoded = deserialize(&text)
            .unwrap_or_else(|err| panic!("failed to decode {text:?}: {err}"))
            .expect("non-empty encoding");
        assert_eq!(decoded, value, "encoding {text:?}");
    }
}

#[test]
fn non_finite_numbers_do_not_round_trip() {
    let v = Variant::new("N", args![f64::INFINITY, f64::NAN]);
    let text = serialize_variant(&v).unwrap();
    assert_eq!(text, "N inf NaN");
    assert_eq!(
        deserialize(&text).unwrap(),
        Some(Value::from(Variant::new(
            "N",
            args![Variant::nullary("inf"), Variant::nullary("NaN")],
        )))
    );
}
