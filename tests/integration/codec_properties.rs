use patrol_swarm::bus::{decode_position, encode_position, encode_position_legacy};
use patrol_swarm::error::DecodeError;
use patrol_swarm::types::Position;
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = f64> {
    -1.0e6f64..1.0e6f64
}

fn position() -> impl Strategy<Value = Position> {
    (coordinate(), coordinate(), coordinate()).prop_map(|(x, y, z)| Position::new(x, y, z))
}

fn assert_close(a: &Position, b: &Position) {
    assert!(a.distance(b) <= 1e-6, "{} != {}", a, b);
}

proptest! {
    #[test]
    fn preferred_encoding_decodes_to_same_position(pos in position()) {
        let decoded = decode_position(&encode_position(&pos)).unwrap();
        assert_close(&decoded, &pos);
    }

    #[test]
    fn legacy_encoding_decodes_to_same_position(pos in position()) {
        let decoded = decode_position(&encode_position_legacy(&pos)).unwrap();
        assert_close(&decoded, &pos);
    }

    #[test]
    fn arbitrary_payloads_never_panic(payload in ".{0,40}") {
        let _ = decode_position(&payload);
    }

    #[test]
    fn payloads_without_three_fields_are_rejected(
        fields in prop::collection::vec(coordinate(), 0..6)
            .prop_filter("not three fields", |f| f.len() != 3)
    ) {
        let payload = fields
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(";");
        let is_arity_error = matches!(
            decode_position(&payload),
            Err(DecodeError::WrongArity { .. })
        );
        prop_assert!(is_arity_error);
    }
}

#[test]
fn legacy_payload_with_garbage_field_is_rejected() {
    let err = decode_position("1.0,abc,3.0").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidNumber { ref value, .. } if value == "abc"));
    assert!(err.to_string().contains("abc"));
}

#[test]
fn padded_fields_are_accepted() {
    let pos = decode_position(" 1.5 ; 2 ;-3 ").unwrap();
    assert_eq!(pos, Position::new(1.5, 2.0, -3.0));
}
