//! Byte-exact wire matrices for the encoder and decoder.

use mpack::{pack, unpack, DecodeError, PackOptions, UnpackOptions, Value};

fn enc(value: Value) -> Vec<u8> {
    pack(&value, &PackOptions::default()).unwrap()
}

fn dec(bytes: &[u8]) -> Value {
    unpack(bytes, &UnpackOptions::default()).unwrap()
}

fn assert_round_trip(value: Value, expected: &[u8]) {
    let bytes = enc(value.clone());
    assert_eq!(bytes, expected, "encoding {value:?}");
    assert_eq!(dec(&bytes), value, "decoding {expected:?}");
}

#[test]
fn scalars() {
    assert_round_trip(Value::Nil, &[0xc0]);
    assert_round_trip(Value::Bool(false), &[0xc2]);
    assert_round_trip(Value::Bool(true), &[0xc3]);
}

#[test]
fn integer_boundaries_take_minimal_width() {
    let cases: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7f]),
        (128, &[0xcc, 0x80]),
        (255, &[0xcc, 0xff]),
        (256, &[0xcd, 0x01, 0x00]),
        (65535, &[0xcd, 0xff, 0xff]),
        (65536, &[0xce, 0x00, 0x01, 0x00, 0x00]),
        (
            4294967296,
            &[0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00],
        ),
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0xd0, 0xdf]),
        (-128, &[0xd0, 0x80]),
        (-129, &[0xd1, 0xff, 0x7f]),
        (-32768, &[0xd1, 0x80, 0x00]),
        (-32769, &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
        (
            i64::MIN,
            &[0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ),
    ];
    for (value, expected) in cases {
        assert_round_trip(Value::Int(*value), expected);
    }
}

#[test]
fn uint_and_int_agree_within_shared_range() {
    for n in [0u64, 1, 127, 128, 65536, i64::MAX as u64] {
        assert_eq!(enc(Value::UInt(n)), enc(Value::Int(n as i64)));
    }
    let mut expected = vec![0xcf];
    expected.extend_from_slice(&u64::MAX.to_be_bytes());
    assert_eq!(enc(Value::UInt(u64::MAX)), expected);
    assert_eq!(dec(&expected), Value::UInt(u64::MAX));
}

#[test]
fn floats_always_encode_as_double() {
    assert_round_trip(
        Value::Float(0.0),
        &[0xcb, 0, 0, 0, 0, 0, 0, 0, 0],
    );
    assert_round_trip(
        Value::Float(1.5),
        &[0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0],
    );
    // float32 input still decodes.
    assert_eq!(dec(&[0xca, 0x3f, 0xc0, 0, 0]), Value::Float(1.5));
}

#[test]
fn string_header_families() {
    assert_round_trip(Value::Str(String::new()), &[0xa0]);
    assert_round_trip(Value::Str("a".into()), &[0xa1, 0x61]);
    assert_round_trip(Value::Str("hi".into()), &[0xa2, b'h', b'i']);

    let s31 = "a".repeat(31);
    let mut expected = vec![0xbf];
    expected.extend_from_slice(s31.as_bytes());
    assert_round_trip(Value::Str(s31), &expected);

    let s32 = "a".repeat(32);
    let mut expected = vec![0xd9, 32];
    expected.extend_from_slice(s32.as_bytes());
    assert_round_trip(Value::Str(s32), &expected);

    let s256 = "a".repeat(256);
    let mut expected = vec![0xda, 0x01, 0x00];
    expected.extend_from_slice(s256.as_bytes());
    assert_round_trip(Value::Str(s256), &expected);

    let s65536 = "a".repeat(65536);
    let bytes = enc(Value::Str(s65536));
    assert_eq!(&bytes[..5], &[0xdb, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn binary_uses_bin_family() {
    assert_round_trip(Value::Bin(vec![]), &[0xc4, 0x00]);
    assert_round_trip(Value::Bin(vec![0xff, 0x00]), &[0xc4, 0x02, 0xff, 0x00]);
    let b256 = vec![7u8; 256];
    let bytes = enc(Value::Bin(b256));
    assert_eq!(&bytes[..3], &[0xc5, 0x01, 0x00]);
}

#[test]
fn container_header_families() {
    assert_round_trip(Value::Array(vec![]), &[0x90]);
    assert_round_trip(
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        &[0x93, 0x01, 0x02, 0x03],
    );
    let a16 = Value::Array(vec![Value::Nil; 16]);
    let bytes = enc(a16);
    assert_eq!(&bytes[..3], &[0xdc, 0x00, 0x10]);

    assert_round_trip(Value::Map(vec![]), &[0x80]);
    assert_round_trip(
        Value::Map(vec![(Value::Str("k".into()), Value::Int(1))]),
        &[0x81, 0xa1, b'k', 0x01],
    );
    let m16 = Value::Map((0..16).map(|i| (Value::Int(i), Value::Nil)).collect());
    let bytes = enc(m16);
    assert_eq!(&bytes[..3], &[0xde, 0x00, 0x10]);
}

#[test]
fn map_preserves_order_and_duplicate_keys() {
    let map = Value::Map(vec![
        (Value::Str("k".into()), Value::Int(1)),
        (Value::Str("k".into()), Value::Int(2)),
    ]);
    let bytes = enc(map.clone());
    assert_eq!(dec(&bytes), map);
}

#[test]
fn nested_structure_round_trips() {
    let value = Value::Map(vec![
        (
            Value::Str("list".into()),
            Value::Array(vec![
                Value::Int(-33),
                Value::Float(2.5),
                Value::Bin(vec![1, 2, 3]),
            ]),
        ),
        (
            Value::Str("inner".into()),
            Value::Map(vec![(Value::Str("ok".into()), Value::Bool(true))]),
        ),
    ]);
    assert_eq!(dec(&enc(value.clone())), value);
}

#[test]
fn compatibility_mode_emits_legacy_raw_headers() {
    let options = PackOptions {
        compatibility_mode: true,
    };

    // 40-byte string: str8 is suppressed, raw16 is used instead.
    let s40 = "a".repeat(40);
    let bytes = pack(&Value::Str(s40.clone()), &options).unwrap();
    assert_eq!(&bytes[..3], &[0xda, 0x00, 0x28]);
    assert_eq!(dec(&bytes), Value::Str(s40));

    // Short strings still use fixraw, identical to fixstr.
    assert_eq!(pack(&Value::Str("hi".into()), &options).unwrap(), [0xa2, b'h', b'i']);

    // Binary degrades to the raw family and round-trips as Str when the
    // bytes happen to be UTF-8.
    let bytes = pack(&Value::Bin(b"abc".to_vec()), &options).unwrap();
    assert_eq!(bytes, [0xa3, b'a', b'b', b'c']);
}

#[test]
fn big_int_encodes_within_64_bit_range_only() {
    assert_eq!(
        enc(Value::BigInt(-129)),
        enc(Value::Int(-129)),
    );
    assert_eq!(
        enc(Value::BigInt(u64::MAX as i128)),
        enc(Value::UInt(u64::MAX)),
    );
    assert!(pack(
        &Value::BigInt(u64::MAX as i128 + 1),
        &PackOptions::default()
    )
    .is_err());
    assert!(pack(
        &Value::BigInt(i64::MIN as i128 - 1),
        &PackOptions::default()
    )
    .is_err());
}

#[test]
fn prepacked_bytes_pass_through_verbatim() {
    let blob = enc(Value::Array(vec![Value::Int(1)]));
    let value = Value::Array(vec![Value::Prepacked(blob.clone()), Value::Nil]);
    let mut expected = vec![0x92];
    expected.extend_from_slice(&blob);
    expected.push(0xc0);
    assert_eq!(enc(value), expected);
}

#[test]
fn reserved_marker_is_rejected_with_offset() {
    assert!(matches!(
        unpack(&[0xc1], &UnpackOptions::default()),
        Err(DecodeError::IllegalByte(0))
    ));
    assert!(matches!(
        unpack(&[0x92, 0x01, 0xc1], &UnpackOptions::default()),
        Err(DecodeError::IllegalByte(2))
    ));
}

#[test]
fn invalid_utf8_distinguished_from_underflow() {
    assert!(matches!(
        unpack(&[0xa2, 0xc3], &UnpackOptions::default()),
        Err(DecodeError::Underflow)
    ));
    assert!(matches!(
        unpack(&[0xa2, 0xc3, 0xc3], &UnpackOptions::default()),
        Err(DecodeError::InvalidUtf8)
    ));
}

#[test]
fn symbolized_keys_round_trip_through_str_encoding() {
    let bytes = [0x81, 0xa1, b'k', 0x01];
    let options = UnpackOptions {
        symbolize_keys: true,
        ..Default::default()
    };
    let value = unpack(&bytes, &options).unwrap();
    let expected = Value::Map(vec![(Value::Sym("k".into()), Value::Int(1))]);
    assert_eq!(value, expected);
    // Sym encodes identically to Str.
    assert_eq!(enc(expected), bytes);
}
