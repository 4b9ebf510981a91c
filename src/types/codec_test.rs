use super::*;
use crate::types::KindCode;

#[test]
fn envelope_round_trips() {
    let mut buf = vec![];
    encode_envelope(KindCode::Origin, b"hello", &mut buf);
    let (kind, body, n) = decode_envelope(&buf).unwrap();
    assert_eq!(kind, KindCode::Origin);
    assert_eq!(body, b"hello");
    assert_eq!(n, buf.len());
}

#[test]
fn envelope_rejects_truncated_body() {
    let mut buf = vec![];
    encode_envelope(KindCode::Product, b"12345", &mut buf);
    buf.truncate(buf.len() - 2);
    assert!(decode_envelope(&buf).is_err());
}

#[test]
fn bundle_round_trips() {
    let mut buf = vec![];
    encode_bundle(BUNDLE_METADATA, b"payload", &mut buf);
    let (sig, version, body, n) = decode_bundle(&buf).unwrap();
    assert_eq!(&sig, BUNDLE_METADATA);
    assert_eq!(version, BUNDLE_VERSION);
    assert_eq!(body, b"payload");
    assert_eq!(n, buf.len());
}

#[test]
fn bundle_skips_leading_padding() {
    let mut buf = vec![0u8; 4];
    encode_bundle(BUNDLE_SUMMARY_ITEM, b"x", &mut buf);
    let (sig, _, body, n) = decode_bundle(&buf).unwrap();
    assert_eq!(&sig, BUNDLE_SUMMARY_ITEM);
    assert_eq!(body, b"x");
    assert_eq!(n, buf.len() - 4);
}
