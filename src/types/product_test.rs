use super::*;

#[test]
fn grib2_round_trips() {
    let p = Product::Grib2 { centre: 98, discipline: 0, category: 1, number: 11 };
    let mut buf = vec![];
    p.encode_body(&mut buf);
    assert_eq!(Product::decode_body(&buf).unwrap(), p);
    assert_eq!(p.to_text(), "GRIB2(98, 0, 1, 11)");
}

#[test]
fn bufr_round_trips() {
    let p = Product::Bufr { kind_type: 0, subtype: 2, localsubtype: 0 };
    let mut buf = vec![];
    p.encode_body(&mut buf);
    assert_eq!(Product::decode_body(&buf).unwrap(), p);
}
