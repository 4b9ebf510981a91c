use super::*;

#[test]
fn grib1_round_trips() {
    let l = Level::Grib1 { kind_type: 100, l1: 850, l2: 0 };
    let mut buf = vec![];
    l.encode_body(&mut buf);
    assert_eq!(Level::decode_body(&buf).unwrap(), l);
    assert_eq!(l.to_text(), "GRIB1(100, 850, 0)");
}

#[test]
fn grib2s_handles_negative_scale() {
    let l = Level::Grib2S { kind_type: 103, scale: -2, value: -150 };
    let mut buf = vec![];
    l.encode_body(&mut buf);
    assert_eq!(Level::decode_body(&buf).unwrap(), l);
}

#[test]
fn grib2d_round_trips() {
    let l = Level::Grib2D {
        kind_type1: 100,
        scale1: 0,
        value1: 1000,
        kind_type2: 100,
        scale2: 0,
        value2: 500,
    };
    let mut buf = vec![];
    l.encode_body(&mut buf);
    assert_eq!(Level::decode_body(&buf).unwrap(), l);
}
