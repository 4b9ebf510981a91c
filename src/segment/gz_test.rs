use super::*;

#[test]
fn append_then_read_round_trips_each_member() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("000001.grib1.gz");
    let mut seg = GzSegment::open(&path).unwrap();

    let (off1, sz1) = seg.append(b"first message payload").unwrap();
    let (off2, sz2) = seg.append(b"second message payload, a bit longer").unwrap();

    assert_eq!(seg.read(off1, sz1).unwrap(), b"first message payload");
    assert_eq!(seg.read(off2, sz2).unwrap(), b"second message payload, a bit longer");
}

#[test]
fn member_offsets_are_recorded_in_append_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("000002.grib1.gz");
    let mut seg = GzSegment::open(&path).unwrap();
    let (off1, _) = seg.append(b"a").unwrap();
    let (off2, _) = seg.append(b"b").unwrap();

    let offsets = seg.member_offsets().unwrap();
    assert_eq!(offsets, vec![off1, off2]);
}
