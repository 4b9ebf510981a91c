use super::*;

#[test]
fn append_assigns_increasing_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut seg = DirSegment::open(dir.path()).unwrap();

    let (id1, _) = seg.append(b"one").unwrap();
    let (id2, _) = seg.append(b"two").unwrap();
    assert_eq!(id1, 0);
    assert_eq!(id2, 1);

    assert_eq!(seg.read(id1, 3).unwrap(), b"one");
    assert_eq!(seg.read(id2, 3).unwrap(), b"two");
}

#[test]
fn read_rejects_size_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let mut seg = DirSegment::open(dir.path()).unwrap();
    let (id, _) = seg.append(b"hello").unwrap();
    assert!(seg.read(id, 999).is_err());
}
