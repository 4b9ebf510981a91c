use super::*;

#[test]
fn append_excludes_newline_from_reported_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2021.vm2");
    let mut seg = LineSegment::open(&path).unwrap();

    let (off, size) = seg.append(b"20210101,1,1,t,10.0").unwrap();
    assert_eq!(seg.read(off, size).unwrap(), b"20210101,1,1,t,10.0");
}

#[test]
fn scan_lines_rediscovers_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2021.vm2");
    let mut seg = LineSegment::open(&path).unwrap();
    seg.append(b"row one").unwrap();
    seg.append(b"row two").unwrap();

    let lines = seg.scan_lines().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(seg.read(lines[0].0, lines[0].1).unwrap(), b"row one");
    assert_eq!(seg.read(lines[1].0, lines[1].1).unwrap(), b"row two");
}
