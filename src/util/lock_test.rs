use super::*;

#[test]
fn second_try_acquire_fails_while_held() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("writer.lock");

    let first = WriterLock::acquire(&path).unwrap();
    let second = WriterLock::try_acquire(&path).unwrap();
    assert!(second.is_none());

    drop(first);
    let third = WriterLock::try_acquire(&path).unwrap();
    assert!(third.is_some());
}

#[test]
fn sequence_lock_runs_closure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".sequence");
    let got = with_sequence_lock(&path, |_f| Ok(42)).unwrap();
    assert_eq!(got, 42);
}
