use super::*;

#[test]
fn preserves_order() {
    let n = Note {
        entries: vec![
            NoteEntry { timestamp: 100, text: "scanned".into() },
            NoteEntry { timestamp: 200, text: "repacked".into() },
        ],
    };
    let mut buf = vec![];
    n.encode_body(&mut buf);
    let got = Note::decode_body(&buf).unwrap();
    assert_eq!(got, n);
    assert_eq!(got.entries[0].text, "scanned");
}
