use super::*;
use crate::types::{origin::Origin, product::Product, reftime::Reftime};
use chrono::NaiveDate;

fn sample_set() -> ItemSet {
    let mut set = ItemSet::new();
    set.set(Item::Origin(Origin::Grib1 { centre: 200, subcentre: 0, process: 1 }));
    set.set(Item::Product(Product::Grib1 { origin: 200, table: 2, product: 11 }));
    set.set(Item::Reftime(Reftime::Position(
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
    )));
    set
}

#[test]
fn encode_decode_round_trips() {
    let set = sample_set();
    let buf = set.encode();
    let got = ItemSet::decode(&buf).unwrap();
    assert_eq!(got, set);
}

#[test]
fn at_most_one_item_per_kind() {
    let mut set = ItemSet::new();
    set.set(Item::Origin(Origin::Grib1 { centre: 1, subcentre: 0, process: 0 }));
    set.set(Item::Origin(Origin::Grib1 { centre: 2, subcentre: 0, process: 0 }));
    assert_eq!(set.iter().count(), 1);
    assert_eq!(set.get(KindCode::Origin), Some(&Item::Origin(Origin::Grib1 { centre: 2, subcentre: 0, process: 0 })));
}

#[test]
fn ordering_follows_scan_order_not_insertion_order() {
    let mut a = ItemSet::new();
    a.set(Item::Product(Product::Grib1 { origin: 1, table: 1, product: 1 }));
    a.set(Item::Origin(Origin::Grib1 { centre: 1, subcentre: 0, process: 0 }));

    let mut b = ItemSet::new();
    b.set(Item::Origin(Origin::Grib1 { centre: 2, subcentre: 0, process: 0 }));
    b.set(Item::Product(Product::Grib1 { origin: 1, table: 1, product: 1 }));

    assert!(a < b, "origin (scanned first) should dominate the comparison");
}

#[test]
fn project_keeps_only_requested_kinds() {
    let set = sample_set();
    let projected = set.project(&[KindCode::Origin]);
    assert!(projected.get(KindCode::Origin).is_some());
    assert!(projected.get(KindCode::Product).is_none());
}
