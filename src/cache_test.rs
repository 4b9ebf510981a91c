use super::*;
use crate::types::{origin::Origin, Item, ItemSet};

fn summary_for(centre: u8) -> Summary {
    let mut set = ItemSet::new();
    set.set(Item::Origin(Origin::Grib1 { centre, subcentre: 0, process: 1 }));
    let mut s = Summary::new();
    s.add(&set, 100);
    s
}

#[test]
fn put_and_get_month_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SummaryCache::open(dir.path()).unwrap();
    cache.put_month(2021, 1, &summary_for(200)).unwrap();
    let got = cache.get_month(2021, 1).unwrap().unwrap();
    assert_eq!(got.total_count(), 1);
}

#[test]
fn put_month_invalidates_all() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SummaryCache::open(dir.path()).unwrap();
    cache.put_month(2021, 1, &summary_for(200)).unwrap();
    cache.rebuild_all().unwrap();
    assert!(cache.get_all().unwrap().is_some());

    cache.put_month(2021, 2, &summary_for(98)).unwrap();
    assert!(cache.get_all().unwrap().is_none());
}

#[test]
fn rebuild_all_merges_every_month() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SummaryCache::open(dir.path()).unwrap();
    cache.put_month(2021, 1, &summary_for(200)).unwrap();
    cache.put_month(2021, 2, &summary_for(98)).unwrap();
    let all = cache.rebuild_all().unwrap();
    assert_eq!(all.total_count(), 2);
}
