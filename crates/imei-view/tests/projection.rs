//! Property and scenario tests for the view projection.

use chrono::{TimeZone, Utc};
use imei_model::{Estado, Record, RecordId, StateFilter};
use imei_view::{ViewFilter, project};
use proptest::prelude::*;

fn record(id: u64, imei: &str, estado: Estado) -> Record {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    Record {
        id: RecordId::from(id),
        imei: imei.to_string(),
        estado,
        created_at: at,
        updated_at: at,
    }
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(("[0-9]{4,15}", any::<bool>()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (imei, sold))| {
                let estado = if sold { Estado::Sold } else { Estado::Free };
                record(i as u64 + 1, &imei, estado)
            })
            .collect()
    })
}

fn arb_filter() -> impl Strategy<Value = StateFilter> {
    prop_oneof![
        Just(StateFilter::All),
        Just(StateFilter::Free),
        Just(StateFilter::Sold),
    ]
}

proptest! {
    #[test]
    fn projection_is_an_order_preserving_subset(
        records in arb_records(),
        filter in arb_filter(),
        search in "[0-9]{0,3}",
    ) {
        let visible = project(&records, filter, &search);
        // Every visible record is one of the inputs, in input order.
        let mut cursor = records.iter();
        for shown in &visible {
            prop_assert!(cursor.any(|r| std::ptr::eq(r, *shown)));
            prop_assert!(filter.matches(shown.estado));
            prop_assert!(shown.imei.ends_with(&search));
        }
    }

    #[test]
    fn projection_is_idempotent(
        records in arb_records(),
        filter in arb_filter(),
        search in "[0-9]{0,3}",
    ) {
        let view_filter = ViewFilter::new(filter, search.clone());
        let once = project(&records, filter, &search);
        let twice = view_filter.apply(once.iter().copied());
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn status_filter_keeps_sold_records_in_order() {
    let records = vec![
        record(1, "101", Estado::Free),
        record(2, "102", Estado::Sold),
        record(3, "103", Estado::Free),
        record(4, "104", Estado::Sold),
        record(5, "105", Estado::Free),
    ];
    let sold = project(&records, StateFilter::Sold, "");
    let imeis: Vec<&str> = sold.iter().map(|r| r.imei.as_str()).collect();
    assert_eq!(imeis, vec!["102", "104"]);
}

#[test]
fn suffix_search_matches_trailing_digits() {
    let records = vec![record(1, "1234567890123", Estado::Free)];
    assert_eq!(project(&records, StateFilter::All, "0123").len(), 1);
    assert!(project(&records, StateFilter::All, "9999").is_empty());
}

#[test]
fn empty_collection_projects_to_empty_view() {
    assert!(project(&[], StateFilter::Sold, "12").is_empty());
}
