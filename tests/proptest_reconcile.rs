//! Property-based tests for collection reconciliation, paging and list decoding
//!
//! Collections are generated with unique ids in server order; the
//! reconcile helpers must keep that order and touch only the target id.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use proptest::prelude::*;
use serde_json::{json, Value};
use tclub::api::ListResponse;
use tclub::calendar::round_up_to_quarter;
use tclub::model::Team;
use tclub::page::{append_created, remove_by_id, replace_updated, Pager};

fn team(id: i64, name: &str) -> Team {
    serde_json::from_value(json!({"id": id, "name": name})).unwrap()
}

/// Teams with distinct ids in random order
fn arb_collection() -> impl Strategy<Value = Vec<Team>> {
    prop::collection::btree_set(1i64..500, 0..40)
        .prop_flat_map(|ids| {
            let ids: Vec<i64> = ids.into_iter().collect();
            Just(ids).prop_shuffle()
        })
        .prop_map(|ids| {
            ids.into_iter()
                .map(|id| team(id, &format!("Team {}", id)))
                .collect()
        })
}

fn ids(items: &[Team]) -> Vec<i64> {
    items.iter().map(|t| t.id).collect()
}

// =============================================================================
// Reconciliation
// =============================================================================

proptest! {
    #[test]
    fn created_entity_is_listed_once(items in arb_collection(), id in 1i64..600) {
        let mut after = items.clone();
        append_created(&mut after, team(id, "U12 Reds"));

        let matching: Vec<&Team> = after.iter().filter(|t| t.id == id).collect();
        prop_assert_eq!(matching.len(), 1);
        prop_assert_eq!(matching[0].name.as_str(), "U12 Reds");

        let others: Vec<i64> = ids(&after).into_iter().filter(|i| *i != id).collect();
        let before: Vec<i64> = ids(&items).into_iter().filter(|i| *i != id).collect();
        prop_assert_eq!(others, before);
    }

    #[test]
    fn update_touches_only_its_target(items in arb_collection(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!items.is_empty());
        let target = items[pick.index(items.len())].id;

        let mut after = items.clone();
        prop_assert!(replace_updated(&mut after, team(target, "Renamed")));

        prop_assert_eq!(ids(&after), ids(&items));
        for (old, new) in items.iter().zip(after.iter()) {
            if old.id == target {
                prop_assert_eq!(new.name.as_str(), "Renamed");
            } else {
                prop_assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn update_of_unlisted_id_changes_nothing(items in arb_collection()) {
        let mut after = items.clone();
        prop_assert!(!replace_updated(&mut after, team(900, "Ghost")));
        prop_assert_eq!(after, items);
    }

    #[test]
    fn delete_drops_exactly_the_target(items in arb_collection(), id in 1i64..600) {
        let present = items.iter().any(|t| t.id == id);
        let mut after = items.clone();
        let removed = remove_by_id(&mut after, id);

        prop_assert!(after.iter().all(|t| t.id != id));
        prop_assert_eq!(removed, usize::from(present));
        prop_assert_eq!(after.len(), items.len() - removed);

        let kept: Vec<i64> = ids(&items).into_iter().filter(|i| *i != id).collect();
        prop_assert_eq!(ids(&after), kept);
    }
}

// =============================================================================
// Paging
// =============================================================================

proptest! {
    #[test]
    fn pages_cover_collection_once(len in 0usize..200, per_page in 1usize..25) {
        let mut pager = Pager::new(per_page);
        prop_assert_eq!(pager.total_pages(len), len.div_ceil(per_page).max(1));

        let mut seen = 0;
        loop {
            let range = pager.range(len);
            prop_assert!(range.len() <= per_page);
            prop_assert_eq!(range.start, seen);
            seen = range.end;
            if !pager.next(len) {
                break;
            }
        }
        prop_assert_eq!(seen, len);
    }

    #[test]
    fn clamp_keeps_page_in_range(
        before in 0usize..200,
        after in 0usize..200,
        per_page in 1usize..25,
        steps in 0usize..20,
    ) {
        let mut pager = Pager::new(per_page);
        for _ in 0..steps {
            pager.next(before);
        }
        let page_before = pager.page();

        pager.clamp(after);

        prop_assert!(pager.page() < pager.total_pages(after));
        prop_assert!(pager.page() <= page_before);
    }
}

// =============================================================================
// List decoding
// =============================================================================

proptest! {
    #[test]
    fn envelope_and_array_agree(names in prop::collection::vec("[A-Z][a-z]{2,10}", 0..20)) {
        let items: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({"id": i, "name": name}))
            .collect();

        let total = items.len();
        let bare = ListResponse::from_value(Value::Array(items.clone())).into_items();
        let wrapped = ListResponse::from_value(json!({"items": items, "total": total})).into_items();

        prop_assert_eq!(bare, wrapped);
    }

    #[test]
    fn scalars_are_unrecognized(n in any::<i64>(), s in ".*") {
        prop_assert_eq!(ListResponse::from_value(json!(n)), ListResponse::Unrecognized);
        prop_assert_eq!(ListResponse::from_value(json!(s)), ListResponse::Unrecognized);
        let no_items = json!({"total": n});
        prop_assert!(ListResponse::from_value(no_items).into_items().is_empty());
    }
}

// =============================================================================
// Calendar slots
// =============================================================================

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (0u32..365, 0u32..24, 0u32..60, 0u32..60).prop_map(|(day, h, m, s)| {
        NaiveDate::from_yo_opt(2026, day + 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    })
}

proptest! {
    #[test]
    fn quarter_rounding_is_minimal(ts in arb_datetime()) {
        let rounded = round_up_to_quarter(ts);
        let minute = ts.with_second(0).unwrap();

        prop_assert!(rounded >= minute);
        prop_assert!(rounded - minute < chrono::Duration::minutes(15));
        prop_assert_eq!(rounded.minute() % 15, 0);
        prop_assert_eq!(rounded.second(), 0);
    }
}
