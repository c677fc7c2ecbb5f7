use foodorder_core::domain::{BatchId, RawOrder};
use foodorder_core::rules::tally_orders;
use foodorder_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn order(email: &str, meal: &str) -> RawOrder {
    RawOrder::new()
        .with_field("Timestamp", "2020-01-01")
        .with_field("Email Address", email)
        .with_field("meal", meal)
}

#[test]
fn add_then_latest_round_trips_rows_in_order() {
    let store = store();
    let orders = vec![
        order("a@x.com", "[Fafa] Salad").with_field("Comments", "extra spicy"),
        order("b@x.com", "[Sushi] Maki"),
        order("c@x.com", "[Fafa] Wrap"),
    ];

    let id = store
        .batches()
        .add(1_700_000_000, &orders, Some("omid"))
        .expect("add batch");
    assert_eq!(id, BatchId(1));

    let latest = store.batches().latest().expect("latest").expect("some batch");
    assert_eq!(latest.survey_data, orders);
    assert_eq!(latest.created_at, 1_700_000_000);
    assert_eq!(latest.username.as_deref(), Some("omid"));
    assert_eq!(tally_orders(&latest.survey_data).total_meals(), 3);
}

#[test]
fn latest_on_empty_store_is_none() {
    let store = store();
    assert!(store.batches().latest().expect("latest").is_none());
    assert!(store.batches().list().expect("list").is_empty());
    assert_eq!(store.batches().count().expect("count"), 0);
}

#[test]
fn empty_batch_persists_and_becomes_latest() {
    let store = store();
    store
        .batches()
        .add(1_700_000_000, &[order("a@x.com", "[Fafa] Salad")], None)
        .expect("add batch");
    store
        .batches()
        .add(1_700_000_100, &[], None)
        .expect("add empty batch");

    let latest = store.batches().latest().expect("latest").expect("some batch");
    assert!(latest.survey_data.is_empty());
    assert_eq!(store.batches().count().expect("count"), 2);
}

#[test]
fn list_is_newest_first_and_get_by_id() {
    let store = store();
    let first = store
        .batches()
        .add(1_700_000_000, &[order("a@x.com", "[Fafa] Salad")], Some("  "))
        .expect("add first");
    let second = store
        .batches()
        .add(1_700_000_100, &[order("b@x.com", "[Sushi] Maki")], Some("ada"))
        .expect("add second");

    let list = store.batches().list().expect("list");
    let ids: Vec<BatchId> = list.iter().map(|batch| batch.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(list.iter().all(|batch| !batch.archived && batch.title.is_none()));

    let fetched = store.batches().get(first).expect("get").expect("found");
    assert_eq!(fetched.survey_data[0].email(), Some("a@x.com"));
    assert!(fetched.username.is_none());

    assert!(store.batches().get(BatchId(99)).expect("get").is_none());
}
