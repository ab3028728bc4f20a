//! Full-stack scenarios over the seeded store and the table pipeline,
//! wired the way the dashboard drives them.

use gestui::data::mock::seed_store;
use gestui::data::record::Value;
use gestui::modules::{self, Module};
use gestui::table::TableQuery;

#[test]
fn test_client_search_end_to_end() {
    let store = seed_store();
    let spec = modules::spec(Module::Clients);
    let mut table = TableQuery::new(10);

    // "activo" is a status query: only estado == "Activo" rows survive.
    table.set_search("activo");
    let view = table.view(store.rows(Module::Clients), &spec.search_keys);
    assert!(view.filtered_len > 0);
    for i in 0..view.page_len() {
        assert_eq!(view.record(i).unwrap().display("estado"), "Activo");
    }

    // A name fragment matches by substring across keys.
    table.set_search("gmail");
    let view = table.view(store.rows(Module::Clients), &spec.search_keys);
    assert!(view.filtered_len >= 4);
    for i in 0..view.page_len() {
        assert!(view.record(i).unwrap().display("correo").contains("gmail"));
    }
}

#[test]
fn test_money_search_in_purchases() {
    let store = seed_store();
    let spec = modules::spec(Module::Purchases);
    let mut table = TableQuery::new(10);

    // The seed has one purchase of $8,450.00; currency decoration in the
    // query must not matter.
    for query in ["8450", "$8,450", "8450.00"] {
        table.set_search(query);
        let view = table.view(store.rows(Module::Purchases), &spec.search_keys);
        assert_eq!(view.filtered_len, 1, "query {query}");
        assert_eq!(
            view.record(0).unwrap().get("monto"),
            Some(&Value::Money(8450.0))
        );
    }
}

#[test]
fn test_date_search_in_appointments() {
    let store = seed_store();
    let spec = modules::spec(Module::Appointments);
    let mut table = TableQuery::new(20);

    table.set_search("2026-08-10");
    let view = table.view(store.rows(Module::Appointments), &spec.search_keys);
    assert_eq!(view.filtered_len, 2);

    table.set_search("agosto 2026");
    let view = table.view(store.rows(Module::Appointments), &spec.search_keys);
    assert!(view.filtered_len >= 7);
}

#[test]
fn test_pagination_over_seeded_clients() {
    let store = seed_store();
    let spec = modules::spec(Module::Clients);
    let mut table = TableQuery::new(5);

    let view = table.view(store.rows(Module::Clients), &spec.search_keys);
    assert_eq!(view.filtered_len, 12);
    assert_eq!(view.total_pages, 3);

    // Walk every page and collect ids; nothing lost, nothing repeated.
    let mut ids = Vec::new();
    for page in 1..=view.total_pages {
        table.go_to(page as i64, 12);
        let view = table.view(store.rows(Module::Clients), &spec.search_keys);
        for i in 0..view.page_len() {
            ids.push(view.record(i).unwrap().id());
        }
    }
    assert_eq!(ids.len(), 12);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 12);
}

#[test]
fn test_mutation_flows_back_into_table() {
    let mut store = seed_store();
    let spec = modules::spec(Module::Categories);
    let mut table = TableQuery::new(10);

    let before = table
        .view(store.rows(Module::Categories), &spec.search_keys)
        .filtered_len;
    store.create(
        Module::Categories,
        vec![
            ("nombre".into(), Value::text("Temporal")),
            ("descripcion".into(), Value::text("Pruebas")),
            ("estado".into(), Value::status("Activo")),
        ],
    );
    // The table reads the owner's collection; the new row shows up on the
    // next derivation without any table-side bookkeeping.
    let after = table
        .view(store.rows(Module::Categories), &spec.search_keys)
        .filtered_len;
    assert_eq!(after, before + 1);
}
