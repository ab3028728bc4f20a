//! End-to-end properties of the filter → paginate → window pipeline.

use gestui::data::record::{Record, RowId, Value};
use gestui::table::{Matcher, Pager, RowWindow, SearchKey, TableQuery};

fn client(id: RowId, nombre: &str, estado: &str) -> Record {
    Record::new(id)
        .with("nombre", Value::text(nombre))
        .with("estado", Value::status(estado))
}

fn keys() -> Vec<SearchKey> {
    vec![SearchKey::new("nombre"), SearchKey::new("estado")]
}

#[test]
fn test_substring_matches_any_searchable_key() {
    let rows = vec![
        client(1, "Juan Pérez", "Activo"),
        client(2, "Ana Torres", "Inactivo"),
        client(3, "Juana Ruiz", "Activo"),
    ];
    let mut table = TableQuery::new(10);
    table.set_search("juan");
    let view = table.view(&rows, &keys());
    let ids: Vec<RowId> = (0..view.page_len())
        .map(|i| view.record(i).unwrap().id())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_exact_status_query_excludes_inactive() {
    // Spec scenario: query "activo" must match only the record whose
    // estado is exactly "Activo", never "Inactivo".
    let rows = vec![client(1, "Juan", "Activo"), client(2, "Ana", "Inactivo")];
    let mut table = TableQuery::new(10);
    table.set_search("activo");
    let view = table.view(&rows, &keys());
    assert_eq!(view.filtered_len, 1);
    assert_eq!(view.record(0).unwrap().id(), 1);

    table.set_search("inactivo");
    let view = table.view(&rows, &keys());
    assert_eq!(view.filtered_len, 1);
    assert_eq!(view.record(0).unwrap().id(), 2);
}

#[test]
fn test_pagination_totality() {
    // Concatenating every page reproduces the collection exactly.
    for (n, p) in [(23usize, 8usize), (0, 5), (10, 10), (11, 10), (1, 1)] {
        let pager = Pager::new(p);
        assert_eq!(pager.total_pages(n), n.div_ceil(p).max(1));

        let mut pager = Pager::new(p);
        let mut seen = Vec::new();
        for page in 1..=pager.total_pages(n) {
            pager.go_to(page as i64, n);
            seen.extend(pager.bounds(n));
        }
        assert_eq!(seen, (0..n).collect::<Vec<_>>(), "N={n} P={p}");
    }
}

#[test]
fn test_go_to_clamps_everything() {
    let mut pager = Pager::new(8);
    for request in [-100i64, -1, 0, 1, 2, 3, 4, 10, 1000] {
        let page = pager.go_to(request, 23);
        assert!((1..=3).contains(&page), "go_to({request}) -> {page}");
    }
}

#[test]
fn test_spec_scenario_23_rows_page_size_8() {
    let rows: Vec<Record> = (1..=23)
        .map(|i| client(i, &format!("Cliente {i}"), "Activo"))
        .collect();
    let mut table = TableQuery::new(8);
    let view = table.view(&rows, &keys());
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.page_len(), 8);

    table.go_to(3, view.filtered_len);
    let view = table.view(&rows, &keys());
    assert_eq!(view.page_len(), 7);

    table.go_to(10, view.filtered_len);
    let view = table.view(&rows, &keys());
    assert_eq!(view.page, 3);
}

#[test]
fn test_search_reset_from_deep_page() {
    // Page 3 of 5, then a search that shrinks the result to one page:
    // the table must land on page 1, never an empty page 3.
    let rows: Vec<Record> = (1..=50)
        .map(|i| {
            let nombre = if i == 7 { "Único".to_string() } else { format!("Cliente {i}") };
            client(i, &nombre, "Activo")
        })
        .collect();
    let mut table = TableQuery::new(10);
    table.go_to(3, 50);
    assert_eq!(table.page(), 3);

    table.set_search("único");
    let view = table.view(&rows, &keys());
    assert_eq!(view.page, 1);
    assert_eq!(view.filtered_len, 1);
    assert_eq!(view.record(0).unwrap().id(), 7);
}

#[test]
fn test_window_is_contiguous_subset_of_page() {
    let rows: Vec<Record> = (0..40).map(|i| client(i, &format!("Fila {i}"), "Activo")).collect();
    let mut table = TableQuery::new(25);
    table.set_geometry(1, 6);

    for scroll in [0usize, 3, 10, 19, 24, 500] {
        table.scroll_to(scroll, 25);
        let view = table.view(&rows, &keys());
        let window: Vec<usize> = view.window_range.clone().collect();
        assert!(window.len() <= 6);
        assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
        assert!(window.iter().all(|i| *i < view.page_len()));
    }
}

#[test]
fn test_declared_matchers_match_formatted_values() {
    let rows = vec![Record::new(1)
        .with("monto", Value::Money(7250.0))
        .with(
            "fecha",
            Value::Date(chrono::NaiveDate::from_ymd_opt(2026, 7, 25).unwrap()),
        )];
    let search_keys = vec![
        SearchKey::new("monto").with_matcher(Matcher::Numeric),
        SearchKey::new("fecha").with_matcher(Matcher::Date),
    ];
    for query in ["7250", "$7,250.00", "7250.00", "2026-07-25", "julio 2026", "25/07/2026"] {
        let mut table = TableQuery::new(10);
        table.set_search(query);
        let view = table.view(&rows, &search_keys);
        assert_eq!(view.filtered_len, 1, "query {query}");
    }
}

#[test]
fn test_virtual_window_never_affects_page_membership() {
    let rows: Vec<Record> = (0..30).map(|i| client(i, &format!("Fila {i}"), "Activo")).collect();
    let mut table = TableQuery::new(30);
    table.set_geometry(1, 5);
    table.scroll_to(12, 30);
    let view = table.view(&rows, &keys());
    // Scrolling moved the window but the page still covers everything.
    assert_eq!(view.page_len(), 30);
    assert_eq!(view.window_range, 12..17);
}

#[test]
fn test_row_window_scrollbar_geometry() {
    let window = RowWindow::new(3, 4);
    // 10 cards of height 3: logical height 30, viewport shows 12.
    assert_eq!(window.content_height(10), 30);
    assert_eq!(window.max_scroll(10), 18);
    assert_eq!(window.window(9, 10), 3..7);
}
