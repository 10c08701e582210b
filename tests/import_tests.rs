//! Bulk import pipeline: batching, countdown, cancellation, confirmation.

mod common;

use common::{MockCatalog, TestHarness, catalog_episode, catalog_show};
use showarr::domain::events::NotificationEvent;
use showarr::services::NameResolution;
use tokio_util::sync::CancellationToken;

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("show {i}")).collect()
}

#[tokio::test(start_paused = true)]
async fn twenty_three_names_make_two_batches_with_one_wait() {
    let mut catalog = MockCatalog::default();
    for i in 0..23 {
        let id = 100 + i32::try_from(i).unwrap();
        catalog = catalog
            .with_show(catalog_show(id, &format!("Show {i}"), "Running"), vec![])
            .with_search(&format!("show {i}"), vec![id]);
    }
    let harness = TestHarness::new(catalog).await;
    let mut events = harness.events.subscribe();

    let import = harness.import(20, 5);
    let cancel = CancellationToken::new();
    let results = import.resolve_names(&names(23), &cancel).await;

    assert_eq!(results.len(), 23);
    assert!(results.iter().all(|r| matches!(r, NameResolution::Found(_))));
    assert_eq!(harness.catalog.call_count(), 23);

    // Replay the event stream: two batch starts, all countdown ticks in
    // between, and none after the second batch began.
    let mut batch_starts = Vec::new();
    let mut ticks_after_last_batch = 0usize;
    let mut total_ticks = 0usize;
    while let Ok(event) = events.try_recv() {
        match event {
            NotificationEvent::ImportBatchStarted { batch, .. } => batch_starts.push(batch),
            NotificationEvent::ImportCountdownTick { .. } => {
                total_ticks += 1;
                if batch_starts.len() == 2 {
                    ticks_after_last_batch += 1;
                }
            }
            _ => {}
        }
    }

    assert_eq!(batch_starts, vec![1, 2]);
    assert_eq!(total_ticks, 5);
    assert_eq!(ticks_after_last_batch, 0);
}

#[tokio::test(start_paused = true)]
async fn single_batch_has_no_wait_at_all() {
    let mut catalog = MockCatalog::default();
    for i in 0..3 {
        let id = 100 + i32::try_from(i).unwrap();
        catalog = catalog
            .with_show(catalog_show(id, &format!("Show {i}"), "Running"), vec![])
            .with_search(&format!("show {i}"), vec![id]);
    }
    let harness = TestHarness::new(catalog).await;
    let mut events = harness.events.subscribe();

    let import = harness.import(20, 5);
    let cancel = CancellationToken::new();
    let results = import.resolve_names(&names(3), &cancel).await;
    assert_eq!(results.len(), 3);

    while let Ok(event) = events.try_recv() {
        assert!(!matches!(event, NotificationEvent::ImportCountdownTick { .. }));
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_mid_batch_stops_further_calls() {
    let mut catalog = MockCatalog::default();
    for i in 0..10 {
        let id = 100 + i32::try_from(i).unwrap();
        catalog = catalog
            .with_show(catalog_show(id, &format!("Show {i}"), "Running"), vec![])
            .with_search(&format!("show {i}"), vec![id]);
    }

    let cancel = CancellationToken::new();
    *catalog.cancel_after.lock().unwrap() = Some((4, cancel.clone()));

    let harness = TestHarness::new(catalog).await;
    let import = harness.import(20, 5);
    let results = import.resolve_names(&names(10), &cancel).await;

    // The fourth call trips the token while in flight: it finishes but its
    // result is discarded, nothing further is issued, and every unresolved
    // name is tagged cancelled.
    assert_eq!(harness.catalog.call_count(), 4);
    assert_eq!(results.len(), 10);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, NameResolution::Found(_)))
            .count(),
        3
    );
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, NameResolution::Cancelled { .. }))
            .count(),
        7
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_countdown_aborts_the_wait() {
    let mut catalog = MockCatalog::default();
    for i in 0..4 {
        let id = 100 + i32::try_from(i).unwrap();
        catalog = catalog
            .with_show(catalog_show(id, &format!("Show {i}"), "Running"), vec![])
            .with_search(&format!("show {i}"), vec![id]);
    }

    let harness = TestHarness::new(catalog).await;
    let import = harness.import(2, 30);

    let cancel = CancellationToken::new();
    // Batch one finishes without any timers; the token fires mid-countdown
    // at 1.5s, between the first and second tick.
    let trip = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        trip.cancel();
    });

    let results = import.resolve_names(&names(4), &cancel).await;

    // Only batch one ever reached the catalog.
    assert_eq!(harness.catalog.call_count(), 2);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, NameResolution::Found(_)))
            .count(),
        2
    );
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, NameResolution::Cancelled { .. }))
            .count(),
        2
    );
}

#[tokio::test]
async fn numeric_names_resolve_by_id_with_search_fallback() {
    let catalog = MockCatalog::default()
        .with_show(catalog_show(82, "Game of Thrones", "Ended"), vec![])
        .with_show(catalog_show(500, "The 100", "Running"), vec![])
        .with_search("100", vec![500]);
    let harness = TestHarness::new(catalog).await;

    let import = harness.import(20, 0);
    let cancel = CancellationToken::new();
    let results = import
        .resolve_names(
            &["82".to_string(), "100".to_string(), "31337".to_string()],
            &cancel,
        )
        .await;

    // Direct id hit.
    let NameResolution::Found(first) = &results[0] else {
        panic!("expected id lookup hit");
    };
    assert_eq!(first.show.id, 82);
    assert_eq!(first.search_name, "82");

    // Id miss falls back to a name search.
    let NameResolution::Found(second) = &results[1] else {
        panic!("expected search fallback hit");
    };
    assert_eq!(second.show.id, 500);

    // Id miss and no search hits.
    assert!(matches!(&results[2], NameResolution::NotFound { search_name } if search_name == "31337"));
}

#[tokio::test]
async fn unresolvable_names_are_not_found_and_keep_their_search_name() {
    let harness = TestHarness::new(MockCatalog::default()).await;
    let import = harness.import(20, 0);
    let cancel = CancellationToken::new();

    let results = import
        .resolve_names(&["does not exist".to_string()], &cancel)
        .await;

    assert!(
        matches!(&results[0], NameResolution::NotFound { search_name } if search_name == "does not exist")
    );
}

#[tokio::test]
async fn confirmed_imports_isolate_per_show_failures() {
    let mut catalog = MockCatalog::default()
        .with_show(
            catalog_show(1, "Good", "Running"),
            vec![catalog_episode(10, 1, 1, "One")],
        )
        .with_show(catalog_show(2, "Bad cast", "Running"), vec![]);
    catalog.fail_cast.insert(2);

    let harness = TestHarness::new(catalog).await;
    let import = harness.import(20, 0);

    let selections = vec![
        showarr::services::ResolvedName {
            search_name: "good".to_string(),
            show: catalog_show(1, "Good", "Running"),
        },
        showarr::services::ResolvedName {
            search_name: "bad".to_string(),
            show: catalog_show(2, "Bad cast", "Running"),
        },
    ];

    let summary = import.import_confirmed(&selections).await.expect("import");

    assert_eq!(summary.added.len(), 1);
    assert_eq!(summary.added[0].id, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].show_id, 2);

    let episodes = harness.store.episodes_for_show(1).await.unwrap();
    assert_eq!(episodes.len(), 1);
}

#[tokio::test]
async fn importing_an_already_tracked_show_fails_softly() {
    let catalog = MockCatalog::default().with_show(catalog_show(1, "Dark", "Running"), vec![]);
    let harness = TestHarness::new(catalog).await;
    harness.seed_show(1, "Dark", "Running").await;

    let import = harness.import(20, 0);
    let selections = vec![showarr::services::ResolvedName {
        search_name: "dark".to_string(),
        show: catalog_show(1, "Dark", "Running"),
    }];

    let summary = import.import_confirmed(&selections).await.expect("import");

    assert!(summary.added.is_empty());
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].error, "already tracked");
}
