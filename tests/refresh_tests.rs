//! Batch refresh orchestration: selection, ignore union, failure isolation.

mod common;

use common::{MockCatalog, TestHarness, catalog_episode, catalog_show};
use showarr::domain::ShowId;

#[tokio::test]
async fn one_failing_show_does_not_halt_the_batch() {
    let catalog = MockCatalog::default()
        .with_show(
            catalog_show(1, "Alpha", "Running"),
            vec![catalog_episode(10, 1, 1, "One")],
        )
        .with_show(
            catalog_show(2, "Beta", "Running"),
            vec![catalog_episode(20, 1, 1, "One")],
        )
        .with_show(
            catalog_show(3, "Gamma", "Running"),
            vec![catalog_episode(30, 1, 1, "One")],
        )
        .failing_show(2);
    let harness = TestHarness::new(catalog).await;
    for (id, name) in [(1, "Alpha"), (2, "Beta"), (3, "Gamma")] {
        harness.seed_show(id, name, "Running").await;
    }

    let summary = harness.refresh().refresh_all().await.expect("refresh");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].show_id, 2);
    assert_eq!(summary.failures[0].show_name, "Beta");
    assert_eq!(summary.episodes_added, 2);
}

#[tokio::test]
async fn ended_shows_are_not_selected() {
    let catalog = MockCatalog::default().with_show(
        catalog_show(1, "Alpha", "Running"),
        vec![catalog_episode(10, 1, 1, "One")],
    );
    let harness = TestHarness::new(catalog).await;
    harness.seed_show(1, "Alpha", "Running").await;
    harness.seed_show(2, "Finished", "Ended").await;

    let summary = harness.refresh().refresh_all().await.expect("refresh");

    assert_eq!(summary.processed, 1);
    assert!(summary.failures.is_empty());
}

#[tokio::test]
async fn ignore_union_covers_settings_rows_and_legacy_flag() {
    let catalog = MockCatalog::default()
        .with_show(catalog_show(1, "Kept", "Running"), vec![])
        .with_show(catalog_show(2, "Settings ignored", "Running"), vec![])
        .with_show(catalog_show(3, "Legacy ignored", "Running"), vec![]);
    let harness = TestHarness::new(catalog).await;
    harness.seed_show(1, "Kept", "Running").await;
    harness.seed_show(2, "Settings ignored", "Running").await;
    harness.seed_show(3, "Legacy ignored", "Running").await;

    harness
        .store
        .upsert_user_settings(7, 2, true)
        .await
        .unwrap();
    harness.store.set_show_ignored(3, true).await.unwrap();

    let summary = harness.refresh().refresh_all().await.expect("refresh");

    assert_eq!(summary.processed, 1);

    // A settings row that un-ignores does not resurrect the legacy flag.
    harness
        .store
        .upsert_user_settings(7, 2, false)
        .await
        .unwrap();
    let summary = harness.refresh().refresh_all().await.expect("refresh");
    assert_eq!(summary.processed, 2);
}

#[tokio::test]
async fn summary_counts_fold_across_shows() {
    let catalog = MockCatalog::default()
        .with_show(
            catalog_show(1, "Alpha", "Running"),
            vec![
                catalog_episode(10, 1, 1, "One"),
                catalog_episode(11, 1, 2, "Two"),
            ],
        )
        .with_show(
            catalog_show(2, "Beta", "Running"),
            vec![catalog_episode(20, 1, 1, "One")],
        );
    let harness = TestHarness::new(catalog).await;
    harness.seed_show(1, "Alpha", "Running").await;
    harness.seed_show(2, "Beta", "Running").await;

    let summary = harness.refresh().refresh_all().await.expect("refresh");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.episodes_added, 3);
    assert_eq!(summary.shows_updated, 0);
}

#[tokio::test]
async fn refresh_one_reports_unknown_show() {
    let harness = TestHarness::new(MockCatalog::default()).await;
    let err = harness
        .refresh()
        .refresh_one(ShowId::new(404))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not tracked"));
}
