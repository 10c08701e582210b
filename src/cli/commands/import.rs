//! Bulk import command handler
//!
//! Reads a list of show names (one per line), resolves them against the
//! catalog in batches with a live countdown between batches, then inserts
//! the confirmed matches. Ctrl-C cancels the resolution cooperatively.

use crate::domain::events::NotificationEvent;
use crate::services::NameResolution;
use crate::state::AppState;
use tokio_util::sync::CancellationToken;

pub async fn cmd_bulk_import(state: &AppState, file: &str, assume_yes: bool) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        println!("No show names found in {file}.");
        return Ok(());
    }

    println!("Resolving {} name(s) against the catalog...", names.len());
    println!("Press Ctrl-C to stop; collected results are kept.");
    println!();

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let mut events = state.event_bus.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                NotificationEvent::ImportBatchStarted {
                    batch,
                    total_batches,
                } => {
                    println!("Batch {batch}/{total_batches}");
                }
                NotificationEvent::ImportNameResolved {
                    search_name,
                    outcome,
                } => {
                    println!("  {search_name}: {outcome:?}");
                }
                NotificationEvent::ImportCountdownTick { seconds_left } => {
                    println!("  next batch in {seconds_left}s...");
                }
                NotificationEvent::ImportResolveFinished { .. } => break,
                _ => {}
            }
        }
    });

    let import = state.import_service();
    let resolutions = import.resolve_names(&names, &cancel).await;
    let _ = progress.await;

    let mut resolved = Vec::new();
    let mut not_found = Vec::new();
    let mut cancelled = 0usize;

    for resolution in resolutions {
        match resolution {
            NameResolution::Found(r) => resolved.push(r),
            NameResolution::NotFound { search_name } => not_found.push(search_name),
            NameResolution::Cancelled { .. } => cancelled += 1,
        }
    }

    println!();
    println!(
        "Resolved {} | Not found {} | Cancelled {}",
        resolved.len(),
        not_found.len(),
        cancelled
    );

    if !not_found.is_empty() {
        println!();
        println!("Not found:");
        for name in &not_found {
            println!("  ? {name}");
        }
    }

    if resolved.is_empty() {
        println!();
        println!("Nothing to import.");
        return Ok(());
    }

    println!();
    println!("Matches:");
    for item in &resolved {
        println!(
            "  {} -> {} (ID: {})",
            item.search_name, item.show.name, item.show.id
        );
    }

    if !assume_yes {
        println!();
        println!("Import {} show(s)? [y/N]", resolved.len());
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let summary = import.import_confirmed(&resolved).await?;

    println!();
    println!("✓ Imported {} show(s)", summary.added.len());
    for show in &summary.added {
        println!("  + {} (ID: {})", show.name, show.id);
    }

    if !summary.failures.is_empty() {
        println!();
        println!("Failed ({}):", summary.failures.len());
        for failure in &summary.failures {
            println!(
                "  ✗ {} (ID: {}): {}",
                failure.show_name, failure.show_id, failure.error
            );
        }
    }

    Ok(())
}
