use crate::ResolvedConfig;
use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use photomirror_infra::net::DownloadEvent;
use photomirror_pipeline::{MirrorRequest, MirrorResult, ScanStats};
use std::time::Duration;

pub async fn cmd_sync(cfg: ResolvedConfig) -> Result<MirrorResult> {
    println!(":: Mirroring...");
    println!("   Target: {}", cfg.dir);
    if cfg.options.dry_run {
        println!("   Dry run: nothing will be downloaded or deleted");
    }

    let client = photomirror_infra::net::default_http_client()
        .context("Failed to build HTTP client")?;
    let engine = photomirror_pipeline::default_engine(client, &cfg.endpoint)?;

    let req = MirrorRequest {
        credentials: cfg.credentials,
        local_root: cfg.dir,
        options: cfg.options,
    };

    let m = MultiProgress::new();

    let pb_scan = m.add(ProgressBar::new_spinner());
    pb_scan.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb_scan.enable_steady_tick(Duration::from_millis(100));

    let on_scan = {
        let pb = pb_scan.clone();
        Box::new(move |stats: ScanStats| {
            pb.set_message(format!(
                "Indexed {} files in {} directories ({})",
                stats.files_hashed,
                stats.dirs_seen,
                format_size(stats.bytes_hashed, BINARY)
            ));
        })
    };

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    let engine_handle =
        tokio::spawn(async move { engine.run(&req, Some(on_scan), Some(tx)).await });

    let pb_main = m.add(ProgressBar::new(0));
    pb_main.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {bytes_per_sec} {msg}",
        )?
        .progress_chars("=>-"),
    );

    let mut total_bytes = 0u64;
    let mut downloaded_bytes = 0u64;
    let mut files_done = 0u64;
    let mut files_total = 0u64;

    while let Some(ev) = rx.recv().await {
        match ev {
            DownloadEvent::Started {
                total_bytes: size, ..
            } => {
                if !pb_scan.is_finished() {
                    pb_scan.finish_and_clear();
                }
                total_bytes = total_bytes.saturating_add(size);
                files_total = files_total.saturating_add(1);
                pb_main.set_length(total_bytes);
                pb_main.set_message(format!("Downloading file {}", files_total));
            }
            DownloadEvent::Progress { bytes_delta, .. } => {
                downloaded_bytes = downloaded_bytes.saturating_add(bytes_delta);
                pb_main.set_position(downloaded_bytes);
            }
            DownloadEvent::Completed { .. } => {
                files_done = files_done.saturating_add(1);
                pb_main.set_message(format!("{} files done", files_done));
            }
        }
    }

    let outcome = engine_handle.await.context("Mirror task panicked")?;
    pb_scan.finish_and_clear();
    pb_main.finish_and_clear();
    let result = outcome.context("Mirror run failed")?;

    println!(
        ":: {} albums, {} items ({} new, {} changed, {} unchanged)",
        result.albums,
        result.items.total(),
        result.items.new,
        result.items.changed,
        result.items.unchanged
    );
    if result.cleanup.orphans_kept > 0 {
        println!(
            "   Kept {} local paths not found on server",
            result.cleanup.orphans_kept
        );
    } else if result.cleanup.total_removed() > 0 {
        let verb = if result.dry_run { "Would remove" } else { "Removed" };
        println!(
            "   {} {} files and {} directories",
            verb, result.cleanup.files_removed, result.cleanup.dirs_removed
        );
    }
    println!("{}", result.summary_line());

    Ok(result)
}
