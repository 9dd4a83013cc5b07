use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use shelfsync_import::SyncReport;

/// Print the outcome of one applied (or dry-run) batch.
pub(crate) fn print_report(report: &SyncReport) {
    let c = &report.counters;
    let title = if report.dry_run {
        format!("{} (dry run, nothing written)", report.file_name)
    } else {
        match report.run_id {
            Some(id) => format!("{} (run #{})", report.file_name, id),
            None => report.file_name.clone(),
        }
    };
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  Rows:         {:>6} total, {} skipped",
        c.rows_total,
        c.rows_skipped
    );
    log::info!(
        "  Categories:   {:>6} created, {} updated, {} deactivated",
        c.categories_created,
        c.categories_updated,
        c.categories_deactivated
    );
    log::info!(
        "  Products:     {:>6} created, {} updated, {} unchanged, {} deactivated",
        c.products_created,
        c.products_updated,
        c.products_unchanged,
        c.products_deactivated
    );
    log::info!("  Redirects:    {:>6}", c.redirects_created);
    let failed = if c.images_failed > 0 {
        format!("{} failed", c.images_failed)
            .if_supports_color(Stdout, |t| t.red())
            .to_string()
    } else {
        "0 failed".to_string()
    };
    log::info!(
        "  Images:       {:>6} converted, {} reused, {}",
        c.images_converted,
        c.images_reused,
        failed
    );

    if !report.row_errors.is_empty() {
        crate::log_blank();
        log::info!(
            "  {}",
            "Skipped rows:".if_supports_color(Stdout, |t| t.yellow())
        );
        for err in &report.row_errors {
            let sku = err.sku.as_deref().unwrap_or("-");
            log::info!("    line {:>5}  {:<16} {}", err.line, sku, err.kind);
        }
    }

    if !report.warnings.is_empty() {
        crate::log_blank();
        log::info!("  {}", "Warnings:".if_supports_color(Stdout, |t| t.yellow()));
        for warning in &report.warnings {
            log::info!("    line {:>5}  {}", warning.line, warning.message);
        }
    }

    if !report.redirects.is_empty() {
        crate::log_blank();
        log::info!("  {}", "Redirects:".if_supports_color(Stdout, |t| t.cyan()));
        for r in &report.redirects {
            log::info!(
                "    {:<8} {} -> {}",
                r.entity_type.as_str(),
                r.old_slug.if_supports_color(Stdout, |t| t.dimmed()),
                r.new_slug
            );
        }
    }
}
