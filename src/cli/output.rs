use crate::common::format::{format_elapsed, format_size};
use crate::pruner::{RunReport, Stats, TargetSummary};

/// `Count (size)` pairs shared by the per-target and overall lines
fn stats_fields(stats: &Stats, processed_bytes: u64, ignored_label: &str) -> String {
    let ignored_size = if stats.ignored_bytes > 0 {
        format!(" ({})", format_size(stats.ignored_bytes))
    } else {
        String::new()
    };

    format!(
        "Processed: {} ({}) | Kept: {} ({}) | Deleted: {} ({}) | {}: {}{}",
        stats.processed,
        format_size(processed_bytes),
        stats.kept,
        format_size(stats.kept_bytes),
        stats.deleted,
        format_size(stats.deleted_bytes),
        ignored_label,
        stats.ignored,
        ignored_size,
    )
}

/// One line of the per-target section
pub fn format_target_summary(summary: &TargetSummary) -> String {
    format!(
        "Name: {} | {}",
        summary.name,
        stats_fields(&summary.stats, summary.stats.processed_bytes(), "Ignored")
    )
}

/// Run-wide totals line. Its processed size leaves out ignored bytes,
/// which only appear next to the matched-ignored count.
pub fn format_totals(stats: &Stats) -> String {
    stats_fields(stats, stats.kept_bytes + stats.deleted_bytes, "Matched Ignored")
}

/// End-of-run report, logged as one message
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();

    if report.dry_run {
        out.push_str("[DRY RUN] ");
    }
    out.push_str(&format!("{} Pruning Complete!\n\n", report.mode.label()));
    out.push_str(&format!(
        "Total Elapsed Time: {}\n\n",
        format_elapsed(report.elapsed)
    ));
    out.push_str("TOTALS OVERALL\n");
    out.push_str(&format_totals(&report.totals));
    out.push_str("\n\n");

    if !report.targets.is_empty() {
        out.push_str("TOTALS PER PATH\n");
        let lines: Vec<String> = report.targets.iter().map(format_target_summary).collect();
        out.push_str(&lines.join("\n"));
    }

    out
}

/// Log the final report
pub fn print_report(report: &RunReport) {
    tracing::info!("{}", render_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::Mode;
    use std::time::Duration;

    fn sample_stats() -> Stats {
        let mut s = Stats::default();
        s.record_kept(1024);
        s.record_kept(1024);
        s.record_deleted(1536);
        s.processed = 3;
        s
    }

    #[test]
    fn test_target_summary_without_ignored_size() {
        let line = format_target_summary(&TargetSummary {
            name: "db".to_string(),
            stats: sample_stats(),
        });
        assert_eq!(
            line,
            "Name: db | Processed: 3 (3.5 KB) | Kept: 2 (2 KB) | Deleted: 1 (1.5 KB) | Ignored: 0"
        );
    }

    #[test]
    fn test_target_summary_with_ignored_size() {
        let mut stats = sample_stats();
        stats.record_ignored(512);
        stats.processed += 1;

        let line = format_target_summary(&TargetSummary {
            name: "db".to_string(),
            stats,
        });
        assert!(line.starts_with("Name: db | Processed: 4 (4 KB)"));
        assert!(line.ends_with("Ignored: 1 (512 B)"));
    }

    #[test]
    fn test_totals_processed_size_excludes_ignored_bytes() {
        let mut stats = sample_stats();
        stats.record_ignored(512);
        stats.processed += 1;

        assert_eq!(
            format_totals(&stats),
            "Processed: 4 (3.5 KB) | Kept: 2 (2 KB) | Deleted: 1 (1.5 KB) | Matched Ignored: 1 (512 B)"
        );
    }

    #[test]
    fn test_render_report_dry_run_with_targets() {
        let mut report = RunReport::new(Mode::Dropbox, true);
        report.elapsed = Duration::from_secs(65);
        report.commit("db", sample_stats(), true);

        let text = render_report(&report);
        assert!(text.starts_with("[DRY RUN] DropBox Pruning Complete!\n\n"));
        assert!(text.contains("Total Elapsed Time: 0:01:05\n\n"));
        assert!(text.contains("TOTALS OVERALL\nProcessed: 3 (3.5 KB)"));
        assert!(text.contains("| Matched Ignored: 0"));
        assert!(text.ends_with("TOTALS PER PATH\nName: db | Processed: 3 (3.5 KB) | Kept: 2 (2 KB) | Deleted: 1 (1.5 KB) | Ignored: 0"));
    }

    #[test]
    fn test_render_report_omits_empty_per_path_section() {
        let report = RunReport::new(Mode::Local, false);
        let text = render_report(&report);
        assert!(text.starts_with("Local Pruning Complete!"));
        assert!(!text.contains("TOTALS PER PATH"));
        assert!(text.contains("Processed: 0 (0 B) | Kept: 0 (0 B) | Deleted: 0 (0 B) | Matched Ignored: 0"));
    }
}
