//! Human-readable run summaries on stderr.

use certsync_recon::{Reconciled, Summary};

pub(crate) fn print_written(count: usize, noun: &str, out_label: &str) {
    eprintln!("Wrote {} {} to {}", count, noun, out_label);
}

/// Per-source contribution to the merged list.
pub(crate) fn print_breakdown(reconciled: &Reconciled) {
    for tally in &reconciled.tallies {
        if tally.dropped > 0 {
            eprintln!(
                "  - {}: {} ({} duplicate{} dropped)",
                tally.source,
                tally.kept,
                tally.dropped,
                if tally.dropped == 1 { "" } else { "s" },
            );
        } else {
            eprintln!("  - {}: {}", tally.source, tally.kept);
        }
    }
}

/// `code_label` names what the `code` column holds ("exam", "issuer").
pub(crate) fn print_summary(summary: &Summary, code_label: &str) {
    for line in summary_lines(summary, code_label) {
        eprintln!("{}", line);
    }
}

fn summary_lines(summary: &Summary, code_label: &str) -> Vec<String> {
    let mut lines = vec![format!("  Distinct years: {}", summary.distinct_years)];

    if let Some(latest) = &summary.latest {
        if latest.code.is_empty() {
            lines.push(format!("  Most recent: {} ({})", latest.title, latest.date));
        } else {
            lines.push(format!(
                "  Most recent: {} ({}, {})",
                latest.title, latest.code, latest.date
            ));
        }
    }

    if let Some(top) = &summary.top_code {
        lines.push(format!("  Most frequent {}: {} ({})", code_label, top.code, top.count));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use certsync_recon::{CanonicalRecord, CodeKind, Source};

    fn badge(title: &str, issuer: &str, date: &str) -> CanonicalRecord {
        CanonicalRecord::new(title, issuer, date, Source::Credly, CodeKind::Issuer)
    }

    #[test]
    fn test_summary_lines() {
        let records = vec![
            badge("Azure Fundamentals", "Microsoft", "2022-01-10"),
            badge("GitHub Copilot", "GitHub", "2024-03-04"),
            badge("Azure Administrator", "Microsoft", "2023-11-20"),
        ];

        let lines = summary_lines(&Summary::from_records(&records), "issuer");

        assert_eq!(
            lines,
            vec![
                "  Distinct years: 3".to_string(),
                "  Most recent: GitHub Copilot (GitHub, 2024-03-04)".to_string(),
                "  Most frequent issuer: Microsoft (2)".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_lines_without_dates() {
        let records = vec![CanonicalRecord::new(
            "Untimed",
            "",
            "",
            Source::MicrosoftLearn,
            CodeKind::Fallback,
        )];

        let lines = summary_lines(&Summary::from_records(&records), "exam");

        assert_eq!(lines, vec!["  Distinct years: 0".to_string()]);
    }
}
