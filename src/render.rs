//! Coloured terminal summaries for timetrace results.

use std::path::Path;

use owo_colors::OwoColorize;
use timetrace_core::session::{MonthCount, Session};
use timetrace_core::traffic::AggregateState;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for AggregateState {
    fn render(&self) -> String {
        let suspicious = self.suspicious_log().len();
        let suspicious_label = format!("{} suspicious {}", suspicious, pluralize("line", suspicious));

        let mut lines = vec![
            format!(
                "📡 {} {} scanned",
                self.lines_scanned(),
                pluralize("line", self.lines_scanned())
            ),
            format!(
                "   {} {}, {} {}",
                self.ip_counts().len(),
                pluralize("IP", self.ip_counts().len()),
                self.port_counts().len(),
                pluralize("port", self.port_counts().len()),
            ),
        ];

        if suspicious > 0 {
            lines.push(format!("   {}", suspicious_label.red()));
        } else {
            lines.push(format!("   {}", suspicious_label.dimmed()));
        }

        if !self.dns_queries().is_empty() {
            let label = format!(
                "{} reverse-DNS {}",
                self.dns_queries().len(),
                pluralize("lookup", self.dns_queries().len())
            );
            lines.push(format!("   {}", label.yellow()));
        }

        lines.join("\n")
    }
}

impl Render for Session {
    fn render(&self) -> String {
        let date = self.date.as_deref().unwrap_or("(no date)");
        let duration = self
            .duration
            .map(|d| d.to_string())
            .unwrap_or_else(|| "--:--".to_string());
        format!("   {} {}", date, duration.dimmed())
    }
}

impl Render for MonthCount {
    fn render(&self) -> String {
        let count = if self.count == 0 {
            self.count.dimmed().to_string()
        } else {
            self.count.green().to_string()
        };
        format!("   {:<10} {}", self.label, count)
    }
}

impl Render for Path {
    fn render(&self) -> String {
        format!("{} {}", "✓".green(), self.display())
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetrace_core::traffic::{AggregatorConfig, aggregate};

    #[test]
    fn traffic_summary_counts_everything() {
        let state = aggregate(
            ["t IP 10.0.0.1.22 > 10.0.0.2.4000: Flags [S]"],
            &AggregatorConfig::default(),
        );
        let text = state.render();
        assert!(text.contains("1 line scanned"));
        assert!(text.contains("2 IPs, 2 ports"));
        assert!(text.contains("1 suspicious line"));
        assert!(!text.contains("reverse-DNS"));
    }

    #[test]
    fn empty_month_still_listed() {
        let month = MonthCount {
            month: 12,
            label: "December".to_string(),
            count: 0,
        };
        let text = month.render();
        assert!(text.starts_with("   December   "));
        assert!(text.contains('0'));
    }

    #[test]
    fn pluralize_only_above_one() {
        assert_eq!(pluralize("port", 1), "port");
        assert_eq!(pluralize("port", 0), "ports");
    }
}
