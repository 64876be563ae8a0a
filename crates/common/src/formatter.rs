//! Summary of a batch fingerprinting run over a catalog directory.

use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Tallies per-ruleset outcomes of `gdl-lookup all`.
///
/// Rulesets that index and resolve are grouped by fingerprint, so the
/// summary can flag files a catalog build would reject as duplicates.
pub struct BatchReport {
    total: usize,
    resolved: BTreeMap<u64, Vec<String>>,
    failed: Vec<String>,
}

impl BatchReport {
    pub fn new(tool_name: &str, total: usize) -> Self {
        info!("{}: fingerprinting {} ruleset(s)", tool_name, total);
        info!("{}", "=".repeat(80));

        Self {
            total,
            resolved: BTreeMap::new(),
            failed: Vec::new(),
        }
    }

    /// Record a ruleset whose constants resolved.
    pub fn report_success(&mut self, file_name: &str, fingerprint: u64, stats: &str) {
        info!("RESOLVED: {} {:#018x} ({})", file_name, fingerprint, stats);
        self.resolved
            .entry(fingerprint)
            .or_default()
            .push(file_name.to_string());
    }

    /// Record a ruleset that failed to read, index or resolve.
    pub fn report_failure(&mut self, file_name: &str, reason: &str) {
        error!("FAILED: {} - {}", file_name, reason);
        self.failed.push(file_name.to_string());
    }

    pub fn resolved(&self) -> usize {
        self.resolved.values().map(Vec::len).sum()
    }

    pub fn failed(&self) -> usize {
        self.failed.len()
    }

    /// Number of distinct fingerprints among resolved rulesets.
    pub fn fingerprints(&self) -> usize {
        self.resolved.len()
    }

    /// Groups of resolved rulesets sharing one fingerprint.
    pub fn duplicates(&self) -> impl Iterator<Item = (u64, &[String])> + '_ {
        self.resolved
            .iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(fp, files)| (*fp, files.as_slice()))
    }

    /// Print the summary. Returns `true` when every ruleset resolved to a
    /// fingerprint of its own.
    pub fn finish(self) -> bool {
        info!("{}", "=".repeat(80));
        info!("Rulesets:     {}", self.total);
        info!("Resolved:     {}", self.resolved());
        info!("Failed:       {}", self.failed());
        info!("Fingerprints: {}", self.fingerprints());

        let mut clean = self.failed.is_empty();
        for (fp, files) in self.duplicates() {
            warn!("Fingerprint {:#018x} shared by {}", fp, files.join(", "));
            clean = false;
        }

        if !self.failed.is_empty() {
            error!("Not catalogable: {}", self.failed.join(", "));
        }
        if clean {
            info!("Every ruleset has a distinct, fully resolved fingerprint");
        }
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_outcomes() {
        let mut report = BatchReport::new("test", 3);
        report.report_success("a.kif", 1, "statements=4");
        report.report_success("b.kif", 2, "statements=7");
        report.report_failure("c.kif", "unresolvable");
        assert_eq!(report.resolved(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.fingerprints(), 2);
        assert!(!report.finish());
    }

    #[test]
    fn shared_fingerprints_fail_the_run() {
        let mut report = BatchReport::new("test", 3);
        report.report_success("buttons.kif", 7, "statements=30");
        report.report_success("lamp.kif", 7, "statements=30");
        report.report_success("ticker.kif", 9, "statements=25");
        assert_eq!(report.fingerprints(), 2);

        let dupes: Vec<(u64, Vec<String>)> =
            report.duplicates().map(|(fp, f)| (fp, f.to_vec())).collect();
        assert_eq!(dupes, [(7, vec!["buttons.kif".to_string(), "lamp.kif".to_string()])]);
        assert!(!report.finish());
    }

    #[test]
    fn distinct_resolved_rulesets_succeed() {
        let mut report = BatchReport::new("test", 2);
        report.report_success("a.kif", 1, "statements=4");
        report.report_success("b.kif", 2, "statements=4");
        assert!(report.finish());
        assert!(BatchReport::new("test", 0).finish());
    }
}
