// Data Quality - dataset audit run by `blog-listings check`
// Flags records the API tolerates but whose aggregates would be misleading

use crate::dataset::{Dataset, Record};
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// QUALITY ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Critical, // Skews aggregate values
    Warning,  // Record is served, but lookups or groupings may surprise
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityIssue {
    pub cid: i64,
    pub severity: Severity,
    pub field: &'static str,
    pub issue: String,
    pub recommendation: &'static str,
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "Records: {}, Issues: {} ({} critical)",
            self.total_records,
            self.issues.len(),
            self.critical_count()
        )
    }

    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.critical_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// ============================================================================
// AUDIT
// ============================================================================

pub fn audit(dataset: &Dataset) -> QualityReport {
    let mut issues = Vec::new();
    let mut first_seen: HashMap<i64, usize> = HashMap::new();

    for (index, record) in dataset.records().iter().enumerate() {
        check_record(record, &mut issues);

        // Rule: Cid unique - lookups only ever return the first match
        if let Some(first) = first_seen.get(&record.cid) {
            issues.push(QualityIssue {
                cid: record.cid,
                severity: Severity::Warning,
                field: "Cid",
                issue: format!("duplicate id (record #{index}, first seen at #{first})"),
                recommendation: "Give every listing a distinct Cid",
            });
        } else {
            first_seen.insert(record.cid, index);
        }
    }

    QualityReport {
        total_records: dataset.len(),
        issues,
    }
}

fn check_record(record: &Record, issues: &mut Vec<QualityIssue>) {
    // Rule: price parses
    if let Err(e) = record.price() {
        issues.push(QualityIssue {
            cid: record.cid,
            severity: Severity::Critical,
            field: "Prc",
            issue: e.to_string(),
            recommendation: "Use digits with optional thousands separators, e.g. \"25,000\"",
        });
    }

    // Rule: brand derivable
    if record.brand().is_empty() {
        issues.push(QualityIssue {
            cid: record.cid,
            severity: Severity::Warning,
            field: "NameMMT",
            issue: "blank display name, brand is empty".to_string(),
            recommendation: "Start the name with the make, e.g. \"Toyota Camry\"",
        });
    }

    // Rule: model present
    if record.model.trim().is_empty() {
        issues.push(QualityIssue {
            cid: record.cid,
            severity: Severity::Warning,
            field: "Model",
            issue: "blank model".to_string(),
            recommendation: "Fill in the model so model summaries group it",
        });
    }
}
