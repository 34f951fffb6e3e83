//! Error types for mediatab-report

/// Errors that can occur while structuring a report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// The report was empty or contained only whitespace
    #[error("report is empty")]
    EmptyReport,
}
