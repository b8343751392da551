//! Exit code logic for the fetch process.
//!
//! Single responsibility: map a completed run to the process exit outcome.

use release_artifacts::RunSummary;

use crate::ProcessExit;

/// Success when every library pattern produced an artifact, Partial when
/// some did not. Errors that abort the run map to Failure elsewhere.
pub(crate) fn determine_exit_outcome(summary: &RunSummary) -> ProcessExit {
    if summary.is_complete() {
        ProcessExit::Success
    } else {
        ProcessExit::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::determine_exit_outcome;
    use crate::ProcessExit;
    use release_artifacts::{CollectReport, RunSummary};

    fn summary(missing: Vec<String>) -> RunSummary {
        RunSummary {
            release_id: 1,
            tag: "v1".to_string(),
            archives: Vec::new(),
            skipped_assets: Vec::new(),
            report: CollectReport {
                copied: Vec::new(),
                missing,
            },
        }
    }

    #[test]
    fn test_exit_outcome_success_when_nothing_missing() {
        assert_eq!(determine_exit_outcome(&summary(vec![])), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_pattern_missing() {
        assert_eq!(
            determine_exit_outcome(&summary(vec!["libopenslide.dylib".to_string()])),
            ProcessExit::Partial
        );
    }

    #[test]
    fn test_process_exit_codes() {
        assert_eq!(ProcessExit::Success.code(), 0);
        assert_eq!(ProcessExit::Failure.code(), 1);
        assert_eq!(ProcessExit::Partial.code(), 2);
    }
}
