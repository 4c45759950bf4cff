//! Outcome of running one protocol over several cases in sequence.

use serde::Serialize;

/// A case that did not finish, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFailure {
    pub case_id: usize,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<T> {
    pub completed: Vec<T>,
    pub failures: Vec<CaseFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn fail(&mut self, case_id: usize, error: impl ToString) {
        self.failures.push(CaseFailure {
            case_id,
            error: error.to_string(),
        });
    }

    pub fn attempted(&self) -> usize {
        self.completed.len() + self.failures.len()
    }

    pub fn all_failed(&self) -> bool {
        self.completed.is_empty() && !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report: BatchReport<u32> = BatchReport::default();
        assert!(!report.all_failed());
        report.fail(4, "API error (500): boom");
        assert!(report.all_failed());
        report.completed.push(1);
        assert_eq!(report.attempted(), 2);
        assert!(!report.all_failed());
        assert_eq!(report.failures[0].case_id, 4);
    }
}
