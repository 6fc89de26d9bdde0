//! What a [`crate::Scheduler::run`] call hands back: tallies a caller can
//! log or turn into a process exit code, replacing the original's
//! "raise on first exception" control flow with an accumulated summary.

use tessera_core::EngineError;

#[derive(Debug, Default, Clone)]
pub struct RunReport {
	pub written: usize,
	pub empty: usize,
	pub skipped: usize,
	pub failed: Vec<(String, EngineError)>,
}

impl RunReport {
	#[must_use]
	pub fn is_success(&self) -> bool {
		self.failed.is_empty()
	}

	#[must_use]
	pub fn total(&self) -> usize {
		self.written + self.empty + self.skipped + self.failed.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_report_is_a_success() {
		assert!(RunReport::default().is_success());
	}

	#[test]
	fn a_single_failure_flips_success() {
		let mut report = RunReport::default();
		report.failed.push(("t1".into(), EngineError::ProcessException("boom".into())));
		assert!(!report.is_success());
	}

	#[test]
	fn total_counts_every_outcome() {
		let mut report = RunReport { written: 2, empty: 1, skipped: 1, failed: Vec::new() };
		report.failed.push(("t1".into(), EngineError::NodataTile));
		assert_eq!(report.total(), 5);
	}
}
