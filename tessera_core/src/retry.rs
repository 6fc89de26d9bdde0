//! Bounded retry policy for transient I/O failures.
//!
//! Retry counts and backoff were unspecified by the source material; we
//! settle on 3 attempts with exponential backoff starting at 1s (1s, 2s,
//! 4s), grounded on the teacher's remote-read retry pattern for
//! `reqwest`-backed sources. See `SPEC_FULL.md` AMBIENT-6.

use std::time::Duration;

/// Describes how many attempts a transient failure gets and how long to
/// wait between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_delay: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		RetryPolicy {
			max_attempts: 3,
			base_delay: Duration::from_secs(1),
		}
	}
}

impl RetryPolicy {
	#[must_use]
	pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
		RetryPolicy { max_attempts, base_delay }
	}

	/// Delay to wait before retry attempt number `attempt` (1-based: the
	/// delay waited *after* the first failed attempt, before the second).
	#[must_use]
	pub fn backoff_delay(&self, attempt: u32) -> Duration {
		self.base_delay.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
	}

	/// Runs `f` up to `max_attempts` times, sleeping `backoff_delay` between
	/// attempts, returning the first success or the last failure.
	///
	/// # Errors
	/// Returns the error of the final attempt if every attempt fails.
	pub async fn retry<T, E, F, Fut>(&self, mut f: F) -> Result<T, E>
	where
		F: FnMut() -> Fut,
		Fut: std::future::Future<Output = Result<T, E>>,
	{
		let mut attempt = 1;
		loop {
			match f().await {
				Ok(value) => return Ok(value),
				Err(err) => {
					if attempt >= self.max_attempts {
						return Err(err);
					}
					log::warn!(
						"attempt {attempt}/{} failed, retrying in {:?}",
						self.max_attempts,
						self.backoff_delay(attempt)
					);
					tokio::time::sleep(self.backoff_delay(attempt)).await;
					attempt += 1;
				}
			}
		}
	}
}
