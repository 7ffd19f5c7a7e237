// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.


//! Retrying of server requests with exponential backoff.

use std::{thread, time::Duration};

use crate::api::ApiError;

const INITIAL_DELAY: Duration = Duration::from_millis(250);
const MAX_DELAY: Duration = Duration::from_secs(4);

/// How often, and how patiently, a failed request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Total attempts, the first one included.
    pub(crate) attempts: u32,
    pub(crate) initial_delay: Duration,
    pub(crate) max_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            initial_delay: INITIAL_DELAY,
            max_delay: MAX_DELAY,
        }
    }

    /// A policy that gives up after the first failure.
    pub(crate) fn none() -> Self {
        Self::new(1)
    }

    /// The pause before retry number `retry`, counting from zero.
    pub(crate) fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Runs `operation` until it succeeds, fails with a permanent error, or
    /// runs out of attempts. The last error is returned.
    pub(crate) fn run<T>(
        &self,
        name: &str,
        operation: impl FnMut() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        self.run_with_sleep(name, operation, thread::sleep)
    }

    fn run_with_sleep<T>(
        &self,
        name: &str,
        mut operation: impl FnMut() -> Result<T, ApiError>,
        mut sleep: impl FnMut(Duration),
    ) -> Result<T, ApiError> {
        let mut retry = 0;

        loop {
            match operation() {
                Ok(value) => {
                    if retry > 0 {
                        log::info!("{} succeeded after {} retries", name, retry);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() && retry + 1 < self.attempts => {
                    let delay = self.delay(retry);
                    log::warn!("{} failed, retrying in {:?}: {}", name, delay, e);
                    sleep(delay);
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            message: "busy".to_string(),
        }
    }

    #[test]
    fn delays_double_up_to_the_cap() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay(0), Duration::from_millis(250));
        assert_eq!(policy.delay(1), Duration::from_millis(500));
        assert_eq!(policy.delay(3), Duration::from_secs(2));
        assert_eq!(policy.delay(10), MAX_DELAY);
        assert_eq!(policy.delay(40), MAX_DELAY);
    }

    #[test]
    fn transient_failures_are_retried() {
        let mut calls = 0;
        let mut slept = Vec::new();

        let result = RetryPolicy::new(4).run_with_sleep(
            "test",
            || {
                calls += 1;
                if calls < 3 { Err(unavailable()) } else { Ok(calls) }
            },
            |delay| slept.push(delay),
        );

        assert_eq!(result.unwrap(), 3);
        assert_eq!(slept, vec![Duration::from_millis(250), Duration::from_millis(500)]);
    }

    #[test]
    fn gives_up_after_last_attempt() {
        let mut calls = 0;
        let mut slept = 0;

        let result: Result<(), _> = RetryPolicy::new(3).run_with_sleep(
            "test",
            || {
                calls += 1;
                Err(unavailable())
            },
            |_| slept += 1,
        );

        assert!(matches!(result, Err(ApiError::Status { status: 503, .. })));
        assert_eq!(calls, 3);
        assert_eq!(slept, 2);
    }

    #[test]
    fn permanent_failures_are_not_retried() {
        let mut calls = 0;

        let result: Result<(), _> = RetryPolicy::new(5).run_with_sleep(
            "test",
            || {
                calls += 1;
                Err(ApiError::GraphQl("no such album".to_string()))
            },
            |_| panic!("no retry expected"),
        );

        assert!(matches!(result, Err(ApiError::GraphQl(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn single_attempt_policy_never_sleeps() {
        let mut calls = 0;

        let result: Result<(), _> = RetryPolicy::none().run_with_sleep(
            "test",
            || {
                calls += 1;
                Err(unavailable())
            },
            |_| panic!("no retry expected"),
        );

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert_eq!(RetryPolicy::new(0).attempts, 1);
    }
}
