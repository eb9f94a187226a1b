//! Bounded regenerate-and-recheck loop.
//!
//! Generation is retried by resampling from scratch rather than patching a
//! bad result, so the combinator rebuilds the whole value on every attempt
//! and accepts the final attempt unconditionally once the cap is reached.

/// Result of a bounded retry run.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// The accepted value (or the last attempt if the cap was hit).
    pub value: T,
    /// Number of attempts actually made (1-based).
    pub attempts: u32,
    /// Whether `accept` passed, or the cap forced acceptance.
    pub accepted: bool,
}

/// Rebuild `value` until `accept` passes, up to `max_attempts` tries.
///
/// The last attempt is returned unmodified when every attempt fails the
/// check. Build errors propagate immediately; a failed check is not an
/// error.
pub fn regenerate_until<T, E, B, A>(
    max_attempts: u32,
    mut build: B,
    accept: A,
) -> std::result::Result<RetryOutcome<T>, E>
where
    B: FnMut(u32) -> std::result::Result<T, E>,
    A: Fn(&T) -> bool,
{
    let cap = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let value = build(attempt)?;
        if accept(&value) {
            return Ok(RetryOutcome {
                value,
                attempts: attempt,
                accepted: true,
            });
        }
        if attempt >= cap {
            return Ok(RetryOutcome {
                value,
                attempts: attempt,
                accepted: false,
            });
        }
        attempt += 1;
    }
}
