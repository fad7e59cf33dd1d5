//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `attempt` (1-based).
///
/// Doubles from `base_ms` up to `max_ms`, then adds up to 10% jitter so
/// that rebuilds triggered together do not run in lockstep. Attempt 0
/// waits nothing.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(factor).min(max_ms);

    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_then_caps() {
        let first = calculate_backoff(1, 10, 1000).as_millis();
        assert!((10..11).contains(&first));

        let third = calculate_backoff(3, 10, 1000).as_millis();
        assert!((40..44).contains(&third));

        let capped = calculate_backoff(20, 10, 1000).as_millis();
        assert!((1000..1100).contains(&capped));
    }

    #[test]
    fn huge_attempts_do_not_overflow() {
        let delay = calculate_backoff(200, u64::MAX / 2, 5000);
        assert!(delay.as_millis() >= 5000);
    }

    #[test]
    fn zeroth_attempt_is_immediate() {
        assert_eq!(calculate_backoff(0, 100, 1000), Duration::ZERO);
    }
}
