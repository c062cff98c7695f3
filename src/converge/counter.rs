//! Verified stepping of a displayed counter toward a target value.
//!
//! Guest and room steppers render their count next to +/- buttons, and the
//! rendered number trails the click. Convergence here is checked one step at
//! a time rather than once at the end, so a single click that never lands is
//! caught immediately instead of being discovered as a larger drift later.

use std::time::Duration;

use tracing::{debug, warn};

use crate::converge::poll::{self, PollPolicy};
use crate::Result;

/// Window for one stepped value to show up before the step counts as lost.
const STEP_TIMEOUT: Duration = Duration::from_secs(3);

/// A displayed integer the page lets us nudge one unit at a time.
#[allow(async_fn_in_trait)]
pub trait Counter {
    /// Read the currently rendered value.
    async fn displayed(&self) -> Result<i64>;
    /// Trigger one unit up.
    async fn increment(&self) -> Result<()>;
    /// Trigger one unit down.
    async fn decrement(&self) -> Result<()>;
}

/// Drive `counter` from `current` to `target`, verifying every step.
///
/// Returns the last value confirmed on screen. On a clean run that is
/// `target`; if a step action fails or its result never renders inside the
/// per-step window, the loop stops right there and returns the partial
/// value rather than keep clicking against an unverified state. No error
/// escapes; diagnostics go to the log.
///
/// Assumes each action moves the rendered value by exactly one unit. A UI
/// that batches several clicks into one visible jump will read as a lost
/// step here; widen the window with [`converge_with`] if a target page is
/// known to behave that way.
pub async fn converge<C: Counter>(counter: &C, current: i64, target: i64, label: &str) -> i64 {
    converge_with(counter, current, target, label, PollPolicy::new(STEP_TIMEOUT)).await
}

/// [`converge`] with an explicit per-step poll policy.
pub async fn converge_with<C: Counter>(
    counter: &C,
    current: i64,
    target: i64,
    label: &str,
    step_policy: PollPolicy,
) -> i64 {
    if current == target {
        debug!("{label}: already at {target}");
        return current;
    }

    let distance = (target - current).abs();
    let direction = if target > current { 1 } else { -1 };
    debug!("{label}: stepping {current} -> {target}");

    let mut verified = current;
    for step in 1..=distance {
        let expected = current + direction * step;
        let acted = if direction > 0 {
            counter.increment().await
        } else {
            counter.decrement().await
        };
        if let Err(e) = acted {
            warn!("{label}: step toward {expected} failed, holding at {verified}: {e}");
            return verified;
        }

        let rendered = poll::wait_for(step_policy, move || async move {
            Ok(counter.displayed().await? == expected)
        })
        .await;
        if !rendered {
            warn!("{label}: display never reached {expected}, holding at {verified}");
            return verified;
        }
        verified = expected;
    }

    debug!("{label}: converged at {verified}");
    verified
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Stepper whose display advances normally until `stick_at` is reached,
    /// after which further clicks stop registering.
    struct Stepper {
        value: Mutex<i64>,
        stick_at: Option<i64>,
        ups: Mutex<u32>,
        downs: Mutex<u32>,
    }

    impl Stepper {
        fn new(value: i64) -> Self {
            Self {
                value: Mutex::new(value),
                stick_at: None,
                ups: Mutex::new(0),
                downs: Mutex::new(0),
            }
        }

        fn sticking_at(value: i64, stick_at: i64) -> Self {
            Self {
                stick_at: Some(stick_at),
                ..Self::new(value)
            }
        }

        fn stuck(&self) -> bool {
            self.stick_at == Some(*self.value.lock().unwrap())
        }
    }

    impl Counter for Stepper {
        async fn displayed(&self) -> crate::Result<i64> {
            Ok(*self.value.lock().unwrap())
        }

        async fn increment(&self) -> crate::Result<()> {
            *self.ups.lock().unwrap() += 1;
            if !self.stuck() {
                *self.value.lock().unwrap() += 1;
            }
            Ok(())
        }

        async fn decrement(&self) -> crate::Result<()> {
            *self.downs.lock().unwrap() += 1;
            if !self.stuck() {
                *self.value.lock().unwrap() -= 1;
            }
            Ok(())
        }
    }

    fn fast() -> PollPolicy {
        PollPolicy::new(Duration::from_millis(120)).with_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn equal_values_are_a_no_op() {
        let s = Stepper::new(3);
        assert_eq!(converge_with(&s, 3, 3, "adults", fast()).await, 3);
        assert_eq!(*s.ups.lock().unwrap(), 0);
        assert_eq!(*s.downs.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn steps_up_once_per_unit() {
        let s = Stepper::new(2);
        assert_eq!(converge_with(&s, 2, 5, "adults", fast()).await, 5);
        assert_eq!(*s.ups.lock().unwrap(), 3);
        assert_eq!(*s.downs.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn steps_down_once_per_unit() {
        let s = Stepper::new(4);
        assert_eq!(converge_with(&s, 4, 1, "rooms", fast()).await, 1);
        assert_eq!(*s.downs.lock().unwrap(), 3);
        assert_eq!(*s.ups.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn stops_at_first_unverified_step() {
        // Display advances 2 -> 3, then sticks. The run must hold at 3 and
        // stop clicking: one more click than the verified distance, no more.
        let s = Stepper::sticking_at(2, 3);
        assert_eq!(converge_with(&s, 2, 6, "children", fast()).await, 3);
        assert_eq!(*s.ups.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_action_returns_last_verified() {
        struct Broken;
        impl Counter for Broken {
            async fn displayed(&self) -> crate::Result<i64> {
                Ok(1)
            }
            async fn increment(&self) -> crate::Result<()> {
                Err(crate::Error::Surface("button detached".into()))
            }
            async fn decrement(&self) -> crate::Result<()> {
                Err(crate::Error::Surface("button detached".into()))
            }
        }
        assert_eq!(converge_with(&Broken, 1, 4, "adults", fast()).await, 1);
    }
}
