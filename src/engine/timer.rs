/// Identifies one arming of a [`ScheduledTask`]. Every `arm` hands out a fresh token, so a
/// token from a cancelled or replaced arming never matches again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerToken(u32);

#[derive(Clone, Copy, Debug)]
struct Armed<T> {
    token: TimerToken,
    deadline_ms: u64,
    payload: T,
}

/// Single-shot deadline carrying a payload. The owner polls it from the same context that
/// dispatches touches, so expiry and dispatch never interleave.
#[derive(Clone, Copy, Debug)]
pub struct ScheduledTask<T> {
    next_token: u32,
    armed: Option<Armed<T>>,
}

impl<T: Copy> Default for ScheduledTask<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> ScheduledTask<T> {
    pub const fn new() -> Self {
        Self {
            next_token: 0,
            armed: None,
        }
    }

    /// Arms the task `delay_ms` after `now_ms`, replacing any earlier arming.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.armed = Some(Armed {
            token,
            deadline_ms: now_ms.saturating_add(delay_ms),
            payload,
        });
        token
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|armed| armed.payload)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.armed.map(|armed| armed.token)
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.armed.map(|armed| armed.deadline_ms)
    }

    /// Disarms and returns the payload once `now_ms` has reached the deadline.
    pub fn take_expired(&mut self, now_ms: u64) -> Option<T> {
        match self.armed {
            Some(armed) if now_ms >= armed.deadline_ms => {
                self.armed = None;
                Some(armed.payload)
            }
            _ => None,
        }
    }

    /// Disarms and returns the payload if `token` is the current arming, regardless of time.
    pub fn fire(&mut self, token: TimerToken) -> Option<T> {
        match self.armed {
            Some(armed) if armed.token == token => {
                self.armed = None;
                Some(armed.payload)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_only_at_deadline() {
        let mut task = ScheduledTask::new();
        task.arm(1_000, 400, 7u8);
        assert_eq!(task.deadline_ms(), Some(1_400));
        assert_eq!(task.take_expired(1_399), None);
        assert!(task.is_armed());
        assert_eq!(task.take_expired(1_400), Some(7));
        assert!(!task.is_armed());
        assert_eq!(task.take_expired(2_000), None);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut task = ScheduledTask::new();
        let token = task.arm(0, 400, 1u8);
        assert_eq!(task.cancel(), Some(1));
        assert_eq!(task.take_expired(10_000), None);
        assert_eq!(task.fire(token), None);
    }

    #[test]
    fn superseded_token_is_ignored() {
        let mut task = ScheduledTask::new();
        let stale = task.arm(0, 400, 1u8);
        let current = task.arm(100, 400, 2u8);
        assert_ne!(stale, current);
        assert_eq!(task.fire(stale), None);
        assert_eq!(task.token(), Some(current));
        assert_eq!(task.fire(current), Some(2));
    }
}
