use foundation::time::Timestamp;

/// Trailing-edge fixed-window throttle.
///
/// Each `trigger` supersedes any pending one and restarts the window; `poll`
/// fires at most once per settled trigger, after the window has elapsed with
/// no further triggers. Zoom-end handling uses this so that a full rebuild
/// only runs once the zoom level has actually settled.
#[derive(Debug)]
pub struct WindowThrottle {
    window_ms: f64,
    deadline: Option<Timestamp>,
}

impl WindowThrottle {
    pub const DEFAULT_WINDOW_MS: f64 = 150.0;

    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Timestamp) {
        self.deadline = Some(now.after_ms(self.window_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once the pending window has elapsed, consuming it.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
