/// Bookkeeping for a requestAnimationFrame loop: the id of the pending
/// request and whether the loop may still reschedule itself.
#[derive(Debug, Default)]
pub struct FrameSchedule {
    pending: Option<i32>,
    stopped: bool,
}

impl FrameSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a new frame may be requested.
    pub fn can_request(&self) -> bool {
        !self.stopped
    }

    /// Records the id returned by `requestAnimationFrame`.
    pub fn requested(&mut self, id: i32) {
        if !self.stopped {
            self.pending = Some(id);
        }
    }

    /// Called at the top of the frame callback; returns whether the frame
    /// should render.
    pub fn fired(&mut self) -> bool {
        self.pending = None;
        !self.stopped
    }

    /// Marks the loop stopped and returns the request to cancel, if any.
    pub fn stop(&mut self) -> Option<i32> {
        self.stopped = true;
        self.pending.take()
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }
}
