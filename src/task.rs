/// Identifies one run of a [`TaskSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

/// Holds at most one pending task. Starting a new one supersedes the old, and
/// a superseded task's completion is rejected by [`TaskSlot::finish`].
#[derive(Debug, Default)]
pub struct TaskSlot {
    generation: u64,
    pending: Option<TaskToken>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> TaskToken {
        self.generation += 1;
        let token = TaskToken(self.generation);
        self.pending = Some(token);
        token
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn is_current(&self, token: TaskToken) -> bool {
        self.pending == Some(token)
    }

    /// Consumes the pending task if `token` is it.
    pub fn finish(&mut self, token: TaskToken) -> bool {
        if self.is_current(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_once() {
        let mut slot = TaskSlot::new();
        let token = slot.begin();
        assert!(slot.is_pending());
        assert!(slot.finish(token));
        assert!(!slot.finish(token));
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_newer_task_supersedes() {
        let mut slot = TaskSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert_ne!(first, second);
        assert!(!slot.finish(first));
        assert!(slot.finish(second));
    }

    #[test]
    fn test_cancel() {
        let mut slot = TaskSlot::new();
        let token = slot.begin();
        slot.cancel();
        assert!(!slot.is_current(token));
        assert!(!slot.finish(token));
    }
}
