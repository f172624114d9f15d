use crate::frame::Frame;

/// Frame-aligned coalescing for continuous pan/move triggers.
///
/// Any number of `mark_dirty` calls inside one frame collapse into a single
/// `should_run` = `true`; the expensive recompute pipeline therefore runs at
/// most once per rendered frame.
///
/// The pacer does not decide *whether* running is appropriate (hover focus
/// suppression lives with the caller); it only bounds the rate. A dirty flag
/// the caller declines to consume stays set and is served on a later frame.
#[derive(Debug, Default)]
pub struct FramePacer {
    dirty: bool,
    last_run_frame: Option<u64>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the dirty flag for this frame.
    ///
    /// Returns `true` at most once per frame index, and only while dirty.
    pub fn should_run(&mut self, frame: Frame) -> bool {
        if !self.dirty {
            return false;
        }
        if self.last_run_frame == Some(frame.index) {
            return false;
        }
        self.dirty = false;
        self.last_run_frame = Some(frame.index);
        true
    }
}
