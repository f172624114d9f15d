use foundation::time::Timestamp;

/// One animation-frame tick.
///
/// The host's render loop produces these; everything downstream keys off the
/// frame index, so a burst of input events inside one frame is observably
/// identical to a single event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host timestamp at the start of the frame.
    pub time: Timestamp,
}

impl Frame {
    pub fn new(index: u64, time: Timestamp) -> Self {
        Self { index, time }
    }
}
