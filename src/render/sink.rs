use crate::{
    foundation::core::{Fps, FrameIndex, Rgb},
    foundation::error::HandanimResult,
    scene::frame::Frame,
};

/// Configuration provided to a [`FrameSink`] at the start of a render.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    /// Canvas width in output units.
    pub width: u32,
    /// Canvas height in output units.
    pub height: u32,
    pub fps: Fps,
    /// Color to clear each frame with before painting its entries.
    pub background: Rgb,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

/// Consumer of frame instructions, typically a rasterizer or an encoder.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> HandanimResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> HandanimResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> HandanimResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames.into_iter().map(|(_, f)| f).collect()
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> HandanimResult<()> {
        self.frames.clear();
        self.frames.reserve(cfg.frame_count.min(4096) as usize);
        self.cfg = Some(cfg);
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> HandanimResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> HandanimResult<()> {
        self.finished = true;
        Ok(())
    }
}
