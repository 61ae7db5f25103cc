use rayon::prelude::*;

use crate::{
    foundation::core::{Fps, FrameIndex},
    foundation::error::{HandanimError, HandanimResult},
    render::sink::{FrameSink, InMemorySink, SinkConfig},
    scene::{
        cache::{CacheStats, DrawCache},
        frame::Frame,
        model::Scene,
    },
    style::StyleContext,
};

/// Threading and chunking controls for multi-frame rendering.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Evaluate frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Options for [`render`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    pub fps: Fps,
    /// Seconds to render. Defaults to the scene duration.
    pub duration: Option<f64>,
    pub threading: RenderThreading,
    /// Style used to draw the scene. Defaults to the scene style.
    pub style: Option<StyleContext>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames pushed to the sink.
    pub frames_rendered: u64,
    /// Draw cache usage over the whole render.
    pub cache: CacheStats,
}

/// Evaluate every frame of `scene` and push it to `sink`.
///
/// Frames `0..=round(duration * fps)` are produced at `t = frame / fps`. The parallel path
/// evaluates chunks of frames on a rayon pool sharing one [`DrawCache`] and pushes them in
/// order, so the sink sees the same sequence either way.
#[tracing::instrument(skip(scene, opts, sink))]
pub fn render(
    scene: &Scene,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> HandanimResult<RenderStats> {
    let duration = opts.duration.unwrap_or_else(|| scene.duration());
    if !duration.is_finite() || duration < 0.0 {
        return Err(HandanimError::validation(format!(
            "render duration must be finite and >= 0, got {duration}"
        )));
    }
    let style = opts.style.unwrap_or(*scene.style());
    let fps = opts.fps;
    let frame_count = fps.secs_to_frames_round(duration) + 1;
    let cache = DrawCache::new();

    let canvas = scene.canvas();
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        background: canvas.background,
        frame_count,
    })?;

    let mut stats = RenderStats::default();
    if !opts.threading.parallel {
        for f in 0..frame_count {
            let frame = scene.frame_instructions_with(fps.frames_to_secs(f), &style, &cache)?;
            sink.push_frame(FrameIndex(f), &frame)?;
            stats.frames_total += 1;
            stats.frames_rendered += 1;
        }
    } else {
        let pool = build_thread_pool(opts.threading.threads)?;
        let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
        let mut chunk_start = 0;
        while chunk_start < frame_count {
            let chunk_end = (chunk_start + chunk_size).min(frame_count);
            let frames =
                render_chunk_parallel(scene, chunk_start..chunk_end, fps, &style, &cache, &pool)?;
            for (f, frame) in (chunk_start..chunk_end).zip(&frames) {
                sink.push_frame(FrameIndex(f), frame)?;
            }
            stats.frames_total += chunk_end - chunk_start;
            stats.frames_rendered += frames.len() as u64;
            chunk_start = chunk_end;
        }
    }

    sink.end()?;
    stats.cache = cache.stats();
    tracing::debug!(?stats, "render finished");
    Ok(stats)
}

/// Render into memory and return the frames in order.
pub fn render_frames(scene: &Scene, opts: &RenderOpts) -> HandanimResult<Vec<Frame>> {
    let mut sink = InMemorySink::new();
    render(scene, opts, &mut sink)?;
    Ok(sink.into_frames())
}

/// Drawing instructions of `scene` at `t` seconds, with a fresh cache.
pub fn render_snapshot(scene: &Scene, t: f64) -> HandanimResult<Frame> {
    scene.frame_instructions_at(t, &DrawCache::new())
}

fn render_chunk_parallel(
    scene: &Scene,
    range: std::ops::Range<u64>,
    fps: Fps,
    style: &StyleContext,
    cache: &DrawCache,
    pool: &rayon::ThreadPool,
) -> HandanimResult<Vec<Frame>> {
    let indices: Vec<u64> = range.collect();
    let evaluated = pool.install(|| {
        indices
            .par_iter()
            .map(|&f| scene.frame_instructions_with(fps.frames_to_secs(f), style, cache))
            .collect::<Vec<_>>()
    });
    evaluated.into_iter().collect()
}

fn build_thread_pool(threads: Option<usize>) -> HandanimResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HandanimError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HandanimError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
