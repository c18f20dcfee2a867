use std::time::{Duration, Instant};

use crate::{
    foundation::error::{LuminaError, LuminaResult},
    host::headless::HeadlessHost,
    render::renderer::CurveRenderer,
    surface::Surface,
};

/// Fixed-rate tick source standing in for a display refresh.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> LuminaResult<Self> {
        if fps == 0 {
            return Err(LuminaError::validation("fps must be > 0"));
        }
        Ok(Self {
            interval: Duration::from_secs(1) / fps,
            next: Instant::now(),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next tick. Returns `true` when the tick was already overdue; a late
    /// pacer resynchronizes to now instead of firing a burst of catch-up ticks.
    pub fn wait(&mut self) -> bool {
        let now = Instant::now();
        let late = now > self.next;
        if late {
            self.next = now;
        } else {
            std::thread::sleep(self.next - now);
        }
        self.next += self.interval;
        late
    }
}

/// Drive `renderer` on the current thread at `fps` for `duration`, one frame per tick.
///
/// `after_frame` runs after every delivered frame, e.g. to present the surface. Returns
/// the number of frames rendered; stops early once nothing is scheduled.
#[tracing::instrument(skip(renderer, after_frame))]
pub fn run_realtime<S: Surface>(
    renderer: &mut CurveRenderer<S, HeadlessHost>,
    fps: u32,
    duration: Duration,
    mut after_frame: impl FnMut(&mut CurveRenderer<S, HeadlessHost>) -> LuminaResult<()>,
) -> LuminaResult<u64> {
    let mut pacer = FramePacer::new(fps)?;
    let deadline = Instant::now().checked_add(duration).ok_or_else(|| {
        LuminaError::validation(format!("run duration {duration:?} is too long"))
    })?;
    let mut frames = 0u64;
    let mut late = 0u64;

    while Instant::now() < deadline {
        if pacer.wait() {
            late += 1;
        }
        if renderer.run_frames(1) == 0 {
            break;
        }
        frames += 1;
        after_frame(renderer)?;
    }

    tracing::debug!(frames, late, "paced run finished");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/host/realtime.rs"]
mod tests;
