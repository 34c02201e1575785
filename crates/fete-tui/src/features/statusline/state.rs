//! Status line state types.

/// Public, immutable snapshot read by the renderer each frame.
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    pub fps: f32,
    pub frames: u64,
    pub peak_particles: usize,
}

/// Mutable accumulator that tracks FPS and particle load.
#[derive(Debug)]
pub struct StatusLineAccumulator {
    fps_ema: f32,
    frames: u64,
    peak_particles: usize,
}

impl Default for StatusLineAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLineAccumulator {
    pub fn new() -> Self {
        Self {
            fps_ema: 30.0,
            frames: 0,
            peak_particles: 0,
        }
    }

    /// Update with frame time (ms) and the number of particles drawn.
    pub fn on_frame(&mut self, frame_ms: u16, particles: usize) {
        let fps = if frame_ms > 0 {
            1000.0 / f32::from(frame_ms)
        } else {
            self.fps_ema
        };
        self.fps_ema += 0.1 * (fps - self.fps_ema);
        self.frames += 1;
        self.peak_particles = self.peak_particles.max(particles);
    }

    /// Get snapshot for rendering.
    pub fn snapshot(&self) -> StatusLine {
        StatusLine {
            fps: (self.fps_ema * 10.0).round() / 10.0,
            frames: self.frames,
            peak_particles: self.peak_particles,
        }
    }
}
