//! Photo slideshow state.
//!
//! The photo index is owned separately from the section index. Auto-advance is
//! a single recurring timer identified by a generation number: starting while
//! one is running does nothing, and ticks carrying a stale generation are
//! ignored, so cancelled timers can never advance the reel.

/// Generation number identifying one auto-advance timer.
pub type TimerGeneration = u64;

#[derive(Debug, Clone, Default)]
pub struct Slideshow {
    index: usize,
    count: usize,
    timer: Option<TimerGeneration>,
    next_generation: TimerGeneration,
}

impl Slideshow {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Jumps to `index`. Out-of-range jumps are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.index = index;
        true
    }

    /// Moves to the next photo, wrapping after the last one.
    pub fn advance(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    /// Starts auto-advance unless a timer is already running.
    ///
    /// Returns the generation of the newly started timer.
    pub fn start_timer(&mut self) -> Option<TimerGeneration> {
        if self.timer.is_some() {
            return None;
        }
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.timer = Some(generation);
        Some(generation)
    }

    /// Handles one auto-advance tick. Returns true if the reel moved.
    pub fn on_timer(&mut self, generation: TimerGeneration) -> bool {
        if self.timer != Some(generation) {
            return false;
        }
        self.advance();
        true
    }

    /// Stops auto-advance, returning the generation that was running.
    pub fn cancel_timer(&mut self) -> Option<TimerGeneration> {
        self.timer.take()
    }

    /// Cancels auto-advance and rewinds to the first photo.
    pub fn reset(&mut self) -> Option<TimerGeneration> {
        self.index = 0;
        self.cancel_timer()
    }

    pub fn timer_generation(&self) -> Option<TimerGeneration> {
        self.timer
    }

    pub fn active_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }
}
