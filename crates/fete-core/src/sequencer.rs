//! Section sequencer.
//!
//! Owns the position in the deck and every piece of state that section
//! transitions touch: the transition lock, per-section presentation phases,
//! the photo reel, the message reveal and the surprise.
//!
//! The sequencer never sleeps or spawns. Operations return [`Command`]s; a
//! deferred step comes back later through [`Sequencer::on_deferred`] after the
//! host waited the requested delay. Every deferred step carries the epoch it
//! was scheduled in, and [`Sequencer::replay`] bumps the epoch, so callbacks
//! scheduled before a replay are dropped instead of acting on the new run.
//!
//! Rejected operations (lock held, target out of range, stale callback) are
//! silent no-ops: they return no commands and never surface an error.
//!
//! ```text
//! goto(target) ──▶ lock, current Leaving
//!      │ exit delay
//!      ▼
//! CommitTransition ──▶ current = target (Entering), entry dispatch
//!      │ enter delay
//!      ▼
//! FinishTransition ──▶ target Active, unlock
//! ```

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::config::{Config, TimingConfig};
use crate::deck::{Deck, Direction, EntryAction, SectionKind};
use crate::slideshow::{Slideshow, TimerGeneration};
use crate::surprise::{Surprise, SurpriseStage};
use crate::typewriter::{MessageReveal, TypeStep};

#[cfg(test)]
mod tests;

/// Presentation state of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    /// Exit animation running; no longer active.
    Leaving,
    /// Active, entrance animation still running.
    Entering,
    Active,
}

impl Phase {
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Entering | Phase::Active)
    }
}

/// A step the host must feed back after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CommitTransition { target: usize },
    FinishTransition { section: usize },
    StartupDisplay,
    StartupAdvance,
    TypeNextChar,
    HideCursor,
    Surprise(SurpriseStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub epoch: u64,
    pub step: Step,
}

/// Fire-and-forget visual effects requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// Pulse shown while a section exits.
    TransitionPulse,
    ConfettiBurst,
    ClosingHearts,
    /// Particles bursting out of the surprise button.
    ButtonExplosion,
    /// Fireworks and sparkles over the surprise section.
    Fireworks,
}

/// Work for the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Feed `deferred` back through `on_deferred` after `delay`.
    Schedule { delay: Duration, deferred: Deferred },
    /// Start a recurring photo timer; cancel any previous one first.
    StartSlideshowTimer {
        generation: TimerGeneration,
        period: Duration,
    },
    CancelSlideshowTimer { generation: TimerGeneration },
    Decorate(Decoration),
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    deck: Deck,
    timings: TimingConfig,
    startup_auto_advance: bool,
    current: usize,
    transitioning: bool,
    phases: Vec<Phase>,
    epoch: u64,
    message: MessageReveal,
    slideshow: Slideshow,
    surprise: Surprise,
}

impl Sequencer {
    pub fn new(deck: Deck, timings: TimingConfig) -> Self {
        let phases = initial_phases(deck.len());
        Self {
            deck,
            timings,
            startup_auto_advance: true,
            current: 0,
            transitioning: false,
            phases,
            epoch: 0,
            message: MessageReveal::new(String::new()),
            slideshow: Slideshow::new(0),
            surprise: Surprise::default(),
        }
    }

    /// Builds a sequencer from user configuration.
    ///
    /// # Errors
    /// Returns an error if the configured deck is empty.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.deck()?, config.timings.clone())
            .with_message(config.message.clone())
            .with_photos(config.photos.len())
            .with_startup_auto_advance(config.startup_auto_advance))
    }

    #[must_use]
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        self.message = MessageReveal::new(text);
        self
    }

    #[must_use]
    pub fn with_photos(mut self, count: usize) -> Self {
        self.slideshow = Slideshow::new(count);
        self
    }

    #[must_use]
    pub fn with_startup_auto_advance(mut self, enabled: bool) -> Self {
        self.startup_auto_advance = enabled;
        self
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Schedules the startup sequence: force-display the first section, then
    /// leave it automatically unless someone navigated first.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = vec![self.schedule(self.timings.startup_display(), Step::StartupDisplay)];
        if self.startup_auto_advance {
            commands.push(self.schedule(self.timings.startup_advance(), Step::StartupAdvance));
        }
        commands
    }

    /// Moves one section in `direction`. Dropped while a transition runs or at
    /// the ends of the deck.
    pub fn request_transition(&mut self, direction: Direction) -> Vec<Command> {
        if self.transitioning {
            debug!(?direction, "transition dropped: already transitioning");
            return Vec::new();
        }
        let Some(target) = direction.step(self.current, self.deck.len()) else {
            debug!(?direction, current = self.current, "transition dropped: at boundary");
            return Vec::new();
        };
        self.goto_section(target)
    }

    /// Starts the transition chain towards `target`.
    pub fn goto_section(&mut self, target: usize) -> Vec<Command> {
        if self.transitioning {
            debug!(target, "goto dropped: already transitioning");
            return Vec::new();
        }
        if target >= self.deck.len() {
            debug!(target, "goto dropped: out of range");
            return Vec::new();
        }

        debug!(from = self.current, to = target, "transition started");
        self.transitioning = true;
        if self.phases[self.current].is_active() {
            self.phases[self.current] = Phase::Leaving;
        }
        vec![
            Command::Decorate(Decoration::TransitionPulse),
            self.schedule(self.timings.exit(), Step::CommitTransition { target }),
        ]
    }

    /// Resets to the first section and restarts the startup sequence.
    ///
    /// Bumps the epoch, which drops every step scheduled before the replay,
    /// including the rest of any in-flight transition (and with it the lock).
    pub fn replay(&mut self) -> Vec<Command> {
        debug!(epoch = self.epoch, "replay");
        let mut commands = Vec::new();

        self.epoch = self.epoch.wrapping_add(1);
        self.current = 0;
        self.transitioning = false;
        self.phases = initial_phases(self.deck.len());
        self.message.reset();
        self.surprise.reset();
        if let Some(generation) = self.slideshow.reset() {
            commands.push(Command::CancelSlideshowTimer { generation });
        }

        commands.extend(self.start());
        commands
    }

    /// Handles a step scheduled earlier.
    pub fn on_deferred(&mut self, deferred: Deferred) -> Vec<Command> {
        if deferred.epoch != self.epoch {
            debug!(?deferred.step, "stale step ignored");
            return Vec::new();
        }

        match deferred.step {
            Step::CommitTransition { target } => self.commit_transition(target),
            Step::FinishTransition { section } => {
                if self.phases.get(section) == Some(&Phase::Entering) {
                    self.phases[section] = Phase::Active;
                }
                self.transitioning = false;
                debug!(section, "transition finished");
                Vec::new()
            }
            Step::StartupDisplay => self.goto_section(0),
            Step::StartupAdvance => {
                if self.current == 0 {
                    self.request_transition(Direction::Next)
                } else {
                    Vec::new()
                }
            }
            Step::TypeNextChar => self.type_step(),
            Step::HideCursor => {
                self.message.hide_cursor();
                Vec::new()
            }
            Step::Surprise(stage) => self.surprise_stage(stage),
        }
    }

    /// Handles a slideshow timer tick. Returns true if the photo changed.
    pub fn on_slideshow_tick(&mut self, generation: TimerGeneration) -> bool {
        self.slideshow.on_timer(generation)
    }

    /// Jumps straight to a photo (indicator click).
    pub fn go_to_photo(&mut self, index: usize) -> bool {
        self.slideshow.go_to(index)
    }

    /// Triggers the surprise. Only acts on the surprise section, outside a
    /// transition, and once per run.
    pub fn reveal_surprise(&mut self) -> Vec<Command> {
        if self.current_kind() != SectionKind::Surprise || self.transitioning {
            return Vec::new();
        }
        if !self.surprise.trigger() {
            return Vec::new();
        }

        let mut commands = vec![Command::Decorate(Decoration::ButtonExplosion)];
        for stage in SurpriseStage::ALL {
            commands.push(self.schedule(stage.delay(), Step::Surprise(stage)));
        }
        commands
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn schedule(&self, delay: Duration, step: Step) -> Command {
        Command::Schedule {
            delay,
            deferred: Deferred {
                epoch: self.epoch,
                step,
            },
        }
    }

    fn commit_transition(&mut self, target: usize) -> Vec<Command> {
        if target >= self.deck.len() {
            self.transitioning = false;
            return Vec::new();
        }

        if self.phases[self.current] == Phase::Leaving {
            self.phases[self.current] = Phase::Hidden;
        }
        self.current = target;
        self.phases[target] = Phase::Entering;

        let mut commands = vec![self.schedule(
            self.timings.enter(),
            Step::FinishTransition { section: target },
        )];
        if let Some(action) = self.current_kind().entry_action() {
            commands.extend(self.dispatch_entry(action));
        }
        commands
    }

    fn dispatch_entry(&mut self, action: EntryAction) -> Vec<Command> {
        debug!(?action, section = self.current, "section entry");
        match action {
            EntryAction::ConfettiBurst => vec![Command::Decorate(Decoration::ConfettiBurst)],
            EntryAction::StartSlideshow => self
                .slideshow
                .start_timer()
                .map(|generation| Command::StartSlideshowTimer {
                    generation,
                    period: self.timings.slideshow_period(),
                })
                .into_iter()
                .collect(),
            EntryAction::RevealMessage => {
                if self.message.start() {
                    self.type_step()
                } else {
                    Vec::new()
                }
            }
            EntryAction::ClosingHearts => vec![Command::Decorate(Decoration::ClosingHearts)],
        }
    }

    fn type_step(&mut self) -> Vec<Command> {
        match self.message.type_next() {
            TypeStep::Typed => vec![self.schedule(self.timings.type_char(), Step::TypeNextChar)],
            TypeStep::Finished => {
                debug!("message fully revealed");
                vec![self.schedule(self.timings.cursor_linger(), Step::HideCursor)]
            }
            TypeStep::Idle => Vec::new(),
        }
    }

    fn surprise_stage(&mut self, stage: SurpriseStage) -> Vec<Command> {
        self.surprise.apply(stage);
        match stage {
            SurpriseStage::Fireworks => vec![Command::Decorate(Decoration::Fireworks)],
            SurpriseStage::AutoAdvance if self.current_kind() == SectionKind::Surprise => {
                self.request_transition(Direction::Next)
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_kind(&self) -> SectionKind {
        self.deck.get(self.current).unwrap_or(SectionKind::Opening)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// True once the message has been fully revealed in this run.
    pub fn message_typed(&self) -> bool {
        self.message.is_complete()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self, section: usize) -> Option<Phase> {
        self.phases.get(section).copied()
    }

    pub fn active_count(&self) -> usize {
        self.phases.iter().filter(|p| p.is_active()).count()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current != 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current != self.deck.last_index()
    }

    /// Progress through the deck in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.deck.len() as f64
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn message(&self) -> &MessageReveal {
        &self.message
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn surprise(&self) -> &Surprise {
        &self.surprise
    }
}

fn initial_phases(len: usize) -> Vec<Phase> {
    let mut phases = vec![Phase::Hidden; len];
    if let Some(first) = phases.first_mut() {
        *first = Phase::Active;
    }
    phases
}
