//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Timer tasks send `UiEvent`s to `inbox_tx`; the runtime drains `inbox_rx`
//! each iteration, so a timer callback is processed between two terminal
//! events, never concurrently with one.
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `timers.rs`: One-shot and recurring timer tasks
//! - `audio.rs`: Background music player

mod audio;
mod inbox;
mod timers;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use fete_core::config::Config;
use fete_core::interrupt;
use fete_core::slideshow::TimerGeneration;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Animation frame cadence (~30fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is guaranteed to be restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    /// Inbox sender - timer tasks send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each iteration.
    inbox_rx: UiEventReceiver,
    /// The running photo timer, if any.
    slideshow_timer: Option<(TimerGeneration, CancellationToken)>,
    music: audio::MusicPlayer,
    /// Origin of the `now` passed to the reducer.
    started: Instant,
    last_tick: Instant,
    last_render: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime.
    ///
    /// # Errors
    /// Returns an error if the config describes an empty deck or the terminal
    /// cannot be set up.
    pub fn new(config: &Config) -> Result<Self> {
        let state = AppState::new(config)?;

        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });

        // Reset interrupt flag in case it was set from a previous run
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            slideshow_timer: None,
            music: audio::MusicPlayer::default(),
            started: now,
            last_tick: now,
            last_render: now,
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if polling terminal events or drawing fails, or
    /// `InterruptedError` if SIGINT arrived while the loop was running.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_mouse()?;

        let effects = update::start(&mut self.state);
        self.execute_effects(effects);

        let result = self.event_loop();

        self.cancel_slideshow_timer();
        self.music.stop();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            if interrupt::is_interrupted() {
                return Err(interrupt::InterruptedError.into());
            }

            let mut events = self.collect_events()?;

            // Frame goes first so every event in the batch sees the current
            // size and time.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                    now: self.started.elapsed(),
                },
            );

            for event in events {
                // Only Tick triggers render - this caps frame rate at tick cadence
                let marks_dirty = matches!(&event, UiEvent::Tick);
                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                let frame_ms = self.last_render.elapsed().as_millis() as u16;
                self.last_render = Instant::now();

                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;

                let particles = self.state.particles.len();
                self.state.status_line.on_frame(frame_ms, particles);
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the inbox and the terminal, then a Tick if due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let time_until_tick = FRAME_DURATION.saturating_sub(self.last_tick.elapsed());

        // Don't block if timer events are already waiting to be processed.
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= FRAME_DURATION {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and posts its result to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }

            UiEffect::Schedule { delay, deferred } => {
                debug!(?delay, ?deferred, "Scheduling step");
                self.spawn_effect(move || timers::deferred_step(delay, deferred));
            }

            UiEffect::StartSlideshowTimer { generation, period } => {
                self.cancel_slideshow_timer();
                let cancel = CancellationToken::new();
                debug!(generation, ?period, "Starting photo timer");
                tokio::spawn(timers::slideshow_ticks(
                    self.inbox_tx.clone(),
                    generation,
                    period,
                    cancel.clone(),
                ));
                self.slideshow_timer = Some((generation, cancel));
            }
            UiEffect::CancelSlideshowTimer { generation } => {
                if self
                    .slideshow_timer
                    .as_ref()
                    .is_some_and(|(running, _)| *running == generation)
                {
                    self.cancel_slideshow_timer();
                }
            }

            UiEffect::PlayMusic { path } => self.music.play(path.as_deref()),
            UiEffect::StopMusic => self.music.stop(),
        }
    }

    fn cancel_slideshow_timer(&mut self) {
        if let Some((_, cancel)) = self.slideshow_timer.take() {
            cancel.cancel();
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
