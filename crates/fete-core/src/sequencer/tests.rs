use std::time::Duration;

use super::*;
use crate::typewriter::RevealPhase;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Drives a sequencer on a virtual clock, executing its commands the way the
/// TUI runtime does (timers, one recurring photo timer, decorations logged).
struct Harness {
    seq: Sequencer,
    now: Duration,
    order: u64,
    pending: Vec<(Duration, u64, Deferred)>,
    photo_timer: Option<(TimerGeneration, Duration, Duration)>,
    commands: Vec<Command>,
    message_starts: usize,
}

impl Harness {
    fn new(seq: Sequencer) -> Self {
        Self {
            seq,
            now: Duration::ZERO,
            order: 0,
            pending: Vec::new(),
            photo_timer: None,
            commands: Vec::new(),
            message_starts: 0,
        }
    }

    fn run<F>(&mut self, op: F)
    where
        F: FnOnce(&mut Sequencer) -> Vec<Command>,
    {
        let before = self.seq.message().phase();
        let commands = op(&mut self.seq);
        if before == RevealPhase::NotStarted && self.seq.message().phase() != before {
            self.message_starts += 1;
        }
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Schedule { delay, deferred } => {
                    self.pending.push((self.now + delay, self.order, deferred));
                    self.order += 1;
                }
                Command::StartSlideshowTimer { generation, period } => {
                    self.photo_timer = Some((generation, self.now + period, period));
                }
                Command::CancelSlideshowTimer { generation } => {
                    if self.photo_timer.is_some_and(|(g, _, _)| g == generation) {
                        self.photo_timer = None;
                    }
                }
                Command::Decorate(_) => {}
            }
            self.commands.push(command);
        }
    }

    fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        loop {
            let next_step = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (due, _, _))| *due <= until)
                .min_by_key(|(_, (due, order, _))| (*due, *order))
                .map(|(idx, (due, _, _))| (idx, *due));
            let next_tick = self
                .photo_timer
                .filter(|(_, due, _)| *due <= until)
                .map(|(_, due, _)| due);

            match (next_step, next_tick) {
                (Some((idx, due)), tick) if tick.is_none_or(|t| due <= t) => {
                    let (_, _, deferred) = self.pending.remove(idx);
                    self.now = due;
                    self.run(|seq| seq.on_deferred(deferred));
                }
                (_, Some(due)) => {
                    let (generation, _, period) = self.photo_timer.unwrap();
                    self.now = due;
                    self.photo_timer = Some((generation, due + period, period));
                    self.seq.on_slideshow_tick(generation);
                }
                (None, None) => break,
                (Some(_), None) => unreachable!(),
            }
        }
        self.now = until;
    }

    fn count(&self, wanted: Command) -> usize {
        self.commands.iter().filter(|c| **c == wanted).count()
    }

    fn count_slideshow_starts(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::StartSlideshowTimer { .. }))
            .count()
    }

    fn photo_timers(&self) -> usize {
        usize::from(self.photo_timer.is_some())
    }
}

fn five_section_deck() -> Deck {
    Deck::new(vec![
        SectionKind::Opening,
        SectionKind::Reveal,
        SectionKind::Photos,
        SectionKind::Message,
        SectionKind::Closing,
    ])
    .unwrap()
}

fn sequencer() -> Sequencer {
    Sequencer::new(five_section_deck(), TimingConfig::default())
        .with_message("Hi!")
        .with_photos(3)
}

/// Full delay chain of one transition.
const CHAIN: Duration = Duration::from_millis(800 + 1200);

#[test]
fn test_initial_state() {
    let seq = sequencer();
    assert_eq!(seq.current_index(), 0);
    assert!(!seq.is_transitioning());
    assert!(!seq.message_typed());
    assert_eq!(seq.active_count(), 1);
    assert!(!seq.can_go_previous());
    assert!(seq.can_go_next());
    assert!((seq.progress() - 0.2).abs() < f64::EPSILON);
}

#[test]
fn test_transition_phases_and_lock_span_full_chain() {
    let mut h = Harness::new(sequencer());

    h.run(|seq| seq.request_transition(Direction::Next));
    assert!(h.seq.is_transitioning());
    assert_eq!(h.seq.phase(0), Some(Phase::Leaving));
    assert_eq!(h.seq.active_count(), 0);
    assert_eq!(h.count(Command::Decorate(Decoration::TransitionPulse)), 1);

    h.advance(ms(799));
    assert_eq!(h.seq.current_index(), 0);

    h.advance(ms(1));
    assert_eq!(h.seq.current_index(), 1);
    assert_eq!(h.seq.phase(0), Some(Phase::Hidden));
    assert_eq!(h.seq.phase(1), Some(Phase::Entering));
    assert_eq!(h.seq.active_count(), 1);
    // Lock still held during the entrance animation.
    assert!(h.seq.is_transitioning());

    h.advance(ms(1199));
    assert!(h.seq.is_transitioning());

    h.advance(ms(1));
    assert!(!h.seq.is_transitioning());
    assert_eq!(h.seq.phase(1), Some(Phase::Active));
    assert_eq!(h.seq.active_count(), 1);
}

#[test]
fn test_requests_during_transition_are_dropped() {
    let mut h = Harness::new(sequencer());
    h.run(|seq| seq.request_transition(Direction::Next));

    for _ in 0..5 {
        h.advance(ms(300));
        h.run(|seq| seq.request_transition(Direction::Next));
        h.run(|seq| seq.request_transition(Direction::Previous));
        h.run(|seq| seq.goto_section(4));
    }
    h.advance(CHAIN);

    assert_eq!(h.seq.current_index(), 1);
    assert!(!h.seq.is_transitioning());
}

#[test]
fn test_boundaries_are_no_ops() {
    let mut seq = sequencer();
    assert!(seq.request_transition(Direction::Previous).is_empty());
    assert_eq!(seq.current_index(), 0);
    assert!(!seq.is_transitioning());

    let mut h = Harness::new(seq);
    for _ in 0..4 {
        h.run(|seq| seq.request_transition(Direction::Next));
        h.advance(CHAIN);
    }
    assert_eq!(h.seq.current_index(), 4);
    assert!(!h.seq.can_go_next());
    assert!(h.seq.request_transition(Direction::Next).is_empty());
    assert_eq!(h.seq.current_index(), 4);
    assert!(!h.seq.is_transitioning());
    assert!((h.seq.progress() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_goto_out_of_range_is_no_op() {
    let mut seq = sequencer();
    assert!(seq.goto_section(5).is_empty());
    assert!(!seq.is_transitioning());
}

#[test]
fn test_walk_to_closing_dispatches_each_entry_once() {
    let mut h = Harness::new(sequencer());

    for _ in 0..4 {
        h.run(|seq| seq.request_transition(Direction::Next));
        h.advance(CHAIN);
    }

    assert_eq!(h.seq.current_index(), 4);
    assert_eq!(h.seq.current_kind(), SectionKind::Closing);
    assert_eq!(h.count(Command::Decorate(Decoration::ConfettiBurst)), 1);
    assert_eq!(h.count_slideshow_starts(), 1);
    assert_eq!(h.message_starts, 1);
    assert_eq!(h.count(Command::Decorate(Decoration::ClosingHearts)), 1);
    assert_eq!(h.seq.active_count(), 1);
}

#[test]
fn test_message_reveal_runs_once_per_run() {
    // 100 characters take 5s to type, longer than a round trip away and back.
    let mut h = Harness::new(sequencer().with_message("x".repeat(100)));
    for _ in 0..3 {
        h.run(|seq| seq.request_transition(Direction::Next));
        h.advance(CHAIN);
    }
    assert_eq!(h.seq.current_kind(), SectionKind::Message);

    h.run(|seq| seq.request_transition(Direction::Previous));
    h.advance(CHAIN);
    assert_eq!(h.seq.message().phase(), RevealPhase::Typing);
    assert!(!h.seq.message_typed());

    // Re-entering mid-reveal neither restarts nor duplicates it.
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);
    assert_eq!(h.message_starts, 1);

    h.advance(ms(5000));
    assert!(h.seq.message_typed());
    assert_eq!(h.seq.message().visible_text().len(), 100);

    // And again after completion.
    h.run(|seq| seq.request_transition(Direction::Previous));
    h.advance(CHAIN);
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);
    assert_eq!(h.message_starts, 1);
    assert_eq!(h.seq.message().visible_text().len(), 100);
}

#[test]
fn test_message_typing_timeline() {
    let mut h = Harness::new(sequencer());
    for _ in 0..2 {
        h.run(|seq| seq.request_transition(Direction::Next));
        h.advance(CHAIN);
    }
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(ms(800));

    // First character appears on entry, then one every 50ms.
    assert_eq!(h.seq.message().visible_text(), "H");
    h.advance(ms(50));
    assert_eq!(h.seq.message().visible_text(), "Hi");
    h.advance(ms(50));
    assert_eq!(h.seq.message().visible_text(), "Hi!");
    assert!(!h.seq.message_typed());
    h.advance(ms(50));
    assert!(h.seq.message_typed());
    assert!(h.seq.message().cursor_visible());
    h.advance(ms(1000));
    assert!(!h.seq.message().cursor_visible());
}

#[test]
fn test_slideshow_timer_not_duplicated_on_reentry() {
    let mut h = Harness::new(sequencer());
    for _ in 0..2 {
        h.run(|seq| seq.request_transition(Direction::Next));
        h.advance(CHAIN);
    }
    h.run(|seq| seq.request_transition(Direction::Previous));
    h.advance(CHAIN);
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);

    assert_eq!(h.count_slideshow_starts(), 1);
    assert_eq!(h.seq.slideshow().active_timers(), 1);

    let index = h.seq.slideshow().index();
    h.advance(ms(4000));
    assert_eq!(h.seq.slideshow().index(), (index + 1) % 3);
}

#[test]
fn test_replay_resets_state() {
    let mut h = Harness::new(sequencer());
    for _ in 0..4 {
        h.run(|seq| seq.request_transition(Direction::Next));
        h.advance(CHAIN);
    }
    assert!(h.seq.message_typed());
    assert!(h.seq.go_to_photo(2));

    h.run(Sequencer::replay);

    assert_eq!(h.seq.current_index(), 0);
    assert!(!h.seq.message_typed());
    assert_eq!(h.seq.message().visible_text(), "");
    assert_eq!(h.seq.slideshow().index(), 0);
    assert_eq!(h.seq.slideshow().active_timers(), 0);
    assert_eq!(h.photo_timers(), 0);
    assert_eq!(h.seq.active_count(), 1);
    assert_eq!(h.seq.phase(0), Some(Phase::Active));
    for i in 1..h.seq.deck().len() {
        assert_eq!(h.seq.phase(i), Some(Phase::Hidden));
    }
}

#[test]
fn test_repeated_replay_never_accumulates_photo_timers() {
    let mut h = Harness::new(sequencer().with_startup_auto_advance(false));

    for _ in 0..3 {
        h.run(Sequencer::replay);
        h.advance(ms(500) + CHAIN);
        for _ in 0..2 {
            h.run(|seq| seq.request_transition(Direction::Next));
            h.advance(CHAIN);
        }
        assert_eq!(h.seq.current_kind(), SectionKind::Photos);
        assert_eq!(h.seq.slideshow().active_timers(), 1);
        assert_eq!(h.photo_timers(), 1);
    }

    // One tick per period, not one per replay.
    let index = h.seq.slideshow().index();
    h.advance(ms(4000));
    assert_eq!(h.seq.slideshow().index(), (index + 1) % 3);
}

#[test]
fn test_stale_steps_ignored_after_replay() {
    let mut h = Harness::new(sequencer());
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(ms(100));

    // Replay mid-transition: the pending commit belongs to the old run.
    h.run(Sequencer::replay);
    assert!(!h.seq.is_transitioning());
    h.advance(ms(400));
    assert_eq!(h.seq.current_index(), 0);

    // The startup display of the new run then takes the lock.
    h.advance(ms(100));
    assert!(h.seq.is_transitioning());
    h.advance(CHAIN);
    assert_eq!(h.seq.current_index(), 0);
    assert_eq!(h.seq.phase(0), Some(Phase::Active));
}

#[test]
fn test_startup_sequence_displays_then_advances() {
    let mut h = Harness::new(sequencer());
    h.run(Sequencer::start);

    h.advance(ms(500));
    assert!(h.seq.is_transitioning());
    assert_eq!(h.seq.phase(0), Some(Phase::Leaving));

    h.advance(ms(800));
    assert_eq!(h.seq.phase(0), Some(Phase::Entering));
    assert_eq!(h.seq.current_index(), 0);

    h.advance(ms(1200));
    assert!(!h.seq.is_transitioning());

    h.advance(ms(2500));
    assert!(h.seq.is_transitioning());
    h.advance(ms(800));
    assert_eq!(h.seq.current_index(), 1);
}

#[test]
fn test_startup_advance_skipped_after_manual_navigation() {
    let mut h = Harness::new(sequencer());
    h.run(Sequencer::start);
    h.advance(ms(2500));

    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(ms(800));
    assert_eq!(h.seq.current_index(), 2);

    // At 5000 we are not on section 0 any more: nothing happens.
    h.advance(ms(5000));
    assert_eq!(h.seq.current_index(), 2);
}

#[test]
fn test_startup_display_dropped_while_transitioning() {
    let mut h = Harness::new(sequencer().with_startup_auto_advance(false));
    h.run(Sequencer::start);

    // User navigates before the forced display fires.
    h.advance(ms(100));
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);

    assert_eq!(h.seq.current_index(), 1);
    assert!(!h.seq.is_transitioning());
}

#[test]
fn test_startup_auto_advance_can_be_disabled() {
    let mut h = Harness::new(sequencer().with_startup_auto_advance(false));
    h.run(Sequencer::start);
    h.advance(ms(10_000));
    assert_eq!(h.seq.current_index(), 0);
}

#[test]
fn test_at_most_one_active_section_at_all_times() {
    let mut h = Harness::new(sequencer());
    h.run(Sequencer::start);

    for _ in 0..200 {
        h.advance(ms(97));
        assert!(h.seq.active_count() <= 1);
        if !h.seq.is_transitioning() {
            assert_eq!(h.seq.active_count(), 1);
            h.run(|seq| seq.request_transition(Direction::Next));
        }
    }
}

fn surprise_sequencer() -> Sequencer {
    Sequencer::new(
        Deck::new(vec![
            SectionKind::Opening,
            SectionKind::Surprise,
            SectionKind::Closing,
        ])
        .unwrap(),
        TimingConfig::default(),
    )
}

#[test]
fn test_surprise_only_on_surprise_section() {
    let mut seq = surprise_sequencer();
    assert!(seq.reveal_surprise().is_empty());
    assert_eq!(seq.surprise().phase(), crate::surprise::SurprisePhase::Waiting);
}

#[test]
fn test_surprise_stages_then_auto_advance() {
    let mut h = Harness::new(surprise_sequencer());
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);
    assert_eq!(h.seq.current_kind(), SectionKind::Surprise);

    h.run(Sequencer::reveal_surprise);
    assert_eq!(h.count(Command::Decorate(Decoration::ButtonExplosion)), 1);
    assert!(h.seq.surprise().button_visible());

    h.advance(ms(200));
    assert!(!h.seq.surprise().button_visible());
    h.advance(ms(300));
    assert_eq!(h.count(Command::Decorate(Decoration::Fireworks)), 1);
    h.advance(ms(500));
    assert!(h.seq.surprise().message_visible());

    // Second press does nothing.
    h.run(Sequencer::reveal_surprise);
    assert_eq!(h.count(Command::Decorate(Decoration::ButtonExplosion)), 1);

    h.advance(ms(6000) + ms(800));
    assert_eq!(h.seq.current_kind(), SectionKind::Closing);
}

#[test]
fn test_surprise_auto_advance_skipped_if_user_left() {
    let mut h = Harness::new(surprise_sequencer());
    h.run(|seq| seq.request_transition(Direction::Next));
    h.advance(CHAIN);
    h.run(Sequencer::reveal_surprise);
    h.advance(ms(1000));

    h.run(|seq| seq.request_transition(Direction::Previous));
    h.advance(ms(8000));
    assert_eq!(h.seq.current_kind(), SectionKind::Opening);
}

#[test]
fn test_from_config() {
    let config = Config {
        photos: vec!["a".into(), "b".into()],
        startup_auto_advance: false,
        ..Config::default()
    };
    let mut seq = Sequencer::from_config(&config).unwrap();
    assert_eq!(seq.deck().len(), 6);
    assert_eq!(seq.slideshow().count(), 2);
    assert_eq!(seq.start().len(), 1);
}
