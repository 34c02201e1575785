//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Sequencer operations return `Command`s. Timer commands become effects for
//! the runtime; decorations are turned into particles right here, since
//! spawning particles is a pure state change.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use fete_core::deck::{Direction, SectionKind};
use fete_core::sequencer::{Command, Decoration};
use tracing::{debug, info};

use crate::common::layout::{
    REPLAY_LABEL, SURPRISE_LABEL, action_button, center_fraction, hit, photo_dots,
};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::particles::{self, ParticleKind, spawn};
use crate::state::AppState;

/// Kicks off the startup sequence. Called once by the runtime before the
/// first frame.
pub fn start(app: &mut AppState) -> Vec<UiEffect> {
    info!(
        sections = app.sequencer.deck().len(),
        photos = app.content.photos.len(),
        "Starting experience"
    );
    let commands = app.sequencer.start();
    run_commands(app, commands)
}

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            handle_tick(app);
            vec![]
        }
        UiEvent::Frame { width, height, now } => {
            app.size = (width, height);
            app.now = now;
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Deferred(deferred) => {
            let commands = app.sequencer.on_deferred(deferred);
            run_commands(app, commands)
        }
        UiEvent::SlideshowTick { generation } => {
            app.sequencer.on_slideshow_tick(generation);
            vec![]
        }
    }
}

/// Translates sequencer commands into effects, spawning decorations inline.
fn run_commands(app: &mut AppState, commands: Vec<Command>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for command in commands {
        match command {
            Command::Schedule { delay, deferred } => {
                effects.push(UiEffect::Schedule { delay, deferred });
            }
            Command::StartSlideshowTimer { generation, period } => {
                effects.push(UiEffect::StartSlideshowTimer { generation, period });
            }
            Command::CancelSlideshowTimer { generation } => {
                effects.push(UiEffect::CancelSlideshowTimer { generation });
            }
            Command::Decorate(decoration) => decorate(app, decoration),
        }
    }
    effects
}

fn decorate(app: &mut AppState, decoration: Decoration) {
    let now = app.now;
    match decoration {
        Decoration::TransitionPulse => {
            app.particles.spawn([spawn::transition_pulse(now)]);
        }
        Decoration::ConfettiBurst => {
            app.particles.spawn(spawn::confetti_rain(&mut app.rng, now));
            app.particles.spawn(spawn::confetti_burst(&mut app.rng, now));
        }
        Decoration::ClosingHearts => {
            app.closing_hearts_since = Some(now);
        }
        Decoration::ButtonExplosion => {
            let stage = app.layout().stage;
            let origin = center_fraction(stage, action_button(stage, SURPRISE_LABEL));
            app.particles.spawn(spawn::button_explosion(&mut app.rng, now, origin));
        }
        Decoration::Fireworks => {
            app.particles.spawn(spawn::fireworks(&mut app.rng, now));
            app.particles.spawn(spawn::magical_sparkles(&mut app.rng, now));
        }
    }
    debug!(?decoration, particles = app.particles.len(), "Decoration spawned");
}

/// Prunes dead particles and runs the periodic spawners.
fn handle_tick(app: &mut AppState) {
    let now = app.now;
    app.particles.prune(now);

    while app.ambience.next_heart <= now {
        let heart = spawn::floating_heart(&mut app.rng, app.ambience.next_heart);
        app.particles.spawn([heart]);
        app.ambience.next_heart += spawn::HEART_PERIOD;
    }

    while app.ambience.next_ambient <= now {
        if app.particles.count(ParticleKind::Ambient) < spawn::AMBIENT_CAP {
            let mote = spawn::ambient(&mut app.rng, app.ambience.next_ambient);
            app.particles.spawn([mote]);
        }
        app.ambience.next_ambient += spawn::AMBIENT_PERIOD;
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Resize(width, height) => {
            app.size = (width, height);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('q') | KeyCode::Esc => vec![UiEffect::Quit],

        KeyCode::Left | KeyCode::Up | KeyCode::Char('h' | 'k') => {
            navigate(app, Direction::Previous)
        }
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l' | 'j') => {
            navigate(app, Direction::Next)
        }

        KeyCode::Char(digit @ '1'..='9') => {
            if app.sequencer.current_kind() == SectionKind::Photos
                && let Some(number) = digit.to_digit(10)
            {
                app.sequencer.go_to_photo(number as usize - 1);
            }
            vec![]
        }

        KeyCode::Enter | KeyCode::Char(' ') => match app.sequencer.current_kind() {
            SectionKind::Surprise => reveal_surprise(app),
            SectionKind::Closing => replay(app),
            _ => vec![],
        },
        KeyCode::Char('r') if app.sequencer.current_kind() == SectionKind::Closing => replay(app),

        KeyCode::Char('m') => toggle_music(app),
        KeyCode::F(12) => {
            app.show_debug_status = !app.show_debug_status;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Vec<UiEffect> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.swipe.press(mouse.column);
            vec![]
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(direction) = app.swipe.release(mouse.column) {
                debug!(?direction, "Swipe recognized");
                return navigate(app, direction);
            }
            handle_click(app, mouse.column, mouse.row)
        }
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            let stage = app.layout().stage;
            if hit(stage, mouse.column, mouse.row) {
                let at = particles::to_fraction(stage, mouse.column, mouse.row);
                let sparkles = spawn::pointer_sparkles(&mut app.rng, app.now, at);
                app.particles.spawn(sparkles);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_click(app: &mut AppState, col: u16, row: u16) -> Vec<UiEffect> {
    let layout = app.layout();
    if hit(layout.prev_button, col, row) {
        return navigate(app, Direction::Previous);
    }
    if hit(layout.next_button, col, row) {
        return navigate(app, Direction::Next);
    }

    match app.sequencer.current_kind() {
        SectionKind::Photos => {
            let dots = photo_dots(layout.stage, app.sequencer.slideshow().count());
            if let Some(index) = dots.iter().position(|dot| hit(*dot, col, row)) {
                app.sequencer.go_to_photo(index);
            }
            vec![]
        }
        SectionKind::Surprise
            if app.sequencer.surprise().button_visible()
                && hit(action_button(layout.stage, SURPRISE_LABEL), col, row) =>
        {
            reveal_surprise(app)
        }
        SectionKind::Closing if hit(action_button(layout.stage, REPLAY_LABEL), col, row) => {
            replay(app)
        }
        _ => vec![],
    }
}

fn navigate(app: &mut AppState, direction: Direction) -> Vec<UiEffect> {
    let commands = app.sequencer.request_transition(direction);
    run_commands(app, commands)
}

fn reveal_surprise(app: &mut AppState) -> Vec<UiEffect> {
    let commands = app.sequencer.reveal_surprise();
    run_commands(app, commands)
}

fn replay(app: &mut AppState) -> Vec<UiEffect> {
    info!("Replaying experience");
    app.closing_hearts_since = None;
    let commands = app.sequencer.replay();
    run_commands(app, commands)
}

fn toggle_music(app: &mut AppState) -> Vec<UiEffect> {
    app.music.playing = !app.music.playing;
    if app.music.playing {
        vec![UiEffect::PlayMusic {
            path: app.music.track.clone(),
        }]
    } else {
        vec![UiEffect::StopMusic]
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fete_core::config::Config;
    use fete_core::deck::SectionKind;
    use fete_core::sequencer::Deferred;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn app() -> AppState {
        let mut app = AppState::with_rng(&Config::default(), StdRng::seed_from_u64(7)).unwrap();
        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: Duration::ZERO,
            },
        );
        app
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> UiEvent {
        UiEvent::Terminal(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
    }

    fn deferred(effects: &[UiEffect]) -> Vec<Deferred> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                UiEffect::Schedule { deferred, .. } => Some(*deferred),
                _ => None,
            })
            .collect()
    }

    /// Navigates and immediately completes the whole transition chain.
    fn step(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
        let mut all = Vec::new();
        let mut pending = update(app, event);
        while !pending.is_empty() {
            let next: Vec<_> = deferred(&pending)
                .into_iter()
                .filter(|d| {
                    matches!(
                        d.step,
                        fete_core::sequencer::Step::CommitTransition { .. }
                            | fete_core::sequencer::Step::FinishTransition { .. }
                    )
                })
                .collect();
            all.append(&mut pending);
            for d in next {
                pending.extend(update(app, UiEvent::Deferred(d)));
            }
        }
        all
    }

    fn go_to(app: &mut AppState, kind: SectionKind) {
        let target = app.sequencer.deck().position(kind).unwrap();
        while app.sequencer.current_index() < target {
            step(app, key(KeyCode::Right));
        }
    }

    #[test]
    fn test_start_schedules_startup() {
        let mut app = app();
        let effects = start(&mut app);
        assert_eq!(deferred(&effects).len(), 2);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(update(&mut app, key(KeyCode::Char('q'))), vec![UiEffect::Quit]);
        assert_eq!(update(&mut app, key(KeyCode::Esc)), vec![UiEffect::Quit]);
        let ctrl_c = UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(update(&mut app, ctrl_c), vec![UiEffect::Quit]);
    }

    #[test]
    fn test_arrow_keys_navigate() {
        let mut app = app();
        step(&mut app, key(KeyCode::Right));
        assert_eq!(app.sequencer.current_index(), 1);
        step(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.sequencer.current_index(), 2);
        step(&mut app, key(KeyCode::Up));
        assert_eq!(app.sequencer.current_index(), 1);
        step(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.sequencer.current_index(), 0);
    }

    #[test]
    fn test_key_during_transition_is_dropped() {
        let mut app = app();
        let effects = update(&mut app, key(KeyCode::Right));
        assert_eq!(deferred(&effects).len(), 1);
        assert!(update(&mut app, key(KeyCode::Right)).is_empty());
    }

    #[test]
    fn test_transition_spawns_pulse() {
        let mut app = app();
        update(&mut app, key(KeyCode::Right));
        assert_eq!(app.particles.count(ParticleKind::Pulse), 1);
    }

    #[test]
    fn test_reveal_entry_spawns_confetti() {
        let mut app = app();
        step(&mut app, key(KeyCode::Right));
        assert_eq!(app.sequencer.current_kind(), SectionKind::Reveal);
        assert_eq!(
            app.particles.count(ParticleKind::Confetti),
            spawn::CONFETTI_RAIN_COUNT
        );
        assert_eq!(
            app.particles.count(ParticleKind::Burst),
            spawn::CONFETTI_BURST_COUNT
        );
    }

    #[test]
    fn test_photos_entry_starts_timer_once() {
        let mut app = app();
        let mut starts = 0;
        for code in [KeyCode::Right, KeyCode::Right, KeyCode::Left, KeyCode::Right] {
            starts += step(&mut app, key(code))
                .iter()
                .filter(|e| matches!(e, UiEffect::StartSlideshowTimer { .. }))
                .count();
        }
        assert_eq!(app.sequencer.current_kind(), SectionKind::Photos);
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_digit_jumps_to_photo_on_photos_only() {
        let mut app = app();
        update(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.sequencer.slideshow().index(), 0);

        go_to(&mut app, SectionKind::Photos);
        update(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.sequencer.slideshow().index(), 2);
        // Out of range.
        update(&mut app, key(KeyCode::Char('9')));
        assert_eq!(app.sequencer.slideshow().index(), 2);
    }

    #[test]
    fn test_click_photo_dot() {
        let mut app = app();
        go_to(&mut app, SectionKind::Photos);
        let dots = photo_dots(app.layout().stage, app.sequencer.slideshow().count());
        let dot = dots[1];
        update(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), dot.x, dot.y));
        update(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), dot.x, dot.y));
        assert_eq!(app.sequencer.slideshow().index(), 1);
    }

    #[test]
    fn test_slideshow_tick_advances() {
        let mut app = app();
        let effects = go_to_collect(&mut app, SectionKind::Photos);
        let generation = effects
            .iter()
            .find_map(|e| match e {
                UiEffect::StartSlideshowTimer { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap();
        update(&mut app, UiEvent::SlideshowTick { generation });
        assert_eq!(app.sequencer.slideshow().index(), 1);
        update(
            &mut app,
            UiEvent::SlideshowTick {
                generation: generation + 1,
            },
        );
        assert_eq!(app.sequencer.slideshow().index(), 1);
    }

    fn go_to_collect(app: &mut AppState, kind: SectionKind) -> Vec<UiEffect> {
        let target = app.sequencer.deck().position(kind).unwrap();
        let mut effects = Vec::new();
        while app.sequencer.current_index() < target {
            effects.extend(step(app, key(KeyCode::Right)));
        }
        effects
    }

    #[test]
    fn test_click_nav_buttons() {
        let mut app = app();
        let next = app.layout().next_button;
        update(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), next.x, next.y));
        let effects = update(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), next.x, next.y));
        assert_eq!(deferred(&effects).len(), 1);
        assert!(app.sequencer.is_transitioning());
    }

    #[test]
    fn test_swipe_left_goes_next() {
        let mut app = app();
        update(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 70, 10));
        update(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 10, 10));
        assert!(app.sequencer.is_transitioning());
    }

    #[test]
    fn test_short_drag_is_not_a_swipe() {
        let mut app = app();
        update(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 40, 10));
        update(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 10));
        assert!(!app.sequencer.is_transitioning());
    }

    #[test]
    fn test_surprise_key_reveals_on_surprise_section() {
        let mut app = app();
        // Enter on the opening section does nothing.
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());

        go_to(&mut app, SectionKind::Surprise);
        let effects = update(&mut app, key(KeyCode::Enter));
        assert_eq!(deferred(&effects).len(), 4);
        assert_eq!(
            app.particles.count(ParticleKind::Explosion),
            spawn::EXPLOSION_COUNT
        );
        assert!(update(&mut app, key(KeyCode::Char(' '))).is_empty());
    }

    #[test]
    fn test_fireworks_stage_spawns_sparks() {
        let mut app = app();
        go_to(&mut app, SectionKind::Surprise);
        let effects = update(&mut app, key(KeyCode::Enter));
        for d in deferred(&effects) {
            update(&mut app, UiEvent::Deferred(d));
        }
        assert_eq!(
            app.particles.count(ParticleKind::Firework),
            spawn::FIREWORK_SHELLS * spawn::FIREWORK_SPARKS
        );
        assert_eq!(
            app.particles.count(ParticleKind::Sparkle),
            spawn::MAGICAL_SPARKLES
        );
        assert!(app.sequencer.surprise().message_visible());
    }

    #[test]
    fn test_replay_from_closing() {
        let mut app = app();
        assert!(update(&mut app, key(KeyCode::Char('r'))).is_empty());

        go_to(&mut app, SectionKind::Closing);
        assert!(app.closing_hearts_since.is_some());
        let effects = update(&mut app, key(KeyCode::Char('r')));
        assert_eq!(app.sequencer.current_index(), 0);
        assert!(!app.sequencer.message_typed());
        assert!(app.closing_hearts_since.is_none());
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, UiEffect::CancelSlideshowTimer { .. }))
        );
    }

    #[test]
    fn test_click_replay_button() {
        let mut app = app();
        go_to(&mut app, SectionKind::Closing);
        let button = action_button(app.layout().stage, REPLAY_LABEL);
        update(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), button.x, button.y));
        update(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), button.x, button.y));
        assert_eq!(app.sequencer.current_index(), 0);
    }

    #[test]
    fn test_music_toggle() {
        let mut app = app();
        assert_eq!(
            update(&mut app, key(KeyCode::Char('m'))),
            vec![UiEffect::PlayMusic { path: None }]
        );
        assert!(app.music.playing);
        assert_eq!(
            update(&mut app, key(KeyCode::Char('m'))),
            vec![UiEffect::StopMusic]
        );
        assert!(!app.music.playing);
        assert_eq!(app.sequencer.current_index(), 0);
    }

    #[test]
    fn test_debug_toggle_changes_layout() {
        let mut app = app();
        let before = app.layout().stage.height;
        update(&mut app, key(KeyCode::F(12)));
        assert!(app.show_debug_status);
        assert_eq!(app.layout().stage.height, before - 1);
    }

    #[test]
    fn test_tick_spawns_periodic_particles() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: Duration::from_secs(4),
            },
        );
        update(&mut app, UiEvent::Tick);
        // Hearts due at 2s and 4s.
        assert_eq!(app.particles.count(ParticleKind::Heart), 2);
        // One mote per 300ms, none old enough to die yet.
        assert_eq!(app.particles.count(ParticleKind::Ambient), 13);
    }

    #[test]
    fn test_ambient_capped() {
        let mut app = app();
        let motes: Vec<_> = (0..spawn::AMBIENT_CAP)
            .map(|_| spawn::ambient(&mut app.rng, Duration::ZERO))
            .collect();
        app.particles.spawn(motes);

        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: Duration::from_secs(1),
            },
        );
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.particles.count(ParticleKind::Ambient), spawn::AMBIENT_CAP);
    }

    #[test]
    fn test_tick_prunes_dead_particles() {
        let mut app = app();
        update(&mut app, key(KeyCode::Right));
        assert_eq!(app.particles.count(ParticleKind::Pulse), 1);
        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: Duration::from_secs(1),
            },
        );
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.particles.count(ParticleKind::Pulse), 0);
    }

    #[test]
    fn test_pointer_motion_outside_stage_spawns_nothing() {
        let mut app = app();
        for _ in 0..500 {
            update(&mut app, mouse(MouseEventKind::Moved, 10, 0));
        }
        assert_eq!(app.particles.count(ParticleKind::Pointer), 0);
    }
}
