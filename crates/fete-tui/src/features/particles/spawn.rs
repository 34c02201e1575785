//! Particle spawners, one per decoration.
//!
//! Spawners are pure: they take the current time and a random source and
//! return the particles to add. Staggered effects are expressed by birth
//! times in the future, so nothing here needs a timer.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use ratatui::style::Color;

use super::{Particle, ParticleKind};

/// Hot pink, gold, deep pink, medium purple, dark turquoise.
pub const PALETTE: [Color; 5] = [
    Color::Rgb(0xff, 0x69, 0xb4),
    Color::Rgb(0xff, 0xd7, 0x00),
    Color::Rgb(0xff, 0x14, 0x93),
    Color::Rgb(0x93, 0x70, 0xdb),
    Color::Rgb(0x00, 0xce, 0xd1),
];

pub const CONFETTI_RAIN_COUNT: usize = 50;
pub const CONFETTI_BURST_COUNT: usize = 30;
pub const FIREWORK_SHELLS: usize = 15;
pub const FIREWORK_SPARKS: usize = 12;
pub const MAGICAL_SPARKLES: usize = 15;
pub const EXPLOSION_COUNT: usize = 20;
pub const CLOSING_HEARTS: usize = 5;

/// Floating hearts are spawned on this period for the whole session.
pub const HEART_PERIOD: Duration = Duration::from_secs(2);
/// Ambient particles are spawned on this period while below the cap.
pub const AMBIENT_PERIOD: Duration = Duration::from_millis(300);
pub const AMBIENT_CAP: usize = 20;

/// Delay between two closing hearts starting to beat.
pub const HEART_BEAT_STAGGER: Duration = Duration::from_millis(200);

const CONFETTI_GLYPHS: [char; 5] = ['■', '▪', '●', '◆', '▲'];
const SPARKLE_GLYPHS: [char; 4] = ['✦', '✧', '*', '+'];
const AMBIENT_GLYPHS: [char; 3] = ['·', '∘', '˚'];
const HEART_GLYPHS: [char; 2] = ['♥', '♡'];

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[char]) -> char {
    items.choose(rng).copied().unwrap_or('*')
}

fn color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    PALETTE.choose(rng).copied().unwrap_or(Color::White)
}

fn millis<R: Rng + ?Sized>(rng: &mut R, from: u64, to: u64) -> Duration {
    Duration::from_millis(rng.random_range(from..=to))
}

fn polar(angle: f32, speed: f32) -> (f32, f32) {
    (angle.cos() * speed, angle.sin() * speed)
}

/// Confetti falling from above the top edge: 50 pieces, one every 30 ms,
/// each falling for 3–5 s.
pub fn confetti_rain<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Vec<Particle> {
    (0..CONFETTI_RAIN_COUNT)
        .map(|i| {
            let lifetime = millis(rng, 3000, 5000);
            Particle {
                kind: ParticleKind::Confetti,
                glyph: pick(rng, &CONFETTI_GLYPHS),
                color: color(rng),
                origin: (rng.random_range(0.0..1.0), 0.0),
                velocity: (
                    rng.random_range(-0.05..0.05),
                    1.0 / lifetime.as_secs_f32(),
                ),
                gravity: 0.0,
                born: now + Duration::from_millis(30 * i as u64),
                lifetime,
            }
        })
        .collect()
}

/// 30 pieces thrown outward from the upper middle of the screen.
pub fn confetti_burst<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Vec<Particle> {
    (0..CONFETTI_BURST_COUNT)
        .map(|_| Particle {
            kind: ParticleKind::Burst,
            glyph: pick(rng, &CONFETTI_GLYPHS),
            color: color(rng),
            origin: (0.5, 0.2),
            velocity: polar(rng.random_range(0.0..TAU), rng.random_range(0.2..0.5)),
            gravity: 0.4,
            born: now,
            lifetime: millis(rng, 1000, 2000),
        })
        .collect()
}

/// 15 shells, one every 200 ms, each splitting into 12 sparks 30° apart.
pub fn fireworks<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(FIREWORK_SHELLS * FIREWORK_SPARKS);
    for shell in 0..FIREWORK_SHELLS {
        let center = (rng.random_range(0.15..0.85), rng.random_range(0.15..0.5));
        let shell_color = color(rng);
        let born = now + Duration::from_millis(200 * shell as u64);
        for spark in 0..FIREWORK_SPARKS {
            let angle = TAU * spark as f32 / FIREWORK_SPARKS as f32;
            particles.push(Particle {
                kind: ParticleKind::Firework,
                glyph: '•',
                color: shell_color,
                origin: center,
                velocity: polar(angle, 0.2),
                gravity: 0.1,
                born,
                lifetime: Duration::from_millis(1500),
            });
        }
    }
    particles
}

/// 15 twinkles at random spots, one every 100 ms, 2 s each.
pub fn magical_sparkles<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Vec<Particle> {
    (0..MAGICAL_SPARKLES)
        .map(|i| Particle {
            kind: ParticleKind::Sparkle,
            glyph: pick(rng, &SPARKLE_GLYPHS),
            color: color(rng),
            origin: (rng.random_range(0.05..0.95), rng.random_range(0.05..0.95)),
            velocity: (0.0, -0.02),
            gravity: 0.0,
            born: now + Duration::from_millis(100 * i as u64),
            lifetime: Duration::from_secs(2),
        })
        .collect()
}

/// 20 particles evenly spaced around `origin`, flying out for 1 s.
pub fn button_explosion<R: Rng + ?Sized>(
    rng: &mut R,
    now: Duration,
    origin: (f32, f32),
) -> Vec<Particle> {
    (0..EXPLOSION_COUNT)
        .map(|i| {
            let angle = TAU * i as f32 / EXPLOSION_COUNT as f32;
            Particle {
                kind: ParticleKind::Explosion,
                glyph: pick(rng, &SPARKLE_GLYPHS),
                color: color(rng),
                origin,
                velocity: polar(angle, rng.random_range(0.25..0.4)),
                gravity: 0.0,
                born: now,
                lifetime: Duration::from_secs(1),
            }
        })
        .collect()
}

/// One heart rising from the bottom edge over 8 s.
pub fn floating_heart<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Particle {
    let lifetime = Duration::from_secs(8);
    Particle {
        kind: ParticleKind::Heart,
        glyph: pick(rng, &HEART_GLYPHS),
        color: PALETTE[0],
        origin: (rng.random_range(0.0..1.0), 0.999),
        velocity: (0.0, -1.0 / lifetime.as_secs_f32()),
        gravity: 0.0,
        born: now,
        lifetime,
    }
}

/// One slow-drifting background mote, alive for 4–8 s.
pub fn ambient<R: Rng + ?Sized>(rng: &mut R, now: Duration) -> Particle {
    Particle {
        kind: ParticleKind::Ambient,
        glyph: pick(rng, &AMBIENT_GLYPHS),
        color: Color::Rgb(0xff, 0xb6, 0xc1),
        origin: (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)),
        velocity: (rng.random_range(-0.02..0.02), rng.random_range(-0.04..-0.01)),
        gravity: 0.0,
        born: now,
        lifetime: millis(rng, 4000, 8000),
    }
}

/// Sparkles trailing the pointer: a 5% chance of a 1 s sparkle plus a 2%
/// chance of a softer 1.5 s one.
pub fn pointer_sparkles<R: Rng + ?Sized>(
    rng: &mut R,
    now: Duration,
    at: (f32, f32),
) -> Vec<Particle> {
    let mut particles = Vec::new();
    if rng.random_bool(0.05) {
        particles.push(Particle {
            kind: ParticleKind::Pointer,
            glyph: '✦',
            color: PALETTE[1],
            origin: at,
            velocity: (0.0, -0.05),
            gravity: 0.0,
            born: now,
            lifetime: Duration::from_secs(1),
        });
    }
    if rng.random_bool(0.02) {
        particles.push(Particle {
            kind: ParticleKind::Pointer,
            glyph: '✧',
            color: color(rng),
            origin: at,
            velocity: (rng.random_range(-0.03..0.03), -0.03),
            gravity: 0.0,
            born: now,
            lifetime: Duration::from_millis(1500),
        });
    }
    particles
}

/// Expanding ring shown while a section exits.
pub fn transition_pulse(now: Duration) -> Particle {
    Particle {
        kind: ParticleKind::Pulse,
        glyph: '·',
        color: PALETTE[3],
        origin: (0.5, 0.5),
        velocity: (0.0, 0.0),
        gravity: 0.0,
        born: now,
        lifetime: Duration::from_millis(800),
    }
}
