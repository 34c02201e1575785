//! Particle feature slice.
//!
//! Every decoration (confetti, fireworks, sparkles, hearts, the transition
//! pulse) is a set of short-lived particles. A particle's position is a pure
//! function of its age, so the field only needs the current time to draw and
//! prune; there is no per-frame integration step.
//!
//! Coordinates are fractions of the drawing area (`0.0..=1.0` on both axes),
//! which keeps spawners independent of terminal size.
//!
//! ## Module Structure
//!
//! - `mod.rs`: `Particle`, `ParticleField`, and the `ParticleLayer` widget
//! - `spawn.rs`: one spawner per decoration

pub mod spawn;

use std::f32::consts::TAU;
use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier};
use ratatui::widgets::Widget;

/// Which decoration a particle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Confetti,
    Burst,
    Firework,
    Sparkle,
    Explosion,
    Heart,
    Ambient,
    Pointer,
    /// Expanding ring drawn instead of a single glyph.
    Pulse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub glyph: char,
    pub color: Color,
    /// Start position, in area fractions.
    pub origin: (f32, f32),
    /// Area fractions per second.
    pub velocity: (f32, f32),
    /// Downward acceleration, area fractions per second squared.
    pub gravity: f32,
    /// First moment the particle is visible. Staggered spawns are born in
    /// the future.
    pub born: Duration,
    pub lifetime: Duration,
}

impl Particle {
    /// Time since birth, or `None` if not born yet.
    pub fn age(&self, now: Duration) -> Option<Duration> {
        now.checked_sub(self.born)
    }

    /// 0 = just born, 1 = about to die.
    pub fn normalized_age(&self, now: Duration) -> f32 {
        match self.age(now) {
            Some(age) if !self.lifetime.is_zero() => {
                (age.as_secs_f32() / self.lifetime.as_secs_f32()).clamp(0.0, 1.0)
            }
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    pub fn is_dead(&self, now: Duration) -> bool {
        now >= self.born + self.lifetime
    }

    pub fn is_visible(&self, now: Duration) -> bool {
        now >= self.born && !self.is_dead(now)
    }

    /// Current position in area fractions, if visible.
    pub fn position(&self, now: Duration) -> Option<(f32, f32)> {
        if !self.is_visible(now) {
            return None;
        }
        let t = self.age(now)?.as_secs_f32();
        let x = self.origin.0 + self.velocity.0 * t;
        let y = self.origin.1 + self.velocity.1 * t + 0.5 * self.gravity * t * t;
        Some((x, y))
    }

    fn is_fading(&self, now: Duration) -> bool {
        self.normalized_age(now) > 0.7
    }
}

/// Live particles, oldest first.
#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn spawn(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Drops every particle whose lifetime elapsed.
    pub fn prune(&mut self, now: Duration) {
        self.particles.retain(|p| !p.is_dead(now));
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn count(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Widget drawing the field as it looks at `now`.
    pub fn layer(&self, now: Duration) -> ParticleLayer<'_> {
        ParticleLayer { field: self, now }
    }
}

/// Draws particles over whatever is already in the buffer.
pub struct ParticleLayer<'a> {
    field: &'a ParticleField,
    now: Duration,
}

/// Points plotted along a pulse ring.
const RING_POINTS: usize = 32;

impl Widget for ParticleLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        for particle in self.field.iter() {
            let Some(center) = particle.position(self.now) else {
                continue;
            };
            let mut modifier = Modifier::empty();
            if particle.is_fading(self.now) {
                modifier |= Modifier::DIM;
            }

            if particle.kind == ParticleKind::Pulse {
                let radius = 0.05 + 0.45 * particle.normalized_age(self.now);
                for i in 0..RING_POINTS {
                    let angle = TAU * i as f32 / RING_POINTS as f32;
                    let point = (
                        center.0 + radius * angle.cos(),
                        center.1 + radius * angle.sin(),
                    );
                    plot(buf, area, point, particle.glyph, particle.color, modifier);
                }
            } else {
                plot(buf, area, center, particle.glyph, particle.color, modifier);
            }
        }
    }
}

/// Maps an area fraction to a cell, returning `None` off-screen.
pub fn to_cell(area: Rect, (x, y): (f32, f32)) -> Option<(u16, u16)> {
    if !(0.0..1.0).contains(&x) || !(0.0..1.0).contains(&y) {
        return None;
    }
    let col = area.x + (x * f32::from(area.width)) as u16;
    let row = area.y + (y * f32::from(area.height)) as u16;
    (col < area.right() && row < area.bottom()).then_some((col, row))
}

/// Maps a cell back to the area fraction at its center.
pub fn to_fraction(area: Rect, col: u16, row: u16) -> (f32, f32) {
    let width = f32::from(area.width.max(1));
    let height = f32::from(area.height.max(1));
    (
        (f32::from(col.saturating_sub(area.x)) + 0.5) / width,
        (f32::from(row.saturating_sub(area.y)) + 0.5) / height,
    )
}

fn plot(
    buf: &mut Buffer,
    area: Rect,
    point: (f32, f32),
    glyph: char,
    color: Color,
    modifier: Modifier,
) {
    let Some(cell) = to_cell(area, point) else {
        return;
    };
    if let Some(cell) = buf.cell_mut(cell) {
        cell.set_char(glyph).set_fg(color);
        if !modifier.is_empty() {
            cell.modifier.insert(modifier);
        }
    }
}
