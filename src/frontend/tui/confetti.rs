//! Confetti particle overlay.
//!
//! Physics parameters come from the config in browser units (pixels per
//! frame at 60 FPS) and are scaled to terminal cells per second here. Pieces
//! are not recycled: once a piece falls past the bottom edge it is gone.

use crate::config::CelebrationConfig;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};
use std::time::{Duration, Instant};

const REFERENCE_FPS: f32 = 60.0;
const PX_PER_COL: f32 = 8.0;
const PX_PER_ROW: f32 = 16.0;
const MAX_INITIAL_VX: f32 = 4.0;

const GLYPHS: [char; 6] = ['*', '•', '▪', '◆', '✦', '+'];

const COLORS: [Color; 12] = [
    Color::Rgb(0xf4, 0x43, 0x36),
    Color::Rgb(0xe9, 0x1e, 0x63),
    Color::Rgb(0x9c, 0x27, 0xb0),
    Color::Rgb(0x3f, 0x51, 0xb5),
    Color::Rgb(0x21, 0x96, 0xf3),
    Color::Rgb(0x00, 0xbc, 0xd4),
    Color::Rgb(0x00, 0x96, 0x88),
    Color::Rgb(0x4c, 0xaf, 0x50),
    Color::Rgb(0xcd, 0xdc, 0x39),
    Color::Rgb(0xff, 0xeb, 0x3b),
    Color::Rgb(0xff, 0x98, 0x00),
    Color::Rgb(0xff, 0x57, 0x22),
];

#[derive(Debug, Clone)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    glyph: char,
    color: Color,
}

/// A single burst of confetti sized to the area it was spawned in
#[derive(Debug, Clone)]
pub struct Confetti {
    particles: Vec<Particle>,
    area: Rect,
    gravity: f32,
    wind: f32,
}

impl Confetti {
    /// Spawn a burst above the top edge of `area`
    pub fn spawn<R: Rng>(config: &CelebrationConfig, area: Rect, rng: &mut R) -> Self {
        let width = f32::from(area.width.max(1));
        let height = f32::from(area.height.max(1));

        // Negative initial velocity means "launched downward" in the browser library
        let max_vy = config.initial_velocity_y.abs();

        let particles = (0..config.pieces)
            .map(|_| Particle {
                x: rng.gen_range(0.0..width),
                y: -rng.gen_range(0.0..height),
                vx: px_to_cols_per_sec(rng.gen_range(-MAX_INITIAL_VX..=MAX_INITIAL_VX)),
                vy: px_to_rows_per_sec(rng.gen_range(0.0..=max_vy)),
                glyph: GLYPHS[rng.gen_range(0..GLYPHS.len())],
                color: COLORS[rng.gen_range(0..COLORS.len())],
            })
            .collect();

        tracing::debug!(
            "Spawned {} confetti pieces in {}x{}",
            config.pieces,
            area.width,
            area.height
        );

        Self {
            particles,
            area,
            gravity: px_to_rows_per_sec2(config.gravity),
            wind: px_to_cols_per_sec2(config.wind),
        }
    }

    /// Advance the simulation and drop pieces that left the bottom edge
    pub fn step(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        let bottom = f32::from(self.area.height);

        for p in &mut self.particles {
            p.vy += self.gravity * dt;
            p.vx += self.wind * dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.particles.retain(|p| p.y < bottom);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Stretch the burst onto a resized area, keeping each piece's relative
    /// position
    pub fn rescale(&mut self, area: Rect) {
        let sx = f32::from(area.width.max(1)) / f32::from(self.area.width.max(1));
        let sy = f32::from(area.height.max(1)) / f32::from(self.area.height.max(1));
        for p in &mut self.particles {
            p.x *= sx;
            p.y *= sy;
        }
        self.area = area;
    }

    /// Draw every on-screen piece over whatever is already in `buf`
    pub fn render(&self, buf: &mut Buffer) {
        let area = self.area.intersection(buf.area);
        for p in &self.particles {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let x = self.area.x.saturating_add(p.x as u16);
            let y = self.area.y.saturating_add(p.y as u16);
            if !area.contains(Position::new(x, y)) {
                continue;
            }
            buf[(x, y)].set_char(p.glyph).set_fg(p.color);
        }
    }
}

/// Confetti lifecycle following the celebration flag: a burst is spawned
/// when the flag turns on, stepped once per frame and dropped when it ends.
pub struct ConfettiOverlay {
    burst: Option<Confetti>,
    last_frame: Option<Instant>,
    rng: StdRng,
}

impl ConfettiOverlay {
    pub fn new(rng: StdRng) -> Self {
        Self {
            burst: None,
            last_frame: None,
            rng,
        }
    }

    pub fn update(
        &mut self,
        visible: bool,
        config: &CelebrationConfig,
        instant: Instant,
        area: Rect,
    ) {
        let elapsed = self
            .last_frame
            .map(|last| instant.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(instant);

        if !visible {
            if let Some(burst) = self.burst.take() {
                tracing::debug!("Confetti hidden ({} pieces still falling)", burst.len());
            }
            return;
        }

        match &mut self.burst {
            Some(burst) => {
                if burst.area() != area {
                    burst.rescale(area);
                }
                burst.step(elapsed);
            }
            None => self.burst = Some(Confetti::spawn(config, area, &mut self.rng)),
        }
    }

    /// True while pieces are still falling, so frames must keep coming
    pub fn is_animating(&self) -> bool {
        self.burst.as_ref().is_some_and(|b| !b.is_finished())
    }

    pub fn burst(&self) -> Option<&Confetti> {
        self.burst.as_ref()
    }
}

fn px_to_cols_per_sec(v: f32) -> f32 {
    v * REFERENCE_FPS / PX_PER_COL
}

fn px_to_rows_per_sec(v: f32) -> f32 {
    v * REFERENCE_FPS / PX_PER_ROW
}

fn px_to_cols_per_sec2(a: f32) -> f32 {
    a * REFERENCE_FPS * REFERENCE_FPS / PX_PER_COL
}

fn px_to_rows_per_sec2(a: f32) -> f32 {
    a * REFERENCE_FPS * REFERENCE_FPS / PX_PER_ROW
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn burst(pieces: usize, area: Rect) -> Confetti {
        let config = CelebrationConfig {
            pieces,
            ..CelebrationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        Confetti::spawn(&config, area, &mut rng)
    }

    #[test]
    fn test_spawn_count_and_position() {
        let confetti = burst(500, Rect::new(0, 0, 80, 24));
        assert_eq!(confetti.len(), 500);
        assert!(confetti
            .particles
            .iter()
            .all(|p| p.y <= 0.0 && p.x >= 0.0 && p.x < 80.0 && p.vy >= 0.0));
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut confetti = burst(1, Rect::new(0, 0, 80, 1000));
        let before = confetti.particles[0].clone();
        confetti.step(Duration::from_millis(100));
        let after = &confetti.particles[0];
        assert!(after.vy > before.vy);
        assert!(after.y > before.y);
    }

    #[test]
    fn test_wind_pushes_right() {
        let mut confetti = burst(1, Rect::new(0, 0, 80, 1000));
        let vx = confetti.particles[0].vx;
        confetti.step(Duration::from_millis(100));
        assert!(confetti.particles[0].vx > vx);
    }

    #[test]
    fn test_pieces_are_not_recycled() {
        let mut confetti = burst(200, Rect::new(0, 0, 40, 12));
        for _ in 0..100 {
            confetti.step(Duration::from_millis(100));
        }
        assert!(confetti.is_finished());
    }

    #[test]
    fn test_render_stays_inside_area() {
        let area = Rect::new(2, 1, 20, 10);
        let mut confetti = burst(300, area);
        confetti.step(Duration::from_millis(600));

        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 15));
        confetti.render(&mut buf);

        let mut drawn = 0;
        for y in 0..15 {
            for x in 0..30 {
                if buf[(x, y)].symbol() != " " {
                    drawn += 1;
                    assert!(area.contains((x, y).into()), "piece outside at {},{}", x, y);
                }
            }
        }
        assert!(drawn > 0);
    }

    #[test]
    fn test_rescale_keeps_relative_position() {
        let mut confetti = burst(50, Rect::new(0, 0, 40, 20));
        confetti.step(Duration::from_millis(500));
        let before: Vec<(f32, f32)> = confetti.particles.iter().map(|p| (p.x, p.y)).collect();

        confetti.rescale(Rect::new(0, 0, 80, 10));
        assert_eq!(confetti.area(), Rect::new(0, 0, 80, 10));
        assert_eq!(confetti.len(), 50);
        for (p, (x, y)) in confetti.particles.iter().zip(before) {
            assert!((p.x - x * 2.0).abs() < 1e-3);
            assert!((p.y - y * 0.5).abs() < 1e-3);
        }
    }

    fn overlay() -> ConfettiOverlay {
        ConfettiOverlay::new(StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_overlay_animates_from_first_update() {
        let config = CelebrationConfig::default();
        let area = Rect::new(0, 0, 80, 24);
        let start = Instant::now();
        let mut overlay = overlay();

        overlay.update(false, &config, start, area);
        assert!(!overlay.is_animating());

        overlay.update(true, &config, start, area);
        assert!(overlay.is_animating());
        assert_eq!(overlay.burst().map(Confetti::len), Some(config.pieces));

        overlay.update(false, &config, start + Duration::from_secs(1), area);
        assert!(!overlay.is_animating());
        assert!(overlay.burst().is_none());
    }

    #[test]
    fn test_overlay_steps_by_frame_time() {
        let config = CelebrationConfig {
            pieces: 1,
            ..CelebrationConfig::default()
        };
        let area = Rect::new(0, 0, 80, 1000);
        let start = Instant::now();
        let mut overlay = overlay();

        overlay.update(true, &config, start, area);
        let spawned = overlay.burst().unwrap().particles[0].clone();
        overlay.update(true, &config, start + Duration::from_millis(33), area);
        let moved = &overlay.burst().unwrap().particles[0];

        let expected_vy = spawned.vy + px_to_rows_per_sec2(config.gravity) * 0.033;
        assert!((moved.vy - expected_vy).abs() < 1e-2);
    }

    #[test]
    fn test_overlay_resize_keeps_burst() {
        let config = CelebrationConfig::default();
        let start = Instant::now();
        let mut overlay = overlay();

        overlay.update(true, &config, start, Rect::new(0, 0, 80, 24));
        overlay.update(true, &config, start + Duration::from_millis(500), Rect::new(0, 0, 80, 24));
        let remaining = overlay.burst().unwrap().len();
        let lowest = overlay
            .burst()
            .unwrap()
            .particles
            .iter()
            .map(|p| p.y)
            .fold(f32::MIN, f32::max);

        overlay.update(true, &config, start + Duration::from_millis(500), Rect::new(0, 0, 120, 48));
        let burst = overlay.burst().unwrap();
        assert_eq!(burst.area(), Rect::new(0, 0, 120, 48));
        assert_eq!(burst.len(), remaining);
        // Pieces already on screen stay there instead of restarting at the top
        assert!(lowest > 0.0);
        let rescaled = burst.particles.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!((rescaled - lowest * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_unit_scaling() {
        assert_eq!(px_to_rows_per_sec(16.0), 60.0);
        assert!((px_to_cols_per_sec2(8.0 / 3600.0) - 1.0).abs() < 1e-4);
    }
}
