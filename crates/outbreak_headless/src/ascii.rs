//! ASCII rendering of arenas and world snapshots.
//!
//! Quick terminal eyeballing of generation quality and match state:
//! `#` obstacle, `+` spawn point, `S` survivor, `I` infected, `*`
//! bullet, `.` open ground.

use outbreak_core::prelude::*;

/// ASCII viewport configuration.
#[derive(Debug, Clone, Copy)]
pub struct AsciiConfig {
    /// Viewport width in characters.
    pub width: usize,
    /// Viewport height in characters.
    pub height: usize,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            width: 91,
            height: 28,
        }
    }
}

struct Canvas {
    config: AsciiConfig,
    playable: Rect,
    cells: Vec<char>,
}

impl Canvas {
    fn new(config: AsciiConfig, playable: Rect) -> Self {
        Self {
            config,
            playable,
            cells: vec!['.'; config.width * config.height],
        }
    }

    fn to_cell(&self, point: Vec2) -> (usize, usize) {
        let fx = (point.x - self.playable.x) / self.playable.w;
        let fy = (point.y - self.playable.y) / self.playable.h;
        let x = ((fx * self.config.width as f32) as usize).min(self.config.width - 1);
        let y = ((fy * self.config.height as f32) as usize).min(self.config.height - 1);
        (x, y)
    }

    fn plot(&mut self, point: Vec2, glyph: char) {
        let (x, y) = self.to_cell(point);
        self.cells[y * self.config.width + x] = glyph;
    }

    fn fill_rect(&mut self, rect: &Rect, glyph: char) {
        let (x0, y0) = self.to_cell(Vec2::new(rect.x, rect.y));
        let (x1, y1) = self.to_cell(Vec2::new(rect.right(), rect.bottom()));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.cells[y * self.config.width + x] = glyph;
            }
        }
    }

    fn finish(self) -> String {
        let mut out = String::with_capacity((self.config.width + 1) * self.config.height);
        for row in self.cells.chunks(self.config.width) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

/// Render an arena: obstacles and spawn points.
#[must_use]
pub fn render_arena(arena: &Arena, config: AsciiConfig) -> String {
    let mut canvas = Canvas::new(config, *arena.playable());
    for obstacle in arena.obstacles() {
        canvas.fill_rect(obstacle, '#');
    }
    for spawn in arena.spawn_points() {
        canvas.plot(*spawn, '+');
    }
    canvas.finish()
}

/// Render one frame of a running match.
#[must_use]
pub fn render_session(session: &MatchSession, config: AsciiConfig) -> String {
    let mut canvas = Canvas::new(config, *session.arena().playable());
    for obstacle in session.arena().obstacles() {
        canvas.fill_rect(obstacle, '#');
    }
    for bullet in session.bullets() {
        canvas.plot(bullet.position, '*');
    }
    for ch in session.roster() {
        if ch.is_alive() {
            let glyph = match ch.faction {
                Faction::Survivor => 'S',
                Faction::Infected => 'I',
            };
            canvas.plot(ch.position, glyph);
        }
    }
    canvas.finish()
}
