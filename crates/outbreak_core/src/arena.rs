//! Procedural arena generation with a reachability guarantee.
//!
//! Rectangular obstacles are scattered by rejection sampling, then the
//! playable area is rasterized onto a coarse grid and flood-filled from
//! the arena center. Any spawn point the fill cannot reach triggers a
//! repair pass that removes obstacles around it until it becomes
//! reachable. Placement loops are bounded; exhausting the budget
//! surfaces [`GameError::GenerationFailed`] so callers can retry with a
//! fresh seed.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::Rect;
use crate::error::{GameError, Result};
use crate::math::Vec2;

/// Side length of one walk-grid cell in world units.
pub const CELL_SIZE: f32 = 10.0;

/// Distance obstacle anchors keep from the playable edges.
const ANCHOR_MARGIN: f32 = 50.0;

/// Spawn points sit this far inside the playable corners and edges.
const SPAWN_INSET: f32 = 50.0;

/// Half-extent of the square cleared around an unreachable spawn point.
const SPAWN_CLEAR_HALF: f32 = 50.0;

/// Rejection-sampling budget per obstacle.
const PLACEMENT_ATTEMPTS: u32 = 256;

/// Arena generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Total arena width in world units (border included).
    pub width: f32,
    /// Total arena height in world units (border included).
    pub height: f32,
    /// Unplayable border on every side.
    pub border: f32,
    /// Number of large obstacles (side 100-300).
    pub large_obstacles: u32,
    /// Number of small obstacles (side 50-150).
    pub small_obstacles: u32,
    /// Radius around each spawn point where obstacle anchors are rejected.
    pub safe_radius: f32,
    /// Seed for deterministic generation.
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            border: 50.0,
            large_obstacles: 8,
            small_obstacles: 15,
            safe_radius: 100.0,
            seed: 0,
        }
    }
}

impl ArenaConfig {
    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the arena dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the obstacle counts.
    #[must_use]
    pub const fn with_obstacle_counts(mut self, large: u32, small: u32) -> Self {
        self.large_obstacles = large;
        self.small_obstacles = small;
        self
    }

    /// The playable rectangle (arena inset by the border).
    #[must_use]
    pub fn playable(&self) -> Rect {
        Rect::new(
            self.border,
            self.border,
            self.width - 2.0 * self.border,
            self.height - 2.0 * self.border,
        )
    }

    /// The eight fixed spawn points: playable corners and edge
    /// midpoints, inset by 50 units.
    #[must_use]
    pub fn spawn_points(&self) -> Vec<Vec2> {
        let p = self.playable();
        let (left, top) = (p.x + SPAWN_INSET, p.y + SPAWN_INSET);
        let (right, bottom) = (p.right() - SPAWN_INSET, p.bottom() - SPAWN_INSET);
        let center = p.center();
        vec![
            Vec2::new(left, top),
            Vec2::new(right, top),
            Vec2::new(left, bottom),
            Vec2::new(right, bottom),
            Vec2::new(center.x, top),
            Vec2::new(center.x, bottom),
            Vec2::new(left, center.y),
            Vec2::new(right, center.y),
        ]
    }

    fn validate(&self) -> Result<()> {
        let p = self.playable();
        if p.w < 4.0 * ANCHOR_MARGIN || p.h < 4.0 * ANCHOR_MARGIN {
            return Err(GameError::invalid_config(
                "arena",
                format!("playable area {}x{} too small", p.w, p.h),
            ));
        }
        Ok(())
    }
}

/// Coarse occupancy grid over the playable area.
///
/// Backed by a flat `Vec<bool>` indexed directly by cell coordinates;
/// one cell per [`CELL_SIZE`] square of world space.
#[derive(Debug, Clone)]
pub struct WalkGrid {
    width: usize,
    height: usize,
    origin: Vec2,
    blocked: Vec<bool>,
}

impl WalkGrid {
    /// Create an all-walkable grid covering `playable`.
    #[must_use]
    pub fn new(playable: &Rect) -> Self {
        let width = (playable.w / CELL_SIZE) as usize;
        let height = (playable.h / CELL_SIZE) as usize;
        Self {
            width,
            height,
            origin: Vec2::new(playable.x, playable.y),
            blocked: vec![false; width * height],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Convert (x, y) cell coordinates to a flat index.
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Whether a cell is blocked by an obstacle.
    #[must_use]
    pub fn is_blocked(&self, x: usize, y: usize) -> bool {
        self.blocked[self.index(x, y)]
    }

    /// The cell containing a world position, if inside the grid.
    #[must_use]
    pub fn cell_of(&self, point: Vec2) -> Option<(usize, usize)> {
        let x = ((point.x - self.origin.x) / CELL_SIZE).floor();
        let y = ((point.y - self.origin.y) / CELL_SIZE).floor();
        if x >= 0.0 && y >= 0.0 && (x as usize) < self.width && (y as usize) < self.height {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    /// The cell at the geometric center of the grid.
    #[must_use]
    pub const fn center_cell(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Mark every cell under `rect` as blocked, clipping to the grid.
    pub fn block_rect(&mut self, rect: &Rect) {
        let x_start = (((rect.x - self.origin.x) / CELL_SIZE).floor()).max(0.0) as usize;
        let y_start = (((rect.y - self.origin.y) / CELL_SIZE).floor()).max(0.0) as usize;
        let x_end = ((((rect.right() - self.origin.x) / CELL_SIZE).floor()).max(0.0) as usize)
            .min(self.width);
        let y_end = ((((rect.bottom() - self.origin.y) / CELL_SIZE).floor()).max(0.0) as usize)
            .min(self.height);
        for y in y_start..y_end {
            for x in x_start..x_end {
                let idx = self.index(x, y);
                self.blocked[idx] = true;
            }
        }
    }

    /// 4-connected flood fill from a start cell using an explicit
    /// worklist. Returns one reachability flag per cell.
    #[must_use]
    pub fn flood_from(&self, start_x: usize, start_y: usize) -> Vec<bool> {
        let mut reachable = vec![false; self.blocked.len()];
        if self.is_blocked(start_x, start_y) {
            return reachable;
        }
        let mut worklist = VecDeque::new();
        reachable[self.index(start_x, start_y)] = true;
        worklist.push_back((start_x, start_y));
        while let Some((x, y)) = worklist.pop_front() {
            let neighbors = [
                (x.wrapping_add(1), y),
                (x.wrapping_sub(1), y),
                (x, y.wrapping_add(1)),
                (x, y.wrapping_sub(1)),
            ];
            for (nx, ny) in neighbors {
                if nx >= self.width || ny >= self.height {
                    continue;
                }
                let idx = self.index(nx, ny);
                if !reachable[idx] && !self.blocked[idx] {
                    reachable[idx] = true;
                    worklist.push_back((nx, ny));
                }
            }
        }
        reachable
    }
}

/// A finalized arena: immutable obstacle set, playable bounds, and the
/// fixed spawn-point list. Every spawn point is reachable from the
/// arena center through obstacle-free grid cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    config: ArenaConfig,
    playable: Rect,
    spawn_points: Vec<Vec2>,
    obstacles: Vec<Rect>,
}

impl Arena {
    /// Generate an arena from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GenerationFailed`] when placement or
    /// reachability repair exhausts its budget; retry with a fresh seed.
    pub fn generate(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        let playable = config.playable();
        let spawn_points = config.spawn_points();
        let mut rng = Pcg32::seed_from_u64(config.seed);

        let mut obstacles =
            Vec::with_capacity((config.large_obstacles + config.small_obstacles) as usize);
        for _ in 0..config.large_obstacles {
            let rect = place_obstacle(&mut rng, &config, &spawn_points, 100.0..=300.0, |_| true)?;
            obstacles.push(rect);
        }
        for _ in 0..config.small_obstacles {
            let rect = place_obstacle(&mut rng, &config, &spawn_points, 50.0..=150.0, |cand| {
                obstacles.iter().filter(|o| cand.intersects(o)).count() < 2
            })?;
            obstacles.push(rect);
        }

        repair_reachability(&mut obstacles, &playable, &spawn_points)?;

        debug!(
            seed = config.seed,
            obstacles = obstacles.len(),
            "arena generated"
        );
        Ok(Self {
            config,
            playable,
            spawn_points,
            obstacles,
        })
    }

    /// Build an arena from a fixed obstacle set, skipping generation.
    ///
    /// No reachability guarantee is enforced; intended for tests and
    /// scripted scenarios.
    #[must_use]
    pub fn from_parts(config: ArenaConfig, obstacles: Vec<Rect>) -> Self {
        let playable = config.playable();
        let spawn_points = config.spawn_points();
        Self {
            config,
            playable,
            spawn_points,
            obstacles,
        }
    }

    /// The configuration the arena was generated from.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The playable rectangle.
    #[must_use]
    pub const fn playable(&self) -> &Rect {
        &self.playable
    }

    /// The geometric center of the playable area.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.playable.center()
    }

    /// The immutable obstacle set.
    #[must_use]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// The fixed spawn-point list.
    #[must_use]
    pub fn spawn_points(&self) -> &[Vec2] {
        &self.spawn_points
    }

    /// True if a character box of `half` extent at `point` overlaps no
    /// obstacle footprint.
    #[must_use]
    pub fn spawn_is_clear(&self, point: Vec2, half: f32) -> bool {
        let rect = Rect::from_center(point, half);
        !self.obstacles.iter().any(|o| rect.intersects(o))
    }

    /// Rasterize the obstacle set onto a fresh walk grid.
    #[must_use]
    pub fn rasterize(&self) -> WalkGrid {
        rasterize(&self.playable, &self.obstacles)
    }
}

fn rasterize(playable: &Rect, obstacles: &[Rect]) -> WalkGrid {
    let mut grid = WalkGrid::new(playable);
    for obstacle in obstacles {
        grid.block_rect(obstacle);
    }
    grid
}

fn in_safe_zone(point: Vec2, spawn_points: &[Vec2], safe_radius: f32) -> bool {
    spawn_points.iter().any(|sp| point.distance(*sp) < safe_radius)
}

/// Rejection-sample one obstacle; `accept` adds the caller's extra
/// acceptance predicate on top of spawn-safety.
fn place_obstacle(
    rng: &mut Pcg32,
    config: &ArenaConfig,
    spawn_points: &[Vec2],
    side: std::ops::RangeInclusive<f32>,
    mut accept: impl FnMut(&Rect) -> bool,
) -> Result<Rect> {
    let playable = config.playable();
    for _ in 0..PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(playable.x + ANCHOR_MARGIN..=playable.right() - ANCHOR_MARGIN);
        let y = rng.gen_range(playable.y + ANCHOR_MARGIN..=playable.bottom() - ANCHOR_MARGIN);
        let w = rng.gen_range(side.clone());
        let h = rng.gen_range(side.clone());
        let candidate = Rect::new(x, y, w, h);
        if in_safe_zone(Vec2::new(x, y), spawn_points, config.safe_radius) {
            continue;
        }
        if accept(&candidate) {
            return Ok(candidate);
        }
    }
    Err(GameError::GenerationFailed(format!(
        "no valid obstacle placement in {PLACEMENT_ATTEMPTS} attempts"
    )))
}

/// Remove obstacles until the arena center can reach every spawn point.
///
/// Removal only ever grows the reachable set, and each pass removes one
/// obstacle, so the loop terminates after at most `obstacles.len()`
/// removals per target.
fn repair_reachability(
    obstacles: &mut Vec<Rect>,
    playable: &Rect,
    spawn_points: &[Vec2],
) -> Result<()> {
    let mut grid = rasterize(playable, obstacles);
    let (center_x, center_y) = grid.center_cell();

    // The fill seed itself must be free, or nothing is reachable.
    while grid.is_blocked(center_x, center_y) {
        let square = Rect::from_center(playable.center(), SPAWN_CLEAR_HALF);
        let Some(i) = obstacles.iter().position(|o| o.intersects(&square)) else {
            return Err(GameError::GenerationFailed(
                "arena center blocked with no removable obstacle".into(),
            ));
        };
        obstacles.remove(i);
        grid = rasterize(playable, obstacles);
    }

    let mut reachable = grid.flood_from(center_x, center_y);
    for spawn in spawn_points {
        loop {
            let Some((sx, sy)) = grid.cell_of(*spawn) else {
                return Err(GameError::GenerationFailed(format!(
                    "spawn point ({}, {}) outside the walk grid",
                    spawn.x, spawn.y
                )));
            };
            if reachable[grid.index(sx, sy)] {
                break;
            }
            let square = Rect::from_center(*spawn, SPAWN_CLEAR_HALF);
            let Some(i) = obstacles.iter().position(|o| o.intersects(&square)) else {
                return Err(GameError::GenerationFailed(format!(
                    "spawn point ({}, {}) unreachable with no removable obstacle",
                    spawn.x, spawn.y
                )));
            };
            obstacles.remove(i);
            grid = rasterize(playable, obstacles);
            reachable = grid.flood_from(center_x, center_y);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_spawns_reachable(arena: &Arena) {
        let grid = arena.rasterize();
        let (cx, cy) = grid.center_cell();
        let reachable = grid.flood_from(cx, cy);
        for spawn in arena.spawn_points() {
            let (sx, sy) = grid.cell_of(*spawn).expect("spawn inside grid");
            assert!(
                reachable[grid.index(sx, sy)],
                "spawn ({}, {}) not reachable from center",
                spawn.x,
                spawn.y
            );
        }
    }

    #[test]
    fn test_default_config() {
        let config = ArenaConfig::default();
        assert_eq!(config.large_obstacles, 8);
        assert_eq!(config.small_obstacles, 15);
        assert_eq!(config.spawn_points().len(), 8);
    }

    #[test]
    fn test_playable_inset_by_border() {
        let config = ArenaConfig::default();
        let p = config.playable();
        assert_eq!(p, Rect::new(50.0, 50.0, 1820.0, 980.0));
    }

    #[test]
    fn test_generate_reachability() {
        for seed in 0..16 {
            let arena = Arena::generate(ArenaConfig::default().with_seed(seed))
                .expect("generation should succeed");
            assert_spawns_reachable(&arena);
        }
    }

    #[test]
    fn test_generate_determinism() {
        let a = Arena::generate(ArenaConfig::default().with_seed(42)).unwrap();
        let b = Arena::generate(ArenaConfig::default().with_seed(42)).unwrap();
        assert_eq!(a.obstacles(), b.obstacles());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Arena::generate(ArenaConfig::default().with_seed(1)).unwrap();
        let b = Arena::generate(ArenaConfig::default().with_seed(2)).unwrap();
        assert_ne!(a.obstacles(), b.obstacles());
    }

    #[test]
    fn test_anchors_avoid_spawn_safe_zones() {
        let arena = Arena::generate(ArenaConfig::default().with_seed(7)).unwrap();
        // Repair may remove obstacles, never move them, so every
        // surviving anchor still respects the safe radius.
        for o in arena.obstacles() {
            for spawn in arena.spawn_points() {
                assert!(Vec2::new(o.x, o.y).distance(*spawn) >= arena.config().safe_radius);
            }
        }
    }

    #[test]
    fn test_obstacle_counts_bounded() {
        let arena = Arena::generate(ArenaConfig::default().with_seed(3)).unwrap();
        assert!(arena.obstacles().len() <= 23);
    }

    #[test]
    fn test_tiny_arena_rejected() {
        let config = ArenaConfig::default().with_size(200.0, 200.0);
        assert!(Arena::generate(config).is_err());
    }

    #[test]
    fn test_walk_grid_block_and_fill() {
        let playable = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut grid = WalkGrid::new(&playable);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 10);

        // Full-height wall at x = 50..60 splits the grid.
        grid.block_rect(&Rect::new(50.0, 0.0, 10.0, 100.0));
        let reachable = grid.flood_from(0, 0);
        assert!(reachable[grid.index(4, 9)]);
        assert!(!reachable[grid.index(6, 0)]);
    }

    #[test]
    fn test_flood_from_blocked_cell_reaches_nothing() {
        let playable = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut grid = WalkGrid::new(&playable);
        grid.block_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
        let reachable = grid.flood_from(0, 0);
        assert!(reachable.iter().all(|r| !r));
    }

    #[test]
    fn test_spawn_is_clear() {
        let config = ArenaConfig::default();
        let spawn = config.spawn_points()[0];
        let blocked = Arena::from_parts(config, vec![Rect::from_center(spawn, 30.0)]);
        assert!(!blocked.spawn_is_clear(spawn, 20.0));
        let open = Arena::from_parts(config, Vec::new());
        assert!(open.spawn_is_clear(spawn, 20.0));
    }
}
