//! Match session: the fixed-tick simulation loop.
//!
//! One [`MatchSession`] owns the full world state for the duration of
//! a match. Each call to [`MatchSession::tick`] runs the step sequence
//! in a fixed order:
//!
//! 1. Collect intents (human input external, AI policy internal)
//! 2. Resolve movement, then volley firing
//! 3. Tick down respawn/attack/shoot cooldowns
//! 4. Advance and resolve bullets
//! 5. Resolve infected area attacks
//! 6. Evaluate win conditions
//!
//! The order must not change: bullets advance after movement so a
//! character cannot dodge a bullet already overlapping it this tick,
//! and the win check follows all combat so a last-tick conversion
//! counts. Terminal states freeze the session; further ticks are
//! no-ops. The match timer is tick-counted, so an external pause is a
//! pure suspend with no wall-clock drift.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai;
use crate::arena::{Arena, ArenaConfig};
use crate::bullets::Bullet;
use crate::characters::{Ammo, Character, Controller, Faction, Intent, PlayerInput, ShotPlan};
use crate::collision::Rect;
use crate::config::{MatchSetup, Tunables};
use crate::error::{GameError, Result};
use crate::math::Vec2;
use crate::systems;

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Fresh-seed attempts before arena generation failure is surfaced.
const GENERATION_RETRIES: u64 = 8;

/// Stride between derived arena seeds on generation retry.
const ARENA_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Match state machine. `Running` transitions to exactly one terminal
/// state; terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    /// The simulation is ticking.
    Running,
    /// Every roster member is infected.
    InfectedWin,
    /// The timer elapsed with at least one survivor standing.
    SurvivorsWin,
}

impl MatchState {
    /// True for either win state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Events produced by one tick, for the UI layer to trigger effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// Roster indices converted to infected this tick.
    pub conversions: Vec<usize>,
    /// Infected knocked down by bullets this tick.
    pub downed: Vec<usize>,
    /// Characters that respawned this tick.
    pub respawned: Vec<usize>,
    /// Survivors that fired a volley this tick.
    pub volleys: Vec<usize>,
    /// Set when this tick reached a terminal state.
    pub finished: Option<MatchState>,
}

/// Renderer-facing view of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterView {
    /// Stable roster index (binds colors/skins externally).
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Current faction.
    pub faction: Faction,
    /// World position.
    pub position: Vec2,
    /// True while waiting to respawn (do not draw).
    pub respawning: bool,
    /// Remaining ammunition, `None` for unlimited.
    pub ammo: Option<u32>,
}

/// Authoritative per-tick world state for the renderer and HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks simulated so far.
    pub tick: u64,
    /// Current match state.
    pub state: MatchState,
    /// Seconds since match start.
    pub elapsed_secs: f32,
    /// Seconds until the timer elapses.
    pub remaining_secs: f32,
    /// Arena obstacle set.
    pub obstacles: Vec<Rect>,
    /// All roster members.
    pub characters: Vec<CharacterView>,
    /// Live bullet positions.
    pub bullets: Vec<Vec2>,
}

/// One match worth of simulation state.
#[derive(Debug, Clone)]
pub struct MatchSession {
    tunables: Tunables,
    setup: MatchSetup,
    arena: Arena,
    roster: Vec<Character>,
    bullets: Vec<Bullet>,
    tick: u64,
    timer_ticks: u64,
    cooldown_ticks: u32,
    state: MatchState,
    rng: Pcg32,
}

impl MatchSession {
    /// Create a session, generating an arena from the setup seed.
    ///
    /// # Errors
    ///
    /// Fails fast on out-of-range configuration, or with
    /// [`GameError::GenerationFailed`] if no arena satisfying the
    /// reachability guarantee was produced within the retry budget.
    pub fn new(tunables: Tunables, setup: MatchSetup) -> Result<Self> {
        tunables.validate()?;
        setup.validate()?;

        let mut last_err = None;
        for attempt in 0..GENERATION_RETRIES {
            let seed = setup.seed.wrapping_add(attempt.wrapping_mul(ARENA_SEED_STRIDE));
            match Arena::generate(ArenaConfig::default().with_seed(seed)) {
                Ok(arena) => return Self::with_arena(tunables, setup, arena),
                Err(err) => {
                    warn!(attempt, %err, "arena generation attempt failed");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            GameError::GenerationFailed("generation retry budget exhausted".into())
        }))
    }

    /// Create a session over an existing arena (tests, scripted
    /// scenarios). The arena is trusted to uphold its own guarantees.
    pub fn with_arena(tunables: Tunables, setup: MatchSetup, arena: Arena) -> Result<Self> {
        tunables.validate()?;
        setup.validate()?;

        let mut rng = Pcg32::seed_from_u64(setup.seed);
        let roster_size = setup.player_count as usize;
        let infected_index = rng.gen_range(0..roster_size);
        let half = tunables.character_radius;

        let mut roster = Vec::with_capacity(roster_size);
        for i in 0..setup.human_count() {
            roster.push(Character::new(
                i,
                format!("P{}", i + 1),
                Controller::Human { slot: i },
                faction_for(i, infected_index),
                starting_spawn(&arena, i, half),
                Ammo::from_cap(setup.ammo),
            ));
        }
        if setup.include_ai {
            let i = roster.len();
            roster.push(Character::new(
                i,
                "AI",
                Controller::Ai,
                faction_for(i, infected_index),
                starting_spawn(&arena, i, half),
                Ammo::from_cap(setup.ammo),
            ));
        }

        info!(
            seed = setup.seed,
            players = roster_size,
            timer_minutes = setup.timer_minutes,
            "match session created"
        );
        Ok(Self {
            cooldown_ticks: tunables.cooldown_ticks(),
            timer_ticks: u64::from(setup.timer_minutes) * 60 * u64::from(TICK_RATE),
            tunables,
            setup,
            arena,
            roster,
            bullets: Vec::new(),
            tick: 0,
            state: MatchState::Running,
            rng,
        })
    }

    /// Advance the simulation by one tick.
    ///
    /// `inputs` holds one entry per human slot; missing entries are
    /// treated as idle. Once a terminal state is reached the session is
    /// frozen and this returns empty events.
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> TickEvents {
        let mut events = TickEvents::default();
        if self.state.is_terminal() {
            return events;
        }
        let half = self.tunables.character_radius;

        // 1. Collect intents.
        let mut intents = vec![Intent::idle(); self.roster.len()];
        for i in 0..self.roster.len() {
            let ch = &self.roster[i];
            if !ch.is_alive() {
                continue;
            }
            intents[i] = match ch.controller {
                Controller::Human { slot } => {
                    human_intent(inputs.get(slot).copied().unwrap_or_default(), ch.speed(&self.tunables))
                }
                Controller::Ai => ai::decide(
                    i,
                    &self.roster,
                    &self.arena,
                    &self.tunables,
                    self.cooldown_ticks,
                    &mut self.rng,
                ),
            };
        }

        // 2. Movement, then volley firing (aim uses post-move facing).
        for (i, intent) in intents.iter().enumerate() {
            if self.roster[i].is_alive() {
                systems::resolve_movement(&mut self.roster[i], intent.movement, half, &self.arena);
            }
        }
        for (i, intent) in intents.iter().enumerate() {
            let Some(plan) = intent.shoot else { continue };
            if self.roster[i].is_alive() && self.roster[i].faction == Faction::Survivor {
                let fired = systems::fire_volley(
                    &mut self.roster[i],
                    plan,
                    self.cooldown_ticks,
                    &mut self.bullets,
                );
                if fired {
                    events.volleys.push(i);
                }
            }
        }

        // 3. Cooldowns and respawns.
        for ch in &mut self.roster {
            systems::tick_action_cooldowns(ch);
        }
        events.respawned = systems::resolve_respawns(&mut self.roster, &self.arena, half);

        // 4. Bullets.
        events.downed = systems::advance_bullets(
            &mut self.bullets,
            &mut self.roster,
            &self.arena,
            half,
            self.tunables.bullet_speed,
        );

        // 5. Infected area attacks.
        let attacking: Vec<bool> = intents.iter().map(|it| it.attack).collect();
        events.conversions =
            systems::resolve_attacks(&mut self.roster, &attacking, half, self.cooldown_ticks);

        // 6. Win evaluation.
        self.tick += 1;
        self.state = self.evaluate_win();
        if !events.conversions.is_empty() {
            debug!(tick = self.tick, converted = ?events.conversions, "survivors converted");
        }
        if self.state.is_terminal() {
            events.finished = Some(self.state);
            info!(tick = self.tick, state = ?self.state, "match finished");
        }
        events
    }

    fn evaluate_win(&self) -> MatchState {
        if self.roster.iter().all(|c| c.faction == Faction::Infected) {
            return MatchState::InfectedWin;
        }
        if self.tick >= self.timer_ticks && self.roster.iter().any(|c| c.faction == Faction::Survivor)
        {
            return MatchState::SurvivorsWin;
        }
        MatchState::Running
    }

    /// Current match state.
    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Ticks simulated so far.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Shared attack/shoot cooldown duration in ticks.
    #[must_use]
    pub const fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    /// The session tunables.
    #[must_use]
    pub const fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// The match setup.
    #[must_use]
    pub const fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    /// The arena for this match.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The full roster.
    #[must_use]
    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    /// Mutable roster access for scripted scenarios and tests.
    pub fn roster_mut(&mut self) -> &mut [Character] {
        &mut self.roster
    }

    /// Live bullets.
    #[must_use]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Seconds since match start (tick-derived).
    #[must_use]
    pub fn elapsed_secs(&self) -> f32 {
        self.tick as f32 / TICK_RATE as f32
    }

    /// Seconds until the timer elapses.
    #[must_use]
    pub fn remaining_secs(&self) -> f32 {
        self.timer_ticks.saturating_sub(self.tick) as f32 / TICK_RATE as f32
    }

    /// Assemble the renderer/HUD view of the world.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            state: self.state,
            elapsed_secs: self.elapsed_secs(),
            remaining_secs: self.remaining_secs(),
            obstacles: self.arena.obstacles().to_vec(),
            characters: self
                .roster
                .iter()
                .map(|c| CharacterView {
                    index: c.index,
                    name: c.name.clone(),
                    faction: c.faction,
                    position: c.position,
                    respawning: !c.is_alive(),
                    ammo: c.ammo.remaining(),
                })
                .collect(),
            bullets: self.bullets.iter().map(|b| b.position).collect(),
        }
    }
}

/// Faction for a roster slot given the secretly chosen infected index.
const fn faction_for(index: usize, infected_index: usize) -> Faction {
    if index == infected_index {
        Faction::Infected
    } else {
        Faction::Survivor
    }
}

/// Starting position for roster slot `i`: its preferred spawn point,
/// walking forward through the spawn list when obstructed, falling
/// back to the preferred point if every spawn is covered.
fn starting_spawn(arena: &Arena, i: usize, half: f32) -> Vec2 {
    let spawns = arena.spawn_points();
    debug_assert!(!spawns.is_empty());
    let preferred = i % spawns.len();
    for k in 0..spawns.len() {
        let candidate = spawns[(preferred + k) % spawns.len()];
        if arena.spawn_is_clear(candidate, half) {
            return candidate;
        }
    }
    spawns[preferred]
}

/// Convert one human input record into an intent.
fn human_intent(input: PlayerInput, speed: f32) -> Intent {
    let mx = f32::from(input.move_x.clamp(-1, 1));
    let my = f32::from(input.move_y.clamp(-1, 1));
    Intent {
        movement: Vec2::new(mx * speed, my * speed),
        attack: input.action_held,
        shoot: input.shoot_pressed.then_some(ShotPlan::Facing),
    }
}
