//! AI behavior policy.
//!
//! A stateless decision function invoked once per AI-controlled
//! character per tick. It only produces an [`Intent`]; movement and
//! combat are resolved by the same systems that handle human intents.

use rand::Rng;

use crate::arena::Arena;
use crate::characters::{Character, Faction, Intent, ShotPlan};
use crate::collision::{any_intersect, Rect};
use crate::config::Tunables;
use crate::math::Vec2;
use crate::systems::INFECTED_ATTACK_RADIUS;

/// Survivors shoot at threats closer than this.
pub const SHOOT_RANGE: f32 = 200.0;

/// Survivors flee threats closer than this (and beyond shooting).
pub const FLEE_RANGE: f32 = 300.0;

/// Compute the intent for the AI character at `index`.
///
/// Difficulty maps to an accuracy scalar gating attack and shoot
/// opportunities; a failed roll simply skips the opportunity this tick.
pub fn decide<R: Rng>(
    index: usize,
    roster: &[Character],
    arena: &Arena,
    tunables: &Tunables,
    cooldown_ticks: u32,
    rng: &mut R,
) -> Intent {
    let ch = &roster[index];
    if !ch.is_alive() {
        return Intent::idle();
    }
    let accuracy = tunables.ai_difficulty.accuracy();
    let half = tunables.character_radius;

    match ch.faction {
        Faction::Infected => {
            let Some(target) = nearest_alive(roster, Faction::Survivor, ch.position) else {
                return Intent::idle();
            };
            let to = target - ch.position;
            let dist = to.length().max(1.0);
            let speed = tunables.infected_speed;
            let movement = steer(to * (speed / dist), ch.position, half, arena, speed, rng);
            // The attack window opens once the cooldown decays below
            // half its duration; the roll decides whether this tick's
            // opportunity is taken. Resolution still requires a fully
            // elapsed cooldown.
            let attack = dist < INFECTED_ATTACK_RADIUS + half
                && ch.attack_cooldown <= cooldown_ticks / 2
                && rng.gen::<f32>() < accuracy;
            Intent {
                movement,
                attack,
                shoot: None,
            }
        }
        Faction::Survivor => {
            let Some(threat) = nearest_alive(roster, Faction::Infected, ch.position) else {
                return Intent::idle();
            };
            let to = threat - ch.position;
            let dist = to.length().max(1.0);
            if dist < SHOOT_RANGE
                && ch.shoot_cooldown == 0
                && !ch.ammo.is_empty()
                && rng.gen::<f32>() < accuracy
            {
                Intent {
                    movement: Vec2::ZERO,
                    attack: false,
                    shoot: Some(ShotPlan::Aimed(to.angle())),
                }
            } else if dist < FLEE_RANGE {
                let speed = tunables.survivor_speed;
                let away = -(to * (speed / dist));
                Intent {
                    movement: steer(away, ch.position, half, arena, speed, rng),
                    attack: false,
                    shoot: None,
                }
            } else {
                Intent::idle()
            }
        }
    }
}

/// Position of the nearest alive character of `faction`, if any.
fn nearest_alive(roster: &[Character], faction: Faction, from: Vec2) -> Option<Vec2> {
    roster
        .iter()
        .filter(|c| c.faction == faction && c.is_alive())
        .map(|c| c.position)
        .min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)))
}

/// Stuck-avoidance steering: keep the full step if it is clear, else
/// try the horizontal-only component, then the vertical-only component,
/// then fall back to a symmetric random jitter on both axes.
fn steer<R: Rng>(
    desired: Vec2,
    position: Vec2,
    half: f32,
    arena: &Arena,
    speed: f32,
    rng: &mut R,
) -> Vec2 {
    let clear = |delta: Vec2| {
        let probe = Rect::from_center(position + delta, half);
        !any_intersect(&probe, arena.obstacles())
    };

    if clear(desired) {
        return desired;
    }
    let horizontal = Vec2::new(desired.x, 0.0);
    if clear(horizontal) {
        return horizontal;
    }
    let vertical = Vec2::new(0.0, desired.y);
    if clear(vertical) {
        return vertical;
    }
    let jitter = rng.gen_range(-speed * 0.5..=speed * 0.5);
    let second = if rng.gen_bool(0.5) { jitter } else { -jitter };
    Vec2::new(jitter, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaConfig;
    use crate::characters::{Ammo, Controller};
    use crate::config::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hard_tunables() -> Tunables {
        Tunables::default().with_difficulty(Difficulty::Hard)
    }

    fn open_arena() -> Arena {
        Arena::from_parts(ArenaConfig::default(), Vec::new())
    }

    fn character(index: usize, faction: Faction, position: Vec2) -> Character {
        Character::new(index, "T", Controller::Ai, faction, position, Ammo::Limited(1))
    }

    #[test]
    fn test_survivor_at_250_flees_instead_of_shooting() {
        let arena = open_arena();
        let tunables = hard_tunables();
        let roster = vec![
            character(0, Faction::Survivor, Vec2::new(500.0, 500.0)),
            character(1, Faction::Infected, Vec2::new(750.0, 500.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        assert!(intent.shoot.is_none(), "250 > shoot range, must not shoot");
        // Fleeing: movement points away from the threat.
        assert!(intent.movement.x < 0.0);
        assert!((intent.movement.length() - tunables.survivor_speed).abs() < 1e-4);
    }

    #[test]
    fn test_survivor_in_range_shoots_at_threat() {
        let arena = open_arena();
        let tunables = hard_tunables();
        let roster = vec![
            character(0, Faction::Survivor, Vec2::new(500.0, 500.0)),
            character(1, Faction::Infected, Vec2::new(650.0, 500.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        match intent.shoot {
            Some(ShotPlan::Aimed(angle)) => assert!(angle.abs() < 1e-6, "aims along +X"),
            other => panic!("expected aimed shot, got {other:?}"),
        }
        assert_eq!(intent.movement, Vec2::ZERO);
    }

    #[test]
    fn test_survivor_without_ammo_flees() {
        let arena = open_arena();
        let tunables = hard_tunables();
        let mut roster = vec![
            character(0, Faction::Survivor, Vec2::new(500.0, 500.0)),
            character(1, Faction::Infected, Vec2::new(650.0, 500.0)),
        ];
        roster[0].ammo = Ammo::Limited(0);
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        assert!(intent.shoot.is_none());
        assert!(intent.movement.x < 0.0);
    }

    #[test]
    fn test_survivor_beyond_flee_range_idles() {
        let arena = open_arena();
        let roster = vec![
            character(0, Faction::Survivor, Vec2::new(500.0, 500.0)),
            character(1, Faction::Infected, Vec2::new(900.0, 500.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &hard_tunables(), 60, &mut rng);
        assert_eq!(intent, Intent::idle());
    }

    #[test]
    fn test_infected_chases_nearest_survivor() {
        let arena = open_arena();
        let tunables = hard_tunables();
        let roster = vec![
            character(0, Faction::Infected, Vec2::new(500.0, 500.0)),
            character(1, Faction::Survivor, Vec2::new(900.0, 500.0)),
            character(2, Faction::Survivor, Vec2::new(500.0, 700.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        // Nearest survivor is straight down.
        assert!(intent.movement.y > 0.0);
        assert!(intent.movement.x.abs() < 1e-4);
        assert!((intent.movement.length() - tunables.infected_speed).abs() < 1e-4);
        assert!(!intent.attack, "target out of attack reach");
    }

    #[test]
    fn test_infected_attacks_in_reach_at_full_accuracy() {
        let arena = open_arena();
        let tunables = hard_tunables();
        let roster = vec![
            character(0, Faction::Infected, Vec2::new(500.0, 500.0)),
            character(1, Faction::Survivor, Vec2::new(550.0, 500.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        assert!(intent.attack);
    }

    #[test]
    fn test_infected_attack_waits_for_cooldown_window() {
        let arena = open_arena();
        let tunables = hard_tunables();
        let mut roster = vec![
            character(0, Faction::Infected, Vec2::new(500.0, 500.0)),
            character(1, Faction::Survivor, Vec2::new(550.0, 500.0)),
        ];
        roster[0].attack_cooldown = 45; // above half of 60
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        assert!(!intent.attack);
    }

    #[test]
    fn test_idle_without_targets() {
        let arena = open_arena();
        let roster = vec![character(0, Faction::Infected, Vec2::new(500.0, 500.0))];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &hard_tunables(), 60, &mut rng);
        assert_eq!(intent, Intent::idle());

        let roster = vec![character(0, Faction::Survivor, Vec2::new(500.0, 500.0))];
        let intent = decide(0, &roster, &arena, &hard_tunables(), 60, &mut rng);
        assert_eq!(intent, Intent::idle());
    }

    #[test]
    fn test_downed_targets_ignored() {
        let arena = open_arena();
        let mut roster = vec![
            character(0, Faction::Infected, Vec2::new(500.0, 500.0)),
            character(1, Faction::Survivor, Vec2::new(600.0, 500.0)),
        ];
        roster[1].respawn_ticks = 100;
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &hard_tunables(), 60, &mut rng);
        assert_eq!(intent, Intent::idle());
    }

    #[test]
    fn test_steer_slides_along_wall() {
        // Wall right of the infected blocks the direct eastward chase.
        let arena = Arena::from_parts(
            ArenaConfig::default(),
            vec![Rect::new(540.0, 400.0, 40.0, 200.0)],
        );
        let tunables = hard_tunables();
        let roster = vec![
            character(0, Faction::Infected, Vec2::new(500.0, 450.0)),
            character(1, Faction::Survivor, Vec2::new(700.0, 520.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let intent = decide(0, &roster, &arena, &tunables, 60, &mut rng);
        // Direct and horizontal probes collide; vertical slide remains.
        assert!(intent.movement.x.abs() < 1e-6);
        assert!(intent.movement.y > 0.0);
    }
}
