//! Per-tick resolution systems.
//!
//! Pure functions over roster, bullet, and arena data. The session
//! loop calls these in a fixed order each tick; each returns the roster
//! indices it affected so the session can assemble tick events.

use crate::arena::Arena;
use crate::bullets::{Bullet, AI_SHOT_SPREAD, HUMAN_SHOT_SPREAD};
use crate::characters::{Character, Faction, ShotPlan};
use crate::collision::{any_intersect, Rect};
use crate::math::Vec2;

/// Radius of the infected area attack.
pub const INFECTED_ATTACK_RADIUS: f32 = 50.0;

/// Ticks an infected character stays down after a bullet hit.
pub const RESPAWN_DELAY_TICKS: u32 = 300;

/// Holding position for downed characters, outside the arena.
const OFF_ARENA: Vec2 = Vec2::new(-100.0, -100.0);

/// Resolve one character's requested displacement against the obstacle
/// set, per axis, then clamp into the playable bounds.
///
/// Testing each axis independently lets characters slide along walls.
/// The facing vector tracks the last nonzero request even when both
/// axes end up blocked.
pub fn resolve_movement(ch: &mut Character, desired: Vec2, half: f32, arena: &Arena) {
    if !desired.is_zero() {
        ch.facing = desired;
    }

    let x_probe = Rect::from_center(ch.position + Vec2::new(desired.x, 0.0), half);
    if !any_intersect(&x_probe, arena.obstacles()) {
        ch.position.x += desired.x;
    }
    let y_probe = Rect::from_center(ch.position + Vec2::new(0.0, desired.y), half);
    if !any_intersect(&y_probe, arena.obstacles()) {
        ch.position.y += desired.y;
    }

    let playable = arena.playable();
    ch.position.x = ch.position.x.clamp(playable.x + half, playable.right() - half);
    ch.position.y = ch.position.y.clamp(playable.y + half, playable.bottom() - half);
}

/// Tick down attack and shoot cooldowns.
pub fn tick_action_cooldowns(ch: &mut Character) {
    ch.attack_cooldown = ch.attack_cooldown.saturating_sub(1);
    ch.shoot_cooldown = ch.shoot_cooldown.saturating_sub(1);
}

/// Tick down respawn countdowns, repositioning characters whose
/// countdown reaches zero. Returns the indices that respawned.
pub fn resolve_respawns(roster: &mut [Character], arena: &Arena, half: f32) -> Vec<usize> {
    let survivors: Vec<Vec2> = roster
        .iter()
        .filter(|c| c.faction == Faction::Survivor && c.is_alive())
        .map(|c| c.position)
        .collect();

    let mut respawned = Vec::new();
    for (i, ch) in roster.iter_mut().enumerate() {
        if ch.respawn_ticks == 0 {
            continue;
        }
        ch.respawn_ticks -= 1;
        if ch.respawn_ticks == 0 {
            ch.position = choose_respawn_point(arena, half, &survivors);
            debug_assert!(
                arena.spawn_is_clear(ch.position, half)
                    || arena.spawn_points().iter().all(|sp| !arena.spawn_is_clear(*sp, half)),
                "obstructed spawn chosen while a clear one existed"
            );
            respawned.push(i);
        }
    }
    respawned
}

/// Safest-spawn policy: among spawn points not obstructed by an
/// obstacle footprint, pick the one maximizing the minimum distance to
/// the given alive-survivor positions. Falls back to the first valid
/// point when no survivors exist, and to the first configured point
/// when every spawn is obstructed.
#[must_use]
pub fn choose_respawn_point(arena: &Arena, half: f32, survivors: &[Vec2]) -> Vec2 {
    let fallback = arena
        .spawn_points()
        .first()
        .copied()
        .unwrap_or_else(|| arena.center());

    let valid: Vec<Vec2> = arena
        .spawn_points()
        .iter()
        .filter(|sp| arena.spawn_is_clear(**sp, half))
        .copied()
        .collect();
    if valid.is_empty() {
        return fallback;
    }
    if survivors.is_empty() {
        return valid[0];
    }

    let nearest_survivor = |sp: &Vec2| {
        survivors
            .iter()
            .map(|s| sp.distance(*s))
            .fold(f32::INFINITY, f32::min)
    };
    valid
        .iter()
        .copied()
        .max_by(|a, b| nearest_survivor(a).total_cmp(&nearest_survivor(b)))
        .unwrap_or(fallback)
}

/// Fire a volley if the shooter's cooldown has elapsed and ammunition
/// remains. Returns whether bullets were spawned.
pub fn fire_volley(
    ch: &mut Character,
    plan: ShotPlan,
    cooldown_ticks: u32,
    bullets: &mut Vec<Bullet>,
) -> bool {
    if ch.shoot_cooldown != 0 {
        return false;
    }
    if !ch.ammo.try_consume() {
        return false;
    }
    let (angle, spread) = match plan {
        ShotPlan::Facing => (ch.facing.angle(), HUMAN_SHOT_SPREAD),
        ShotPlan::Aimed(angle) => (angle, AI_SHOT_SPREAD),
    };
    crate::bullets::spawn_volley(ch.position, angle, spread, bullets);
    ch.shoot_cooldown = cooldown_ticks;
    true
}

/// Advance all bullets and retire the spent ones.
///
/// Retirement checks run in order: obstacle overlap or leaving the
/// playable bounds first, then alive infected characters (first match
/// wins). A hit infected goes down for [`RESPAWN_DELAY_TICKS`] and is
/// moved off-arena immediately; it will respawn still infected.
/// Returns the indices of characters knocked down this tick.
pub fn advance_bullets(
    bullets: &mut Vec<Bullet>,
    roster: &mut [Character],
    arena: &Arena,
    half: f32,
    bullet_speed: f32,
) -> Vec<usize> {
    let mut downed = Vec::new();
    bullets.retain_mut(|bullet| {
        bullet.position = bullet.position + bullet.direction * bullet_speed;
        let bounds = bullet.bounds();
        if any_intersect(&bounds, arena.obstacles()) || !arena.playable().contains_open(bullet.position)
        {
            return false;
        }
        for (i, ch) in roster.iter_mut().enumerate() {
            if ch.faction == Faction::Infected && ch.is_alive() && bounds.intersects(&ch.bounds(half))
            {
                ch.respawn_ticks = RESPAWN_DELAY_TICKS;
                ch.position = OFF_ARENA;
                downed.push(i);
                return false;
            }
        }
        true
    });
    downed
}

/// Resolve infected area attacks for every attacker whose intent is set
/// and whose cooldown has elapsed. Every alive survivor within
/// `INFECTED_ATTACK_RADIUS + half` of the attacker converts; the
/// cooldown resets whether or not anyone was in range. Returns the
/// indices converted this tick.
pub fn resolve_attacks(
    roster: &mut [Character],
    attacking: &[bool],
    half: f32,
    cooldown_ticks: u32,
) -> Vec<usize> {
    debug_assert_eq!(roster.len(), attacking.len());
    let reach = INFECTED_ATTACK_RADIUS + half;
    let mut converted = Vec::new();
    for i in 0..roster.len() {
        let attacker = &roster[i];
        if attacker.faction != Faction::Infected
            || !attacker.is_alive()
            || !attacking[i]
            || attacker.attack_cooldown != 0
        {
            continue;
        }
        let origin = attacker.position;
        for j in 0..roster.len() {
            let target = &mut roster[j];
            if target.faction == Faction::Survivor
                && target.is_alive()
                && origin.distance(target.position) < reach
            {
                target.infect();
                converted.push(j);
            }
        }
        roster[i].attack_cooldown = cooldown_ticks;
    }
    converted
}
