//! End-to-end match scenarios driven through the public session API.

use outbreak_core::prelude::*;
use outbreak_test_utils::fixtures::{session_with_infected_at, test_tunables, walled_arena};
use outbreak_test_utils::scenario::{idle_inputs, run_until_terminal};

/// An infected AI starting adjacent to a survivor converts it within
/// one attack cooldown, ending the match in an infected win.
#[test]
fn adjacent_infected_ai_converts_and_wins() {
    let tunables = test_tunables().with_difficulty(Difficulty::Hard);
    let setup = MatchSetup::default()
        .with_players(2)
        .with_ai(true)
        .with_timer_minutes(1);
    // AI occupies the last slot; make it the infected one.
    let mut session = session_with_infected_at(tunables, setup, 1);

    let survivor_pos = session.roster()[0].position;
    session.roster_mut()[1].position = survivor_pos + Vec2::new(50.0, 0.0);

    let cooldown = u64::from(session.cooldown_ticks());
    let outcome = run_until_terminal(&mut session, cooldown, idle_inputs);
    assert_eq!(outcome, Some(MatchState::InfectedWin));
    assert!(session.roster().iter().all(|c| c.faction == Faction::Infected));
}

/// A volley fired straight into a wall never reaches the infected
/// behind it.
#[test]
fn wall_absorbs_volley() {
    let wall = Rect::new(700.0, 100.0, 60.0, 900.0);
    let arena = walled_arena(vec![wall]);
    let setup = MatchSetup::default().with_players(2).with_timer_minutes(1);

    // Find a seed where slot 1 is infected so slot 0 shoots.
    let mut session = (0..1024)
        .find_map(|seed| {
            let s = MatchSession::with_arena(test_tunables(), setup.with_seed(seed), arena.clone())
                .expect("valid setup");
            (s.roster()[1].faction == Faction::Infected).then_some(s)
        })
        .expect("seed search");

    session.roster_mut()[0].position = Vec2::new(500.0, 500.0);
    session.roster_mut()[1].position = Vec2::new(900.0, 500.0);

    let mut inputs = vec![PlayerInput::default(); 2];
    inputs[0].shoot_pressed = true;
    let events = session.tick(&inputs);
    assert_eq!(events.volleys, vec![0]);

    // The wall face is ~195 units out; at bullet speed 10 every bullet
    // is gone well before 60 ticks, and the infected is never hit.
    for _ in 0..60 {
        let events = session.tick(&idle_inputs(&session));
        assert!(events.downed.is_empty());
    }
    assert!(session.bullets().is_empty());
    assert!(session.roster()[1].is_alive());
}

/// A shot infected goes down for exactly the respawn delay, then comes
/// back still infected on a spawn point.
#[test]
fn downed_infected_respawns_infected() {
    let tunables = test_tunables();
    let setup = MatchSetup::default().with_players(2).with_timer_minutes(15);
    let mut session = session_with_infected_at(tunables, setup, 1);

    session.roster_mut()[0].position = Vec2::new(300.0, 500.0);
    session.roster_mut()[0].facing = Vec2::new(1.0, 0.0);
    session.roster_mut()[1].position = Vec2::new(400.0, 500.0);

    let mut inputs = vec![PlayerInput::default(); 2];
    inputs[0].shoot_pressed = true;

    // Fire once, then idle until the hit lands.
    let mut hit = false;
    session.tick(&inputs);
    for _ in 0..60 {
        let events = session.tick(&vec![PlayerInput::default(); 2]);
        if events.downed.contains(&1) {
            hit = true;
            break;
        }
    }
    assert!(hit, "volley never reached the infected");
    assert!(!session.roster()[1].is_alive());
    assert_eq!(session.roster()[1].faction, Faction::Infected);

    // Count down the full respawn delay.
    let mut respawned_after = 0;
    for i in 1..=u64::from(RESPAWN_DELAY_TICKS) + 1 {
        let events = session.tick(&vec![PlayerInput::default(); 2]);
        if events.respawned.contains(&1) {
            respawned_after = i;
            break;
        }
    }
    assert_eq!(respawned_after, u64::from(RESPAWN_DELAY_TICKS));
    let respawned = &session.roster()[1];
    assert!(respawned.is_alive());
    assert_eq!(respawned.faction, Faction::Infected);
    assert!(session.arena().spawn_points().contains(&respawned.position));
}

/// The AI survivor at distance 250 flees rather than shooting, even
/// with ammunition available and perfect accuracy.
#[test]
fn ai_survivor_out_of_range_flees() {
    let tunables = test_tunables().with_difficulty(Difficulty::Hard);
    let setup = MatchSetup::default()
        .with_players(2)
        .with_ai(true)
        .with_ammo(AmmoCap::Limited(1))
        .with_timer_minutes(1);
    // Slot 0 (human) infected, so the AI in slot 1 is the survivor.
    let mut session = session_with_infected_at(tunables, setup, 0);

    let center = session.arena().center();
    session.roster_mut()[0].position = center;
    session.roster_mut()[1].position = center + Vec2::new(250.0, 0.0);

    let before = session.roster()[1].position;
    let events = session.tick(&idle_inputs(&session));
    let after = session.roster()[1].position;

    assert!(events.volleys.is_empty(), "must not shoot from 250 away");
    assert_eq!(session.roster()[1].ammo.remaining(), Some(1));
    assert!(
        center.distance(after) > center.distance(before),
        "must move away from the threat"
    );
}

/// Timer expiry with a survivor standing is a survivors' win even if a
/// conversion happened along the way.
#[test]
fn timer_expiry_with_survivors_standing() {
    let setup = MatchSetup::default().with_players(3).with_timer_minutes(1);
    let mut session = session_with_infected_at(test_tunables(), setup, 0);

    // Keep everyone apart; nobody acts.
    let spawns: Vec<Vec2> = session.arena().spawn_points().to_vec();
    for (i, ch) in session.roster_mut().iter_mut().enumerate() {
        ch.position = spawns[i * 2];
    }

    let timer_ticks = u64::from(session.setup().timer_minutes) * 60 * u64::from(TICK_RATE);
    let outcome = run_until_terminal(&mut session, timer_ticks + 1, idle_inputs);
    assert_eq!(outcome, Some(MatchState::SurvivorsWin));
    assert!(session
        .roster()
        .iter()
        .any(|c| c.faction == Faction::Survivor));
}
