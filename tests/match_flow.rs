//! End-to-end match scenarios driven only through the public API

use chain_hockey::consts::*;
use chain_hockey::sim::{
    ControlInput, GoalSide, MatchEvent, MatchPhase, MatchState, Outcome, Player, Puck,
    RenderFrame, TickInput, tick,
};
use chain_hockey::{GameConfig, GlobalConfig};
use glam::Vec2;

fn now(tick_index: u32) -> f64 {
    f64::from(tick_index) / f64::from(TICK_RATE)
}

/// Puck sliding left along y=270: under both player one bodies, into the left mouth
fn shot_at_left_goal(config: GameConfig) -> MatchState {
    let mut state = MatchState::new(config);
    state.start(0.0);
    state.puck.pos = Vec2::new(CENTER_LINE_X, 270.0);
    state.puck.vel = Vec2::new(-20.0, 0.0);
    state
}

#[test]
fn test_shot_scores_once_for_right_player() {
    let mut state = shot_at_left_goal(GameConfig::default());
    let idle = TickInput::default();

    let mut goals = Vec::new();
    let mut goal_tick = None;
    for i in 1..=200 {
        tick(&mut state, &idle, now(i));
        for event in &state.events {
            if let MatchEvent::Goal { side, scorer } = event {
                goals.push((*side, *scorer));
                goal_tick.get_or_insert(i);
                assert_eq!(state.puck.pos, Puck::center());
                assert_eq!(state.puck.vel, Vec2::ZERO);
            }
        }
    }

    assert_eq!(goals, vec![(GoalSide::Left, Player::Two)]);
    assert_eq!(state.scores, [0, 1]);
    let goal_tick = goal_tick.expect("scored");
    assert!((30..60).contains(&goal_tick), "goal on tick {goal_tick}");
    assert_eq!(state.phase, MatchPhase::Playing);
}

#[test]
fn test_puck_waits_out_cooldown_after_goal() {
    let mut state = shot_at_left_goal(GameConfig::default());
    let idle = TickInput::default();

    let mut i = 0;
    while state.scores == [0, 0] {
        i += 1;
        tick(&mut state, &idle, now(i));
        assert!(i < 200, "no goal");
    }

    // Nudge the reset puck; it must not move until the cooldown runs out
    state.puck.vel = Vec2::new(4.0, 0.0);
    for _ in 0..GOAL_COOLDOWN_TICKS {
        i += 1;
        tick(&mut state, &idle, now(i));
        assert_eq!(state.puck.pos, Puck::center());
    }
    i += 1;
    tick(&mut state, &idle, now(i));
    assert!(state.puck.pos.x > CENTER_LINE_X);
}

#[test]
fn test_tenth_goal_ends_match() {
    let mut state = MatchState::new(GameConfig::default());
    state.start(0.0);
    state.scores = [MAX_GOALS - 1, 3];
    // Same shot, mirrored toward the right mouth
    state.puck.pos = Vec2::new(CENTER_LINE_X, 270.0);
    state.puck.vel = Vec2::new(20.0, 0.0);

    let mut i = 0;
    while !state.is_over() {
        i += 1;
        tick(&mut state, &TickInput::default(), now(i));
        assert!(i < 200, "match did not end");
    }
    assert!(state.events.contains(&MatchEvent::Ended(Outcome::Winner(Player::One))));
    assert_eq!(state.outcome, Some(Outcome::Winner(Player::One)));
    assert_eq!(state.scores, [MAX_GOALS, 3]);

    // Ended matches are frozen
    let frozen = state.clone();
    let push = TickInput::default()
        .with_control(Player::One, ControlInput::Target(Vec2::new(50.0, 50.0)));
    for j in 1..=30 {
        tick(&mut state, &push, now(i + j));
    }
    assert_eq!(state.ticks, frozen.ticks);
    assert_eq!(state.rigs[0].striker.pos, frozen.rigs[0].striker.pos);
    assert_eq!(state.puck.pos, frozen.puck.pos);
    assert_eq!(state.scores, frozen.scores);
    assert_eq!(state.outcome, frozen.outcome);
}

#[test]
fn test_custom_goal_cap() {
    let config = GameConfig {
        global: GlobalConfig {
            max_goals: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut state = shot_at_left_goal(config);

    for i in 1..=200 {
        tick(&mut state, &TickInput::default(), now(i));
    }
    assert_eq!(state.outcome, Some(Outcome::Winner(Player::Two)));
    assert_eq!(state.scores, [0, 1]);
}

#[test]
fn test_level_scores_at_time_up_tie() {
    let config = GameConfig {
        global: GlobalConfig {
            game_duration_seconds: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut state = MatchState::new(config);
    state.start(0.0);

    for i in 1..=TICK_RATE {
        tick(&mut state, &TickInput::default(), now(i));
    }
    assert_eq!(state.outcome, Some(Outcome::Tie));
    assert_eq!(state.time_remaining(now(TICK_RATE)), 0.0);
}

#[test]
fn test_paused_time_is_not_counted() {
    let mut state = MatchState::new(GameConfig::default());
    state.start(0.0);
    let toggle = TickInput {
        pause: true,
        ..Default::default()
    };

    tick(&mut state, &toggle, 10.0);
    assert_eq!(state.phase, MatchPhase::Paused);
    tick(&mut state, &TickInput::default(), 50.0);
    tick(&mut state, &toggle, 100.0);
    assert_eq!(state.phase, MatchPhase::Playing);
    assert_eq!(state.time_remaining(100.0), 290.0);
}

#[test]
fn test_reset_after_end_starts_fresh() {
    let mut state = shot_at_left_goal(GameConfig::default());
    state.scores = [4, 4];
    state.rigs[1].striker.pos = Vec2::new(1000.0, 100.0);
    tick(&mut state, &TickInput::default(), f64::from(GAME_DURATION_SECONDS));
    assert_eq!(state.outcome, Some(Outcome::Tie));

    state.reset();
    assert_eq!(state.phase, MatchPhase::Idle);
    assert_eq!(state.outcome, None);
    assert_eq!(state.scores, [0, 0]);
    assert_eq!(state.rigs[1].striker.pos, Player::Two.spawn());
    assert_eq!(state.time_remaining(1000.0), f64::from(GAME_DURATION_SECONDS));
}

#[test]
fn test_configured_chain_shapes_rig() {
    let config = GameConfig::from_json(
        r#"{ "player2": { "chain_segments": 4, "segment_length": 30.0, "hammer_radius": 50.0 } }"#,
    )
    .expect("valid config");
    let mut state = MatchState::new(config);
    state.start(0.0);

    for i in 1..=120 {
        let input = TickInput::default().with_control(
            Player::Two,
            ControlInput::Target(Vec2::new(900.0 + (i % 40) as f32 * 5.0, 350.0)),
        );
        tick(&mut state, &input, now(i));
    }

    let frame = RenderFrame::capture(&state, now(120));
    assert_eq!(frame.chains[0].points.len(), CHAIN_SEGMENTS + 1);
    assert_eq!(frame.chains[1].points.len(), 5);
    assert_eq!(frame.hammers[1].radius, 50.0);
    assert_eq!(frame.chains[1].points[0], frame.strikers[1].pos);
    for hammer in frame.hammers {
        assert!(hammer.pos.is_finite());
    }
}
