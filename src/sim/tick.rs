//! Fixed timestep simulation tick
//!
//! Order within a tick: strikers, chains, hammers, puck (unless frozen after
//! a goal), collision pass, win condition.
//!
//! A mirroring peer (the network guest) runs the same motion but never
//! scores or decides the match; those arrive in the host's snapshots.

use super::bodies::ControlInput;
use super::collision::{Circle, circles_overlap, resolve_elastic_collision, separate_overlap};
use super::state::{HitKind, MatchEvent, MatchPhase, MatchState, Outcome, Player};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Control per player, indexed by [`Player::index`]; `None` holds still
    pub controls: [Option<ControlInput>; 2],
    /// Pause toggle
    pub pause: bool,
    /// Put the puck back at center, at rest
    pub reset_puck: bool,
    /// Another peer owns scores and the outcome. Goals only recenter the
    /// puck, and the win check is skipped.
    pub mirror: bool,
}

impl TickInput {
    pub fn with_control(mut self, player: Player, input: ControlInput) -> Self {
        self.controls[player.index()] = Some(input);
        self
    }

    pub fn control(&self, player: Player) -> Option<&ControlInput> {
        self.controls[player.index()].as_ref()
    }
}

/// Advance the match by one tick. `now` is the caller's clock in seconds and
/// only feeds the match timer; motion is expressed per tick.
pub fn tick(state: &mut MatchState, input: &TickInput, now: f64) {
    state.events.clear();

    if input.pause {
        state.toggle_pause(now);
    }

    // Idle, paused and finished matches do not simulate
    if state.phase != MatchPhase::Playing {
        return;
    }

    state.ticks += 1;

    if input.reset_puck {
        state.puck.reset();
        state.events.push(MatchEvent::PuckReset);
    }

    for player in Player::BOTH {
        let control = input.control(player).copied();
        let rig = state.rig_mut(player);
        rig.striker.apply_control(control.as_ref());
        rig.chain.update(rig.striker.pos, rig.striker.radius);
        rig.hammer.update_position(rig.chain.tip());
    }

    step_puck(state, input.mirror);
    handle_collisions(state);
    if !input.mirror {
        check_win_condition(state, now);
    }
}

fn step_puck(state: &mut MatchState, mirror: bool) {
    if state.goal_cooldown > 0 {
        state.goal_cooldown -= 1;
        return;
    }

    let Some(side) = state.puck.update() else {
        return;
    };

    if mirror {
        // The host's next snapshot carries the score
        state.puck.reset();
        log::debug!("Local puck entered the {:?} goal; waiting for host", side);
        return;
    }

    let scorer = side.scorer();
    state.scores[scorer.index()] += 1;
    state.puck.reset();
    state.goal_cooldown = GOAL_COOLDOWN_TICKS;
    state.events.push(MatchEvent::Goal { side, scorer });
    log::info!(
        "Goal {:?} for {:?}: {} - {}",
        side,
        scorer,
        state.scores[0],
        state.scores[1]
    );
}

/// Puck against each hammer, then each striker, in fixed order.
///
/// Strikers and hammers are kinematic (their position belongs to the player
/// and the chain), so only the puck keeps the separated position and the
/// post-impulse velocity.
///
/// Each contact moves the puck by half the overlap. The striker keeps its
/// own half unapplied as well, so a striker contact also leaves the puck
/// partly inside until the next tick.
fn handle_collisions(state: &mut MatchState) {
    let pairs = [
        (Player::One, HitKind::Hammer),
        (Player::Two, HitKind::Hammer),
        (Player::One, HitKind::Striker),
        (Player::Two, HitKind::Striker),
    ];

    for (player, kind) in pairs {
        let rig = state.rig(player);
        let (body, restitution) = match kind {
            HitKind::Hammer => (rig.hammer.circle(), HAMMER_RESTITUTION),
            HitKind::Striker => (rig.striker.circle(), STRIKER_RESTITUTION),
        };

        let puck = state.puck.circle();
        if !circles_overlap(&puck, &body) {
            continue;
        }

        let (puck_pos, _) = separate_overlap(&puck, &body);
        let separated = Circle { pos: puck_pos, ..puck };
        let (puck_vel, _) = resolve_elastic_collision(&separated, &body, restitution);

        state.puck.pos = puck_pos;
        if puck_vel != puck.vel {
            let speed = puck_vel.length();
            state.events.push(MatchEvent::PuckHit {
                by: player,
                kind,
                speed,
            });
            log::debug!("{:?} {:?} hit the puck at {:.1}", player, kind, speed);
        }
        state.puck.vel = puck_vel;
    }
}

fn check_win_condition(state: &mut MatchState, now: f64) {
    if state.is_over() {
        return;
    }

    let cap = state.config.global.max_goals;
    for player in Player::BOTH {
        if state.score(player) >= cap {
            state.finish(Outcome::Winner(player));
            return;
        }
    }

    if state.time_remaining(now) <= 0.0 {
        state.finish(Outcome::from_scores(state.scores));
    }
}
