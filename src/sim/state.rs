//! Match state and core simulation types
//!
//! Everything the orchestrator owns lives in [`MatchState`]. Bodies and
//! chains are rebuilt wholesale on reset rather than patched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bodies::{GoalSide, Hammer, Puck, Striker};
use super::chain::{Chain, ChainParams};
use super::clock::MatchClock;
use crate::config::{GameConfig, PlayerConfig};
use crate::consts::*;

/// One of the two seats at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Left half, defends the left goal
    One,
    /// Right half, defends the right goal
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn spawn(self) -> Vec2 {
        match self {
            Player::One => Vec2::new(PLAYER1_SPAWN_X, PLAYER_SPAWN_Y),
            Player::Two => Vec2::new(PLAYER2_SPAWN_X, PLAYER_SPAWN_Y),
        }
    }
}

impl GoalSide {
    /// The puck in the left mouth is a point for the right-hand player
    pub fn scorer(self) -> Player {
        match self {
            GoalSide::Left => Player::Two,
            GoalSide::Right => Player::One,
        }
    }
}

/// Horizontal extent of one player's half of the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableHalf {
    pub min_x: f32,
    pub max_x: f32,
}

impl TableHalf {
    pub fn for_player(player: Player) -> Self {
        match player {
            Player::One => Self {
                min_x: 0.0,
                max_x: CENTER_LINE_X,
            },
            Player::Two => Self {
                min_x: CENTER_LINE_X,
                max_x: TABLE_WIDTH,
            },
        }
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Built but not started
    Idle,
    Playing,
    /// No ticks are simulated; the clock is stopped
    Paused,
    /// Win condition met; only a reset leaves this phase
    Ended,
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Player),
    Tie,
}

impl Outcome {
    /// Decide by score alone (time expired)
    pub fn from_scores(scores: [u32; 2]) -> Self {
        match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::One),
            std::cmp::Ordering::Less => Outcome::Winner(Player::Two),
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }
}

/// What hit the puck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Hammer,
    Striker,
}

/// Things that happened during the last tick, for presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Goal { side: GoalSide, scorer: Player },
    PuckHit { by: Player, kind: HitKind, speed: f32 },
    PuckReset,
    Ended(Outcome),
}

/// One player's striker, chain and hammer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rig {
    pub striker: Striker,
    pub chain: Chain,
    pub hammer: Hammer,
}

impl Rig {
    pub fn new(player: Player, config: &PlayerConfig, global: &crate::GlobalConfig) -> Self {
        let half = TableHalf::for_player(player);
        let striker = Striker::new(player.spawn(), config, half);
        let chain = Chain::new(
            striker.pos,
            ChainParams::from_config(config, global),
            Some(half),
        );
        let hammer = Hammer::new(chain.tip(), config, half);

        Self {
            striker,
            chain,
            hammer,
        }
    }
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Bundle this match was built from; immutable for the match
    pub config: GameConfig,
    pub phase: MatchPhase,
    /// Indexed by [`Player::index`]
    pub rigs: [Rig; 2],
    pub puck: Puck,
    pub scores: [u32; 2],
    /// Ticks left before the puck moves again after a goal
    pub goal_cooldown: u32,
    pub clock: MatchClock,
    pub outcome: Option<Outcome>,
    /// Simulated tick counter
    pub ticks: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<MatchEvent>,
}

impl MatchState {
    pub fn new(config: GameConfig) -> Self {
        let rigs = [
            Rig::new(Player::One, &config.player1, &config.global),
            Rig::new(Player::Two, &config.player2, &config.global),
        ];
        let puck = Puck::new(config.global.puck_friction, config.global.puck_wall_bounce);

        Self {
            config,
            phase: MatchPhase::Idle,
            rigs,
            puck,
            scores: [0, 0],
            goal_cooldown: 0,
            clock: MatchClock::new(),
            outcome: None,
            ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn rig(&self, player: Player) -> &Rig {
        &self.rigs[player.index()]
    }

    pub fn rig_mut(&mut self, player: Player) -> &mut Rig {
        &mut self.rigs[player.index()]
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    /// Idle -> Playing; starts the match clock
    pub fn start(&mut self, now: f64) {
        if self.phase == MatchPhase::Idle {
            self.clock.start(now);
            self.phase = MatchPhase::Playing;
            log::info!("Match started");
        }
    }

    /// Playing <-> Paused; other phases are unaffected
    pub fn toggle_pause(&mut self, now: f64) {
        match self.phase {
            MatchPhase::Playing => {
                self.clock.pause(now);
                self.phase = MatchPhase::Paused;
            }
            MatchPhase::Paused => {
                self.clock.resume(now);
                self.phase = MatchPhase::Playing;
            }
            MatchPhase::Idle | MatchPhase::Ended => {}
        }
    }

    /// Replace every body, score and timer; back to Idle
    pub fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
        log::info!("Match reset");
    }

    pub fn time_remaining(&self, now: f64) -> f64 {
        self.clock
            .remaining(now, self.config.global.game_duration_seconds as f64)
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Seal the match. The first outcome wins; later calls are ignored.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.phase = MatchPhase::Ended;
        self.events.push(MatchEvent::Ended(outcome));
        log::info!(
            "Match over: {:?} ({} - {})",
            outcome,
            self.scores[0],
            self.scores[1]
        );
    }
}
