//! Boxing ("Just Fight") data structures.
//!
//! A cooperative rhythm game. Each round both players get a cue that slides
//! toward a target zone; each must answer their own cue with the matching
//! strike before the round times out. A joint hit damages the monster, any
//! miss lets the monster strike back.

use rand::Rng;

use crate::core::Timeline;
use crate::games::Player;

// Stage geometry (virtual pixels)
pub const STAGE_WIDTH: f64 = 800.0;
pub const PLAYER_ONE_TARGET_X: f64 = 190.0;
pub const PLAYER_TWO_TARGET_X: f64 = 610.0;
pub const CUE_SPAWN_OFFSET: f64 = 50.0; // cues enter just off-stage

// Health and damage
pub const PLAYER_MAX_HEALTH: i32 = 100;
pub const MONSTER_MAX_HEALTH: i32 = 500;
pub const HIT_DAMAGE: i32 = 20; // per player, applied together on a joint hit
pub const WRONG_KEY_DAMAGE: i32 = 20;
pub const TIMEOUT_DAMAGE: i32 = 10;

// Scoring
pub const COOPERATION_BONUS: u32 = 10;
pub const TIMING_BONUS: u32 = 5; // strike landed before the cue reached its target

// Difficulty (round timeout counted in frames)
pub const INITIAL_ROUND_TIMEOUT_FRAMES: u32 = 200;
pub const MIN_ROUND_TIMEOUT_FRAMES: u32 = 60;
pub const ROUND_TIMEOUT_STEP_FRAMES: u32 = 5;
pub const INITIAL_CUE_SPEED: f64 = 3.0;
pub const MAX_CUE_SPEED: f64 = 15.0;
pub const CUE_SPEED_STEP: f64 = 0.5;

// Animation timing
pub const ATTACK_ANIMATION_MS: u64 = 650;
pub const INJURY_ANIMATION_MS: u64 = 650;
pub const STRIKE_RECOVERY_MS: u64 = 1300;
pub const DEATH_ANIMATION_MS: u64 = 1000;

/// The four strikes, each bound to a direction key per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    HighKick,
    LowKick,
    LeftPunch,
    RightPunch,
}

impl Move {
    pub const ALL: [Move; 4] = [
        Move::HighKick,
        Move::LowKick,
        Move::LeftPunch,
        Move::RightPunch,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(self) -> &'static str {
        match self {
            Move::HighKick => "HIGH KICK",
            Move::LowKick => "LOW KICK",
            Move::LeftPunch => "LEFT PUNCH",
            Move::RightPunch => "RIGHT PUNCH",
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Move::HighKick => '↑',
            Move::LowKick => '↓',
            Move::LeftPunch => '←',
            Move::RightPunch => '→',
        }
    }
}

/// Which way the monster swings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Side::Left
        } else {
            Side::Right
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxerState {
    Idle,
    Attacking(Move),
    Injured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterState {
    Idle,
    Attacking(Side),
    Hurt,
    Dying,
    Dead,
    /// Shown after the players are beaten.
    Laughing,
}

/// Where a player stands in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Awaiting,
    HitCorrect { early: bool },
    HitWrong,
    TimedOut,
}

impl RoundState {
    pub fn is_resolved(self) -> bool {
        !matches!(self, RoundState::Awaiting)
    }

    pub fn is_hit(self) -> bool {
        matches!(self, RoundState::HitCorrect { .. })
    }
}

/// What a strike or a round timeout produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Hit { player: Player, early: bool },
    JointHit,
    Wrong { player: Player },
    TimedOut { player: Player },
}

/// A sliding prompt showing which strike a player must make.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub required: Move,
    pub x: f64,
    pub target_x: f64,
    pub arrived: bool,
}

impl Cue {
    /// Player one's cue enters from the left edge, player two's from the right.
    pub fn spawn(player: Player, required: Move) -> Self {
        let (x, target_x) = match player {
            Player::One => (-CUE_SPAWN_OFFSET, PLAYER_ONE_TARGET_X),
            Player::Two => (STAGE_WIDTH + CUE_SPAWN_OFFSET, PLAYER_TWO_TARGET_X),
        };
        Self {
            required,
            x,
            target_x,
            arrived: false,
        }
    }

    /// Slide one frame toward the target. Returns true on arrival.
    pub fn advance(&mut self, speed: f64) -> bool {
        if self.arrived {
            return false;
        }
        if self.x < self.target_x {
            self.x = (self.x + speed).min(self.target_x);
        } else {
            self.x = (self.x - speed).max(self.target_x);
        }
        if self.x == self.target_x {
            self.arrived = true;
        }
        self.arrived
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boxer {
    pub health: i32,
    pub state: BoxerState,
    pub round: RoundState,
}

impl Boxer {
    pub fn new() -> Self {
        Self {
            health: PLAYER_MAX_HEALTH,
            state: BoxerState::Idle,
            round: RoundState::Awaiting,
        }
    }

    /// Health as shown on screen; never below zero.
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }
}

impl Default for Boxer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deferred steps of the attack and injury sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxingEvent {
    /// A striking player drops back to idle.
    StrikeRecovered(Player),
    /// The monster's swing lands.
    MonsterStrikes { target: Player, damage: i32 },
    PlayerRecovered(Player),
    MonsterHurt,
    /// End of the joint-hit sequence: the monster dies or the next round starts.
    JointSequenceEnd,
    DeathSettled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxingResult {
    Victory,
    Defeat,
    Forfeit,
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct BoxingGame {
    pub game_result: Option<BoxingResult>,
    pub forfeit_pending: bool,
    /// True until Space is pressed. No round is spawned while waiting.
    pub waiting_to_start: bool,
    pub paused: bool,

    pub boxers: [Boxer; 2],
    pub cues: [Option<Cue>; 2],
    pub monster_health: i32,
    pub monster_state: MonsterState,

    // Scoring
    /// Joint-hit score.
    pub score: u32,
    /// Early-strike bonus, tallied apart from `score`.
    pub timing_bonus: u32,

    // Round pacing
    pub round: u32,
    pub round_frames: u32,
    pub round_timeout_frames: u32,
    pub cue_speed: f64,
    /// Set once the round is resolved; the next round spawns when the
    /// timeline has drained.
    pub waiting_for_sequence: bool,

    pub timeline: Timeline<BoxingEvent>,
    /// Sub-frame time accumulator (milliseconds).
    pub accumulated_time_ms: u64,
    pub frame_count: u64,
}

impl BoxingGame {
    pub fn new() -> Self {
        Self {
            game_result: None,
            forfeit_pending: false,
            waiting_to_start: true,
            paused: false,

            boxers: [Boxer::new(), Boxer::new()],
            cues: [None, None],
            monster_health: MONSTER_MAX_HEALTH,
            monster_state: MonsterState::Idle,

            score: 0,
            timing_bonus: 0,

            round: 0,
            round_frames: 0,
            round_timeout_frames: INITIAL_ROUND_TIMEOUT_FRAMES,
            cue_speed: INITIAL_CUE_SPEED,
            waiting_for_sequence: false,

            timeline: Timeline::new(),
            accumulated_time_ms: 0,
            frame_count: 0,
        }
    }

    pub fn boxer(&self, player: Player) -> &Boxer {
        &self.boxers[player.index()]
    }

    /// Score credited at game end: joint hits plus timing bonus.
    pub fn total_score(&self) -> u32 {
        self.score + self.timing_bonus
    }

    pub fn monster_display_health(&self) -> i32 {
        self.monster_health.max(0)
    }
}

impl Default for BoxingGame {
    fn default() -> Self {
        Self::new()
    }
}
