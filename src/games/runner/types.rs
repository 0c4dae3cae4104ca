//! Dual-lane runner ("Harmonic Flight") data structures.
//!
//! Two runners share one scrolling stage, one per lane. Obstacles arrive in
//! pairs: in harmony both lanes get the same kind, in disharmony they get
//! opposite kinds, so the players must jump and crouch out of step. A crash
//! in either lane ends the shared run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::games::Player;

// Stage geometry (virtual pixels, y grows downward)
pub const STAGE_WIDTH: f64 = 800.0;
pub const STAGE_HEIGHT: f64 = 400.0;
pub const TOP_LANE_GROUND: f64 = 150.0;
pub const BOTTOM_LANE_GROUND: f64 = 350.0;

// Runner
pub const RUNNER_X: f64 = 100.0;
pub const RUNNER_WIDTH: f64 = 40.0;
pub const RUNNER_HEIGHT: f64 = 50.0;
pub const CROUCH_REDUCTION: f64 = 20.0;
pub const JUMP_VELOCITY: f64 = -12.0;
pub const GRAVITY: f64 = 0.6;
/// Frames a crouch lasts when key releases are not reported.
pub const CROUCH_HOLD_FRAMES: u32 = 36;

// Obstacles
pub const GROUND_OBSTACLE_WIDTH: f64 = 40.0;
pub const GROUND_OBSTACLE_HEIGHT: f64 = 50.0;
pub const GROUND_OBSTACLE_SINK: f64 = 5.0; // sits slightly into the floor
pub const FLYING_OBSTACLE_SIZE: f64 = 50.0;
pub const FLYING_OBSTACLE_LIFT: f64 = 85.0; // top edge above the lane ground
pub const HITBOX_INSET: f64 = 6.0;
pub const GROUND_VARIANTS: u8 = 3;
pub const FLYING_VARIANTS: u8 = 4;

// Pacing (in frames)
pub const INITIAL_SPAWN_INTERVAL: u32 = 100;
pub const MIN_SPAWN_INTERVAL: u32 = 50;
pub const BASE_SPEED: f64 = 3.0;
pub const SPEED_INCREMENT: f64 = 0.3;
pub const SPEED_STEP_SCORE: u64 = 4000; // raw score between speed-ups
pub const SCORE_DIVISOR: u64 = 20;
pub const MODE_MIN_FRAMES: u32 = 150;
pub const MODE_JITTER_FRAMES: u32 = 100;
pub const MODE_BANNER_FRAMES: u32 = 90;
pub const BACKGROUND_PARALLAX: f64 = 0.5;

/// Persisted best displayed score.
pub const HIGH_SCORE_KEY: &str = "runner_high_score";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Top,
    Bottom,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Top, Lane::Bottom];

    pub fn ground_y(self) -> f64 {
        match self {
            Lane::Top => TOP_LANE_GROUND,
            Lane::Bottom => BOTTOM_LANE_GROUND,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lane::Top => 0,
            Lane::Bottom => 1,
        }
    }

    /// Player one runs the top lane.
    pub fn of(player: Player) -> Lane {
        match player {
            Player::One => Lane::Top,
            Player::Two => Lane::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneMode {
    Harmony,
    Disharmony,
}

impl LaneMode {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            LaneMode::Harmony
        } else {
            LaneMode::Disharmony
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaneMode::Harmony => "HARMONY",
            LaneMode::Disharmony => "DISHARMONY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground,
    Flying,
}

impl ObstacleKind {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            ObstacleKind::Ground
        } else {
            ObstacleKind::Flying
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            ObstacleKind::Ground => ObstacleKind::Flying,
            ObstacleKind::Flying => ObstacleKind::Ground,
        }
    }

    pub fn random_variant<R: Rng>(self, rng: &mut R) -> u8 {
        match self {
            ObstacleKind::Ground => rng.gen_range(0..GROUND_VARIANTS),
            ObstacleKind::Flying => rng.gen_range(0..FLYING_VARIANTS),
        }
    }
}

/// Axis-aligned box in stage pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Hitbox {
    /// Shrink on every side by `amount`.
    pub fn inset(self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - 2.0 * amount,
            height: self.height - 2.0 * amount,
        }
    }

    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPose {
    Running,
    Jumping,
    Crouching,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Runner {
    pub lane: Lane,
    /// Top edge.
    pub y: f64,
    pub velocity: f64,
    pub height: f64,
    pub pose: RunnerPose,
    /// Frames left before an auto-released crouch ends. Zero while the
    /// crouch is held by the key.
    pub crouch_frames_left: u32,
}

impl Runner {
    pub fn new(lane: Lane) -> Self {
        Self {
            lane,
            y: lane.ground_y() - RUNNER_HEIGHT,
            velocity: 0.0,
            height: RUNNER_HEIGHT,
            pose: RunnerPose::Running,
            crouch_frames_left: 0,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_airborne(&self) -> bool {
        self.pose == RunnerPose::Jumping
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox {
            x: RUNNER_X,
            y: self.y,
            width: RUNNER_WIDTH,
            height: self.height,
        }
    }

    /// Start a jump from the ground. Returns false if already airborne or crouching.
    pub fn jump(&mut self) -> bool {
        if self.pose != RunnerPose::Running {
            return false;
        }
        self.pose = RunnerPose::Jumping;
        self.velocity = JUMP_VELOCITY;
        true
    }

    /// Crouch on the ground. `hold_frames` arms an automatic release.
    pub fn crouch(&mut self, hold_frames: Option<u32>) -> bool {
        if self.is_airborne() {
            return false;
        }
        self.pose = RunnerPose::Crouching;
        self.height = RUNNER_HEIGHT - CROUCH_REDUCTION;
        self.y = self.lane.ground_y() - self.height;
        self.crouch_frames_left = hold_frames.unwrap_or(0);
        true
    }

    pub fn release_crouch(&mut self) {
        if self.pose != RunnerPose::Crouching {
            return;
        }
        self.pose = RunnerPose::Running;
        self.height = RUNNER_HEIGHT;
        self.y = self.lane.ground_y() - self.height;
        self.crouch_frames_left = 0;
    }

    /// One physics frame: gravity while airborne, landing, crouch timer.
    pub fn step(&mut self) {
        match self.pose {
            RunnerPose::Jumping => {
                self.velocity += GRAVITY;
                self.y += self.velocity;
                let landing_y = self.lane.ground_y() - self.height;
                if self.y >= landing_y {
                    self.y = landing_y;
                    self.velocity = 0.0;
                    self.pose = RunnerPose::Running;
                }
            }
            RunnerPose::Crouching if self.crouch_frames_left > 0 => {
                self.crouch_frames_left -= 1;
                if self.crouch_frames_left == 0 {
                    self.release_crouch();
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub lane: Lane,
    pub kind: ObstacleKind,
    /// Sprite variant, cosmetic only.
    pub variant: u8,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    /// A new obstacle at the right edge of the stage.
    pub fn spawn(lane: Lane, kind: ObstacleKind, variant: u8) -> Self {
        let ground = lane.ground_y();
        let (y, width, height) = match kind {
            ObstacleKind::Ground => (
                ground - GROUND_OBSTACLE_HEIGHT + GROUND_OBSTACLE_SINK,
                GROUND_OBSTACLE_WIDTH,
                GROUND_OBSTACLE_HEIGHT,
            ),
            ObstacleKind::Flying => (
                ground - FLYING_OBSTACLE_LIFT,
                FLYING_OBSTACLE_SIZE,
                FLYING_OBSTACLE_SIZE,
            ),
        };
        Self {
            lane,
            kind,
            variant,
            x: STAGE_WIDTH,
            y,
            width,
            height,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// The crash that ended a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub lane: Lane,
    pub kind: ObstacleKind,
    pub raw_score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerResult {
    Crashed(CollisionEvent),
    Forfeit,
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct RunnerGame {
    pub game_result: Option<RunnerResult>,
    pub forfeit_pending: bool,
    pub waiting_to_start: bool,
    pub paused: bool,
    pub crouch_auto_release: bool,

    pub runners: [Runner; 2],
    pub obstacles: Vec<Obstacle>,

    // Lane mode
    pub mode: LaneMode,
    pub mode_frames: u32,
    pub next_mode_change: u32,
    /// Frames left on the "mode changed" banner.
    pub mode_banner_frames: u32,

    // Pacing
    pub spawn_timer: u32,
    pub spawn_interval: u32,
    pub speed: f64,
    pub obstacle_pairs: u32,
    pub background_x: f64,

    /// Frames survived; shown divided by `SCORE_DIVISOR`.
    pub raw_score: u64,
    /// Sub-frame time accumulator (milliseconds).
    pub accumulated_time_ms: u64,
    pub frame_count: u64,
}

impl RunnerGame {
    pub fn new<R: Rng>(crouch_auto_release: bool, rng: &mut R) -> Self {
        let mut game = Self {
            game_result: None,
            forfeit_pending: false,
            waiting_to_start: true,
            paused: false,
            crouch_auto_release,

            runners: [Runner::new(Lane::Top), Runner::new(Lane::Bottom)],
            obstacles: Vec::new(),

            mode: LaneMode::Harmony,
            mode_frames: 0,
            next_mode_change: 0,
            mode_banner_frames: 0,

            spawn_timer: 0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            speed: BASE_SPEED,
            obstacle_pairs: 0,
            background_x: 0.0,

            raw_score: 0,
            accumulated_time_ms: 0,
            frame_count: 0,
        };
        game.mode = LaneMode::random(rng);
        game.next_mode_change = next_mode_deadline(game.mode_frames, rng);
        game
    }

    pub fn runner(&self, lane: Lane) -> &Runner {
        &self.runners[lane.index()]
    }

    pub fn display_score(&self) -> u32 {
        u32::try_from(self.raw_score / SCORE_DIVISOR).unwrap_or(u32::MAX)
    }
}

/// Frame at which the current lane mode is re-rolled.
pub fn next_mode_deadline<R: Rng>(now: u32, rng: &mut R) -> u32 {
    now + MODE_MIN_FRAMES + rng.gen_range(0..MODE_JITTER_FRAMES)
}
