//! Runner logic: per-frame physics, obstacle spawning, lane modes and
//! collision detection.

use rand::Rng;
use tracing::{debug, info};

use super::types::*;
use crate::core::{FRAME_MS, MAX_FRAME_DT_MS};

/// UI-agnostic input actions for the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerInput {
    Jump(Lane),
    Crouch(Lane),
    ReleaseCrouch(Lane),
    Select,  // Space: start, then pause/resume
    Forfeit, // Esc
    Other,
}

/// Process player input.
pub fn process_input(game: &mut RunnerGame, input: RunnerInput) {
    if game.game_result.is_some() {
        return;
    }

    if game.waiting_to_start {
        if matches!(input, RunnerInput::Select) {
            game.waiting_to_start = false;
            info!(mode = ?game.mode, "runner started");
        }
        return;
    }

    match input {
        RunnerInput::Forfeit => {
            if game.forfeit_pending {
                finish(game, RunnerResult::Forfeit);
            } else {
                game.forfeit_pending = true;
            }
        }
        RunnerInput::Select => {
            if game.forfeit_pending {
                game.forfeit_pending = false;
            } else {
                game.paused = !game.paused;
            }
        }
        RunnerInput::Other => game.forfeit_pending = false,
        // A release is never a deliberate action, so it leaves the forfeit prompt alone.
        RunnerInput::ReleaseCrouch(lane) => game.runners[lane.index()].release_crouch(),
        RunnerInput::Jump(lane) | RunnerInput::Crouch(lane) => {
            if game.forfeit_pending {
                game.forfeit_pending = false;
                return;
            }
            if game.paused {
                return;
            }
            let hold = game.crouch_auto_release.then_some(CROUCH_HOLD_FRAMES);
            let runner = &mut game.runners[lane.index()];
            if matches!(input, RunnerInput::Jump(_)) {
                runner.jump();
            } else {
                runner.crouch(hold);
            }
        }
    }
}

/// Advance the run by `dt_ms` in fixed frames. Returns true if state changed.
pub fn tick_runner<R: Rng>(game: &mut RunnerGame, dt_ms: u64, rng: &mut R) -> bool {
    if game.game_result.is_some() {
        return false;
    }
    if game.waiting_to_start || game.paused || game.forfeit_pending {
        return false;
    }

    let dt_ms = dt_ms.min(MAX_FRAME_DT_MS);
    game.accumulated_time_ms += dt_ms;
    let mut changed = false;

    while game.accumulated_time_ms >= FRAME_MS {
        game.accumulated_time_ms -= FRAME_MS;
        step_frame(game, rng);
        changed = true;

        if game.game_result.is_some() {
            break;
        }
    }

    changed
}

/// Single physics frame.
pub fn step_frame<R: Rng>(game: &mut RunnerGame, rng: &mut R) {
    game.frame_count += 1;

    // 1. Background scroll
    game.background_x -= BACKGROUND_PARALLAX * game.speed;
    if game.background_x <= -STAGE_WIDTH {
        game.background_x += STAGE_WIDTH;
    }

    // 2. Lane mode
    game.mode_frames += 1;
    game.mode_banner_frames = game.mode_banner_frames.saturating_sub(1);
    if game.mode_frames >= game.next_mode_change {
        select_new_mode(game, rng);
    }

    // 3. Runner physics
    for runner in game.runners.iter_mut() {
        runner.step();
    }

    // 4. Spawning
    game.spawn_timer += 1;
    if game.spawn_timer >= game.spawn_interval {
        spawn_obstacles(game, rng);
        game.spawn_timer = 0;
        game.spawn_interval = game.spawn_interval.saturating_sub(1).max(MIN_SPAWN_INTERVAL);
    }

    // 5. Scroll obstacles, dropping those fully past the left edge
    let speed = game.speed;
    for obstacle in game.obstacles.iter_mut() {
        obstacle.x -= speed;
    }
    game.obstacles.retain(|o| !o.is_off_screen());

    // 6. Collision
    if let Some(collision) = check_collision(game) {
        finish(game, RunnerResult::Crashed(collision));
        return;
    }

    // 7. Score and speed
    game.raw_score += 1;
    if game.raw_score % SPEED_STEP_SCORE == 0 {
        game.speed += SPEED_INCREMENT;
        debug!(speed = game.speed, raw_score = game.raw_score, "runner speed up");
    }
}

/// Re-roll the lane mode and schedule the next re-roll.
fn select_new_mode<R: Rng>(game: &mut RunnerGame, rng: &mut R) {
    let previous = game.mode;
    game.mode = LaneMode::random(rng);
    game.next_mode_change = next_mode_deadline(game.mode_frames, rng);
    if game.mode != previous {
        game.mode_banner_frames = MODE_BANNER_FRAMES;
        debug!(mode = ?game.mode, frame = game.frame_count, "lane mode changed");
    }
}

/// Spawn one obstacle per lane according to the current mode.
pub fn spawn_obstacles<R: Rng>(game: &mut RunnerGame, rng: &mut R) {
    let top_kind = ObstacleKind::random(rng);
    let (bottom_kind, shared_variant) = match game.mode {
        LaneMode::Harmony => (top_kind, true),
        LaneMode::Disharmony => (top_kind.opposite(), false),
    };

    let top_variant = top_kind.random_variant(rng);
    let bottom_variant = if shared_variant {
        top_variant
    } else {
        bottom_kind.random_variant(rng)
    };

    game.obstacles.push(Obstacle::spawn(Lane::Top, top_kind, top_variant));
    game.obstacles.push(Obstacle::spawn(Lane::Bottom, bottom_kind, bottom_variant));
    game.obstacle_pairs += 1;
}

/// First obstacle overlapping the runner in its lane, by inset hitboxes.
pub fn check_collision(game: &RunnerGame) -> Option<CollisionEvent> {
    game.obstacles.iter().find_map(|obstacle| {
        let runner = game.runner(obstacle.lane);
        let runner_box = runner.hitbox().inset(HITBOX_INSET);
        let obstacle_box = obstacle.hitbox().inset(HITBOX_INSET);
        runner_box.overlaps(&obstacle_box).then_some(CollisionEvent {
            lane: obstacle.lane,
            kind: obstacle.kind,
            raw_score: game.raw_score,
        })
    })
}

fn finish(game: &mut RunnerGame, result: RunnerResult) {
    game.game_result = Some(result);
    game.forfeit_pending = false;
    info!(
        result = ?result,
        score = game.display_score(),
        obstacle_pairs = game.obstacle_pairs,
        "runner finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn started(auto_release: bool) -> (RunnerGame, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut game = RunnerGame::new(auto_release, &mut rng);
        process_input(&mut game, RunnerInput::Select);
        (game, rng)
    }

    fn obstacle_at(lane: Lane, kind: ObstacleKind, x: f64) -> Obstacle {
        let mut obstacle = Obstacle::spawn(lane, kind, 0);
        obstacle.x = x;
        obstacle
    }

    #[test]
    fn test_waiting_to_start_blocks_physics() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = RunnerGame::new(false, &mut rng);
        process_input(&mut game, RunnerInput::Jump(Lane::Top));
        assert!(!tick_runner(&mut game, 100, &mut rng));
        assert_eq!(game.runner(Lane::Top).pose, RunnerPose::Running);
        assert_eq!(game.raw_score, 0);
    }

    #[test]
    fn test_jump_only_affects_its_lane() {
        let (mut game, _) = started(false);
        process_input(&mut game, RunnerInput::Jump(Lane::Bottom));
        assert!(game.runner(Lane::Bottom).is_airborne());
        assert!(!game.runner(Lane::Top).is_airborne());
    }

    #[test]
    fn test_crouch_and_release_by_key() {
        let (mut game, mut rng) = started(false);
        process_input(&mut game, RunnerInput::Crouch(Lane::Top));
        for _ in 0..100 {
            step_frame(&mut game, &mut rng);
            game.obstacles.clear();
        }
        assert_eq!(game.runner(Lane::Top).pose, RunnerPose::Crouching);
        process_input(&mut game, RunnerInput::ReleaseCrouch(Lane::Top));
        assert_eq!(game.runner(Lane::Top).pose, RunnerPose::Running);
    }

    #[test]
    fn test_crouch_auto_releases_without_key_up() {
        let (mut game, mut rng) = started(true);
        process_input(&mut game, RunnerInput::Crouch(Lane::Bottom));
        for _ in 0..CROUCH_HOLD_FRAMES {
            step_frame(&mut game, &mut rng);
            game.obstacles.clear();
        }
        assert_eq!(game.runner(Lane::Bottom).pose, RunnerPose::Running);
    }

    #[test]
    fn test_score_accumulates_per_frame() {
        let (mut game, mut rng) = started(false);
        for _ in 0..40 {
            step_frame(&mut game, &mut rng);
        }
        assert_eq!(game.raw_score, 40);
        assert_eq!(game.display_score(), 2);
    }

    #[test]
    fn test_speed_steps_every_4000_raw_points() {
        let (mut game, mut rng) = started(false);
        game.raw_score = SPEED_STEP_SCORE - 1;
        step_frame(&mut game, &mut rng);
        assert!((game.speed - (BASE_SPEED + SPEED_INCREMENT)).abs() < 1e-9);
        step_frame(&mut game, &mut rng);
        assert!((game.speed - (BASE_SPEED + SPEED_INCREMENT)).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_interval_shrinks_to_floor() {
        let (mut game, mut rng) = started(false);
        game.spawn_interval = MIN_SPAWN_INTERVAL + 1;
        game.spawn_timer = game.spawn_interval - 1;
        step_frame(&mut game, &mut rng);
        assert_eq!(game.obstacle_pairs, 1);
        assert_eq!(game.spawn_interval, MIN_SPAWN_INTERVAL);
        assert_eq!(game.spawn_timer, 0);

        game.spawn_timer = MIN_SPAWN_INTERVAL - 1;
        step_frame(&mut game, &mut rng);
        assert_eq!(game.spawn_interval, MIN_SPAWN_INTERVAL);
    }

    #[test]
    fn test_harmony_spawns_matching_kinds() {
        let (mut game, mut rng) = started(false);
        game.mode = LaneMode::Harmony;
        for _ in 0..20 {
            game.obstacles.clear();
            spawn_obstacles(&mut game, &mut rng);
            assert_eq!(game.obstacles[0].kind, game.obstacles[1].kind);
            assert_eq!(game.obstacles[0].lane, Lane::Top);
            assert_eq!(game.obstacles[1].lane, Lane::Bottom);
        }
    }

    #[test]
    fn test_disharmony_spawns_opposite_kinds() {
        let (mut game, mut rng) = started(false);
        game.mode = LaneMode::Disharmony;
        for _ in 0..20 {
            game.obstacles.clear();
            spawn_obstacles(&mut game, &mut rng);
            assert_eq!(game.obstacles[1].kind, game.obstacles[0].kind.opposite());
        }
    }

    #[test]
    fn test_mode_rerolled_at_deadline() {
        let (mut game, mut rng) = started(false);
        game.next_mode_change = game.mode_frames + 1;
        step_frame(&mut game, &mut rng);
        let now = game.mode_frames;
        assert!(game.next_mode_change >= now + MODE_MIN_FRAMES);
        assert!(game.next_mode_change < now + MODE_MIN_FRAMES + MODE_JITTER_FRAMES);
    }

    #[test]
    fn test_obstacles_scroll_and_despawn() {
        let (mut game, mut rng) = started(false);
        game.obstacles.push(obstacle_at(Lane::Top, ObstacleKind::Ground, -38.0));
        game.obstacles.push(obstacle_at(Lane::Top, ObstacleKind::Ground, 600.0));
        step_frame(&mut game, &mut rng);
        assert_eq!(game.obstacles.len(), 1);
        assert_eq!(game.obstacles[0].x, 600.0 - BASE_SPEED);
    }

    #[test]
    fn test_ground_obstacle_crashes_standing_runner() {
        let (mut game, mut rng) = started(false);
        game.obstacles.push(obstacle_at(Lane::Bottom, ObstacleKind::Ground, RUNNER_X + BASE_SPEED));
        step_frame(&mut game, &mut rng);
        match game.game_result {
            Some(RunnerResult::Crashed(event)) => {
                assert_eq!(event.lane, Lane::Bottom);
                assert_eq!(event.kind, ObstacleKind::Ground);
            }
            other => panic!("expected crash, got {:?}", other),
        }
    }

    #[test]
    fn test_airborne_runner_clears_ground_obstacle() {
        let (mut game, mut rng) = started(false);
        let runner = &mut game.runners[Lane::Top.index()];
        runner.jump();
        runner.y = TOP_LANE_GROUND - RUNNER_HEIGHT - 100.0;
        game.obstacles.push(obstacle_at(Lane::Top, ObstacleKind::Ground, RUNNER_X + BASE_SPEED));
        step_frame(&mut game, &mut rng);
        assert!(game.game_result.is_none());
    }

    #[test]
    fn test_crouched_runner_ducks_flying_obstacle() {
        let (mut game, mut rng) = started(false);
        process_input(&mut game, RunnerInput::Crouch(Lane::Top));
        game.obstacles.push(obstacle_at(Lane::Top, ObstacleKind::Flying, RUNNER_X + BASE_SPEED));
        step_frame(&mut game, &mut rng);
        assert!(game.game_result.is_none());
    }

    #[test]
    fn test_obstacle_in_other_lane_is_harmless() {
        let (mut game, mut rng) = started(false);
        let mut obstacle = obstacle_at(Lane::Top, ObstacleKind::Ground, RUNNER_X + BASE_SPEED);
        obstacle.lane = Lane::Bottom;
        obstacle.y = TOP_LANE_GROUND - 45.0;
        game.obstacles.push(obstacle);
        step_frame(&mut game, &mut rng);
        assert!(game.game_result.is_none());
    }

    #[test]
    fn test_pause_freezes_run() {
        let (mut game, mut rng) = started(false);
        process_input(&mut game, RunnerInput::Select);
        assert!(game.paused);
        assert!(!tick_runner(&mut game, 100, &mut rng));
        process_input(&mut game, RunnerInput::Jump(Lane::Top));
        assert!(!game.runner(Lane::Top).is_airborne());
        process_input(&mut game, RunnerInput::Select);
        assert!(tick_runner(&mut game, 32, &mut rng));
        assert_eq!(game.raw_score, 2);
    }

    #[test]
    fn test_forfeit_flow() {
        let (mut game, _) = started(false);
        process_input(&mut game, RunnerInput::Forfeit);
        assert!(game.forfeit_pending);
        process_input(&mut game, RunnerInput::Jump(Lane::Top));
        assert!(!game.forfeit_pending);
        assert!(!game.runner(Lane::Top).is_airborne());
        process_input(&mut game, RunnerInput::Forfeit);
        process_input(&mut game, RunnerInput::Forfeit);
        assert_eq!(game.game_result, Some(RunnerResult::Forfeit));
    }

    #[test]
    fn test_dt_clamped() {
        let (mut game, mut rng) = started(false);
        tick_runner(&mut game, 5_000, &mut rng);
        assert_eq!(game.frame_count, MAX_FRAME_DT_MS / FRAME_MS);
    }
}
