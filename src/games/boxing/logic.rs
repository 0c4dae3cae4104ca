//! Boxing logic: strike resolution, round pacing and the deferred
//! attack/injury sequences.

use rand::Rng;
use tracing::{debug, info};

use super::types::*;
use crate::core::{FRAME_MS, MAX_FRAME_DT_MS};
use crate::games::Player;

/// UI-agnostic input actions for Boxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxingInput {
    Strike(Player, Move),
    Select,  // Space: start, then pause/resume
    Forfeit, // Esc
    Other,
}

/// Process player input. Returns what a strike resolved to, if anything.
pub fn process_input<R: Rng>(
    game: &mut BoxingGame,
    input: BoxingInput,
    rng: &mut R,
) -> Option<RoundOutcome> {
    if game.game_result.is_some() {
        return None;
    }

    if game.waiting_to_start {
        if matches!(input, BoxingInput::Select) {
            game.waiting_to_start = false;
            info!("boxing match started");
            spawn_round(game, rng);
        }
        return None;
    }

    match input {
        BoxingInput::Forfeit => {
            if game.forfeit_pending {
                finish(game, BoxingResult::Forfeit);
            } else {
                game.forfeit_pending = true;
            }
            None
        }
        BoxingInput::Select => {
            if game.forfeit_pending {
                game.forfeit_pending = false;
            } else {
                game.paused = !game.paused;
                debug!(paused = game.paused, "boxing pause toggled");
            }
            None
        }
        BoxingInput::Other => {
            game.forfeit_pending = false;
            None
        }
        BoxingInput::Strike(player, mv) => {
            if game.forfeit_pending {
                game.forfeit_pending = false;
                return None;
            }
            if game.paused || game.waiting_for_sequence {
                return None;
            }
            resolve_strike(game, player, mv, rng)
        }
    }
}

/// Advance the game by `dt_ms` in fixed frames. Returns true if state changed.
pub fn tick_boxing<R: Rng>(game: &mut BoxingGame, dt_ms: u64, rng: &mut R) -> bool {
    if game.game_result.is_some() {
        return false;
    }
    // Paused, waiting or confirming forfeit: the game clock stands still.
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

fn step_frame<R: Rng>(game: &mut BoxingGame, rng: &mut R) {
    game.frame_count += 1;

    game.timeline.advance(FRAME_MS);
    while let Some(event) = game.timeline.pop_due() {
        handle_event(game, event);
        if game.game_result.is_some() {
            return;
        }
    }

    let speed = game.cue_speed;
    for cue in game.cues.iter_mut().flatten() {
        cue.advance(speed);
    }

    if !game.waiting_for_sequence {
        game.round_frames += 1;
        if game.round_frames >= game.round_timeout_frames {
            time_out_round(game, rng);
        }
    }

    if game.waiting_for_sequence && game.timeline.is_idle() {
        spawn_round(game, rng);
    }
}

/// Start a new round with a fresh cue for each player.
fn spawn_round<R: Rng>(game: &mut BoxingGame, rng: &mut R) {
    game.round += 1;
    game.round_frames = 0;
    game.waiting_for_sequence = false;
    for player in Player::ALL {
        game.boxers[player.index()].round = RoundState::Awaiting;
        game.cues[player.index()] = Some(Cue::spawn(player, Move::random(rng)));
    }
    debug!(
        round = game.round,
        timeout_frames = game.round_timeout_frames,
        cue_speed = game.cue_speed,
        "boxing round spawned"
    );
}

fn resolve_strike<R: Rng>(
    game: &mut BoxingGame,
    player: Player,
    mv: Move,
    rng: &mut R,
) -> Option<RoundOutcome> {
    let idx = player.index();
    if game.boxers[idx].round.is_resolved() {
        return None;
    }
    let cue = game.cues[idx].take()?;

    let outcome = if mv == cue.required {
        let early = !cue.arrived;
        let boxer = &mut game.boxers[idx];
        boxer.round = RoundState::HitCorrect { early };
        boxer.state = BoxerState::Attacking(mv);
        if early {
            game.timing_bonus += TIMING_BONUS;
        }
        game.timeline.schedule(STRIKE_RECOVERY_MS, BoxingEvent::StrikeRecovered(player));

        if game.boxers.iter().all(|b| b.round.is_hit()) {
            return Some(joint_hit(game));
        }
        RoundOutcome::Hit { player, early }
    } else {
        game.boxers[idx].round = RoundState::HitWrong;
        monster_attack(game, player, WRONG_KEY_DAMAGE, rng);
        RoundOutcome::Wrong { player }
    };

    if game.boxers.iter().all(|b| b.round.is_resolved()) {
        game.waiting_for_sequence = true;
    }
    Some(outcome)
}

/// Both players hit their cue: damage the monster and raise the pace.
fn joint_hit(game: &mut BoxingGame) -> RoundOutcome {
    game.waiting_for_sequence = true;
    game.monster_health -= HIT_DAMAGE * 2;
    game.score += COOPERATION_BONUS;
    game.round_timeout_frames = game
        .round_timeout_frames
        .saturating_sub(ROUND_TIMEOUT_STEP_FRAMES)
        .max(MIN_ROUND_TIMEOUT_FRAMES);
    game.cue_speed = (game.cue_speed + CUE_SPEED_STEP).min(MAX_CUE_SPEED);
    game.timeline.schedule(ATTACK_ANIMATION_MS, BoxingEvent::MonsterHurt);
    debug!(
        monster_health = game.monster_health,
        score = game.score,
        "joint hit"
    );
    RoundOutcome::JointHit
}

fn time_out_round<R: Rng>(game: &mut BoxingGame, rng: &mut R) {
    for player in Player::ALL {
        let idx = player.index();
        if game.boxers[idx].round.is_resolved() {
            continue;
        }
        game.boxers[idx].round = RoundState::TimedOut;
        game.cues[idx] = None;
        debug!(player = ?player, round = game.round, "round timed out");
        monster_attack(game, player, TIMEOUT_DAMAGE, rng);
    }
    game.waiting_for_sequence = true;
}

fn monster_attack<R: Rng>(game: &mut BoxingGame, target: Player, damage: i32, rng: &mut R) {
    game.monster_state = MonsterState::Attacking(Side::random(rng));
    game.timeline.schedule(
        ATTACK_ANIMATION_MS,
        BoxingEvent::MonsterStrikes { target, damage },
    );
}

fn handle_event(game: &mut BoxingGame, event: BoxingEvent) {
    match event {
        BoxingEvent::StrikeRecovered(player) => {
            let boxer = &mut game.boxers[player.index()];
            if matches!(boxer.state, BoxerState::Attacking(_)) {
                boxer.state = BoxerState::Idle;
            }
        }
        BoxingEvent::MonsterStrikes { target, damage } => {
            let boxer = &mut game.boxers[target.index()];
            boxer.health -= damage;
            boxer.state = BoxerState::Injured;
            if matches!(game.monster_state, MonsterState::Attacking(_)) {
                game.monster_state = MonsterState::Idle;
            }
            debug!(player = ?target, damage, health = boxer.health, "monster strike landed");
            game.timeline.schedule(INJURY_ANIMATION_MS, BoxingEvent::PlayerRecovered(target));
            check_defeat(game);
        }
        BoxingEvent::PlayerRecovered(player) => {
            let boxer = &mut game.boxers[player.index()];
            if boxer.state == BoxerState::Injured {
                boxer.state = BoxerState::Idle;
            }
        }
        BoxingEvent::MonsterHurt => {
            game.monster_state = MonsterState::Hurt;
            game.timeline.schedule(INJURY_ANIMATION_MS, BoxingEvent::JointSequenceEnd);
        }
        BoxingEvent::JointSequenceEnd => {
            if game.monster_health <= 0 {
                game.monster_state = MonsterState::Dying;
                game.timeline.schedule(DEATH_ANIMATION_MS, BoxingEvent::DeathSettled);
            } else {
                game.monster_state = MonsterState::Idle;
                for boxer in game.boxers.iter_mut() {
                    boxer.state = BoxerState::Idle;
                }
            }
        }
        BoxingEvent::DeathSettled => {
            game.monster_state = MonsterState::Dead;
            finish(game, BoxingResult::Victory);
        }
    }
}

/// A beaten player ends the match, unless the monster is already going down.
fn check_defeat(game: &mut BoxingGame) {
    if game.monster_health <= 0 {
        return;
    }
    if game.boxers.iter().any(|b| b.health <= 0) {
        game.monster_state = MonsterState::Laughing;
        finish(game, BoxingResult::Defeat);
    }
}

fn finish(game: &mut BoxingGame, result: BoxingResult) {
    game.game_result = Some(result);
    game.forfeit_pending = false;
    game.cues = [None, None];
    let dropped = game.timeline.cancel_all();
    info!(
        result = ?result,
        score = game.score,
        timing_bonus = game.timing_bonus,
        rounds = game.round,
        dropped_events = dropped,
        "boxing match finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn started() -> (BoxingGame, ChaCha8Rng) {
        let mut rng = rng();
        let mut game = BoxingGame::new();
        process_input(&mut game, BoxingInput::Select, &mut rng);
        (game, rng)
    }

    fn run_for(game: &mut BoxingGame, ms: u64, rng: &mut ChaCha8Rng) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(FRAME_MS);
            tick_boxing(game, step, rng);
            remaining -= step;
        }
    }

    fn required(game: &BoxingGame, player: Player) -> Move {
        game.cues[player.index()].expect("cue present").required
    }

    fn wrong_move(mv: Move) -> Move {
        match mv {
            Move::HighKick => Move::LowKick,
            _ => Move::HighKick,
        }
    }

    fn joint_hit_now(game: &mut BoxingGame, rng: &mut ChaCha8Rng) -> Option<RoundOutcome> {
        let m1 = required(game, Player::One);
        let m2 = required(game, Player::Two);
        process_input(game, BoxingInput::Strike(Player::One, m1), rng);
        process_input(game, BoxingInput::Strike(Player::Two, m2), rng)
    }

    #[test]
    fn test_space_starts_first_round() {
        let (game, _) = started();
        assert!(!game.waiting_to_start);
        assert_eq!(game.round, 1);
        assert!(game.cues.iter().all(Option::is_some));
    }

    #[test]
    fn test_strikes_ignored_before_start() {
        let mut rng = rng();
        let mut game = BoxingGame::new();
        let outcome = process_input(
            &mut game,
            BoxingInput::Strike(Player::One, Move::HighKick),
            &mut rng,
        );
        assert!(outcome.is_none());
        assert!(!tick_boxing(&mut game, 100, &mut rng));
    }

    #[test]
    fn test_joint_hit_damages_monster_and_scales_difficulty() {
        let (mut game, mut rng) = started();
        let outcome = joint_hit_now(&mut game, &mut rng);
        assert_eq!(outcome, Some(RoundOutcome::JointHit));
        assert_eq!(game.monster_health, MONSTER_MAX_HEALTH - 40);
        assert_eq!(game.score, COOPERATION_BONUS);
        assert_eq!(game.round_timeout_frames, INITIAL_ROUND_TIMEOUT_FRAMES - 5);
        assert_eq!(game.cue_speed, INITIAL_CUE_SPEED + 0.5);
        // Both cues were still sliding in, so both strikes were early.
        assert_eq!(game.timing_bonus, 2 * TIMING_BONUS);
        assert_eq!(game.total_score(), COOPERATION_BONUS + 2 * TIMING_BONUS);
    }

    #[test]
    fn test_single_hit_does_not_score() {
        let (mut game, mut rng) = started();
        let m1 = required(&game, Player::One);
        let outcome = process_input(&mut game, BoxingInput::Strike(Player::One, m1), &mut rng);
        assert_eq!(
            outcome,
            Some(RoundOutcome::Hit {
                player: Player::One,
                early: true
            })
        );
        assert_eq!(game.score, 0);
        assert_eq!(game.monster_health, MONSTER_MAX_HEALTH);
        assert!(!game.waiting_for_sequence);
    }

    #[test]
    fn test_late_hit_has_no_timing_bonus() {
        let (mut game, mut rng) = started();
        // Cues travel 240px at 3px/frame: arrived after 80 frames.
        run_for(&mut game, 90 * FRAME_MS, &mut rng);
        assert!(game.cues[0].expect("cue").arrived);
        let m1 = required(&game, Player::One);
        let outcome = process_input(&mut game, BoxingInput::Strike(Player::One, m1), &mut rng);
        assert_eq!(
            outcome,
            Some(RoundOutcome::Hit {
                player: Player::One,
                early: false
            })
        );
        assert_eq!(game.timing_bonus, 0);
    }

    #[test]
    fn test_monster_dies_after_thirteen_joint_hits() {
        let (mut game, mut rng) = started();
        for hit in 1..=13 {
            assert_eq!(joint_hit_now(&mut game, &mut rng), Some(RoundOutcome::JointHit));
            if hit < 13 {
                run_for(&mut game, 1300 + FRAME_MS, &mut rng);
                assert_eq!(game.round, hit + 1, "next round after hit {}", hit);
            }
        }
        assert_eq!(game.monster_health, 500 - 13 * 40);
        assert_eq!(game.monster_display_health(), 0);
        assert!(game.game_result.is_none());

        run_for(&mut game, 1300 + FRAME_MS, &mut rng);
        assert_eq!(game.monster_state, MonsterState::Dying);
        assert!(game.game_result.is_none());

        run_for(&mut game, 1000, &mut rng);
        assert_eq!(game.game_result, Some(BoxingResult::Victory));
        assert_eq!(game.monster_state, MonsterState::Dead);
        assert_eq!(game.round_timeout_frames, MIN_ROUND_TIMEOUT_FRAMES.max(200 - 13 * 5));
        assert_eq!(game.cue_speed, MAX_CUE_SPEED.min(3.0 + 13.0 * 0.5));
    }

    #[test]
    fn test_wrong_key_damage_is_deferred() {
        let (mut game, mut rng) = started();
        let wrong = wrong_move(required(&game, Player::One));
        let outcome = process_input(&mut game, BoxingInput::Strike(Player::One, wrong), &mut rng);
        assert_eq!(outcome, Some(RoundOutcome::Wrong { player: Player::One }));
        assert!(matches!(game.monster_state, MonsterState::Attacking(_)));
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH);

        run_for(&mut game, 640, &mut rng);
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH);

        run_for(&mut game, 16, &mut rng);
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH - WRONG_KEY_DAMAGE);
        assert_eq!(game.boxer(Player::One).state, BoxerState::Injured);
        assert_eq!(game.monster_state, MonsterState::Idle);

        run_for(&mut game, 656, &mut rng);
        assert_eq!(game.boxer(Player::One).state, BoxerState::Idle);
    }

    #[test]
    fn test_wrong_key_is_terminal_for_the_round() {
        let (mut game, mut rng) = started();
        let right = required(&game, Player::One);
        let wrong = wrong_move(right);
        process_input(&mut game, BoxingInput::Strike(Player::One, wrong), &mut rng);
        let retry = process_input(&mut game, BoxingInput::Strike(Player::One, right), &mut rng);
        assert!(retry.is_none());
        assert_eq!(game.boxer(Player::One).round, RoundState::HitWrong);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_timeout_damages_unresolved_players_only() {
        let (mut game, mut rng) = started();
        let m1 = required(&game, Player::One);
        process_input(&mut game, BoxingInput::Strike(Player::One, m1), &mut rng);

        run_for(&mut game, 200 * FRAME_MS, &mut rng);
        assert_eq!(game.boxer(Player::Two).round, RoundState::TimedOut);
        assert!(game.waiting_for_sequence);

        run_for(&mut game, ATTACK_ANIMATION_MS + FRAME_MS, &mut rng);
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH);
        assert_eq!(game.boxer(Player::Two).health, PLAYER_MAX_HEALTH - TIMEOUT_DAMAGE);
    }

    #[test]
    fn test_next_round_waits_for_sequences() {
        let (mut game, mut rng) = started();
        let w1 = wrong_move(required(&game, Player::One));
        let w2 = wrong_move(required(&game, Player::Two));
        process_input(&mut game, BoxingInput::Strike(Player::One, w1), &mut rng);
        process_input(&mut game, BoxingInput::Strike(Player::Two, w2), &mut rng);
        assert!(game.waiting_for_sequence);

        run_for(&mut game, 1200, &mut rng);
        assert_eq!(game.round, 1);
        run_for(&mut game, 200, &mut rng);
        assert_eq!(game.round, 2);
        assert!(game.boxers.iter().all(|b| b.round == RoundState::Awaiting));
    }

    #[test]
    fn test_defeat_when_health_runs_out() {
        let (mut game, mut rng) = started();
        for _ in 0..5 {
            let w1 = wrong_move(required(&game, Player::One));
            let m2 = required(&game, Player::Two);
            process_input(&mut game, BoxingInput::Strike(Player::One, w1), &mut rng);
            process_input(&mut game, BoxingInput::Strike(Player::Two, m2), &mut rng);
            run_for(&mut game, 1400, &mut rng);
        }
        assert_eq!(game.boxer(Player::One).display_health(), 0);
        assert_eq!(game.game_result, Some(BoxingResult::Defeat));
        assert_eq!(game.monster_state, MonsterState::Laughing);
        assert!(game.timeline.is_idle());
    }

    #[test]
    fn test_pending_monster_death_beats_player_defeat() {
        let (mut game, mut rng) = started();
        game.monster_health = 0;
        game.boxers[0].health = 5;
        game.timeline.schedule(
            0,
            BoxingEvent::MonsterStrikes {
                target: Player::One,
                damage: 20,
            },
        );
        run_for(&mut game, FRAME_MS, &mut rng);
        assert!(game.game_result.is_none());
    }

    #[test]
    fn test_pause_freezes_pending_damage() {
        let (mut game, mut rng) = started();
        let wrong = wrong_move(required(&game, Player::One));
        process_input(&mut game, BoxingInput::Strike(Player::One, wrong), &mut rng);
        run_for(&mut game, 320, &mut rng);

        process_input(&mut game, BoxingInput::Select, &mut rng);
        assert!(game.paused);
        run_for(&mut game, 5000, &mut rng);
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH);

        process_input(&mut game, BoxingInput::Select, &mut rng);
        run_for(&mut game, 320, &mut rng);
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH);
        run_for(&mut game, 16, &mut rng);
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH - WRONG_KEY_DAMAGE);
    }

    #[test]
    fn test_strikes_ignored_while_paused() {
        let (mut game, mut rng) = started();
        process_input(&mut game, BoxingInput::Select, &mut rng);
        let m1 = required(&game, Player::One);
        assert!(process_input(&mut game, BoxingInput::Strike(Player::One, m1), &mut rng).is_none());
        assert_eq!(game.boxer(Player::One).round, RoundState::Awaiting);
    }

    #[test]
    fn test_forfeit_cancels_pending_sequences() {
        let (mut game, mut rng) = started();
        let wrong = wrong_move(required(&game, Player::One));
        process_input(&mut game, BoxingInput::Strike(Player::One, wrong), &mut rng);
        process_input(&mut game, BoxingInput::Forfeit, &mut rng);
        assert!(game.forfeit_pending);
        process_input(&mut game, BoxingInput::Forfeit, &mut rng);
        assert_eq!(game.game_result, Some(BoxingResult::Forfeit));
        assert!(game.timeline.is_idle());
        assert_eq!(game.boxer(Player::One).health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_other_key_cancels_forfeit() {
        let (mut game, mut rng) = started();
        process_input(&mut game, BoxingInput::Forfeit, &mut rng);
        process_input(&mut game, BoxingInput::Other, &mut rng);
        assert!(!game.forfeit_pending);
        assert!(game.game_result.is_none());
    }

    #[test]
    fn test_dt_clamped() {
        let (mut game, mut rng) = started();
        tick_boxing(&mut game, 10_000, &mut rng);
        assert_eq!(game.frame_count, MAX_FRAME_DT_MS / FRAME_MS);
    }
}
