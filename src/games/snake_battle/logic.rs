//! Snake battle logic: per-snake movement timers, food, collisions and the
//! match result.

use rand::Rng;
use tracing::{debug, info};

use super::types::*;
use crate::core::MAX_SNAKE_DT_MS;
use crate::games::Player;

/// UI-agnostic input actions for Snake battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeBattleInput {
    Steer(Player, Direction),
    Select,  // Space: start, then pause/resume
    Forfeit, // Esc
    Other,
}

/// What one snake's move produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Ate(FoodKind),
    Died(DeathCause),
}

/// Process player input.
pub fn process_input(game: &mut SnakeBattleGame, input: SnakeBattleInput) {
    if game.game_result.is_some() {
        return;
    }

    if game.waiting_to_start {
        if matches!(input, SnakeBattleInput::Select) {
            game.waiting_to_start = false;
            info!(grid = game.grid_size, "snake battle started");
        }
        return;
    }

    match input {
        SnakeBattleInput::Steer(player, direction) => {
            if game.forfeit_pending {
                game.forfeit_pending = false;
            } else if !game.paused {
                let snake = &mut game.snakes[player.index()];
                // Compare against the direction last moved, not the buffered one.
                if snake.direction != direction.opposite() {
                    snake.next_direction = direction;
                }
            }
        }
        SnakeBattleInput::Select => {
            if game.forfeit_pending {
                game.forfeit_pending = false;
            } else {
                game.paused = !game.paused;
            }
        }
        SnakeBattleInput::Forfeit => {
            if game.forfeit_pending {
                finish(game, SnakeBattleResult::Forfeit);
            } else {
                game.forfeit_pending = true;
            }
        }
        SnakeBattleInput::Other => game.forfeit_pending = false,
    }
}

/// Advance the match by `dt_ms`. Each snake moves when its own interval has
/// elapsed. Returns true if either snake moved.
pub fn tick_snake_battle<R: Rng>(game: &mut SnakeBattleGame, dt_ms: u64, rng: &mut R) -> bool {
    if game.game_result.is_some() {
        return false;
    }
    if game.waiting_to_start || game.paused || game.forfeit_pending {
        return false;
    }

    let dt_ms = dt_ms.min(MAX_SNAKE_DT_MS);
    game.tick_count += 1;

    for snake in game.snakes.iter_mut() {
        snake.boost_remaining_ms = snake.boost_remaining_ms.saturating_sub(dt_ms);
        snake.ate_this_tick = false;
    }

    // Collisions against the other snake use its body from before this tick.
    let before: [Vec<Position>; 2] = [game.snakes[0].cells(), game.snakes[1].cells()];
    let mut new_heads: [Option<Position>; 2] = [None, None];
    let mut changed = false;

    for player in Player::ALL {
        let snake = &mut game.snakes[player.index()];
        snake.since_move_ms += dt_ms;
        if snake.since_move_ms < snake.move_interval_ms() {
            continue;
        }
        snake.since_move_ms = 0;
        changed = true;

        let outcome = move_snake(game, player, &before[player.other().index()], rng);
        if !matches!(outcome, MoveOutcome::Died(_)) {
            new_heads[player.index()] = Some(game.snakes[player.index()].head());
        }
    }

    if let [Some(a), Some(b)] = new_heads {
        if a == b {
            for player in Player::ALL {
                kill(game, player, DeathCause::HeadOn);
            }
        }
    }

    let alive = [game.snakes[0].alive, game.snakes[1].alive];
    let result = match alive {
        [true, true] => None,
        [true, false] => Some(SnakeBattleResult::Winner(Player::One)),
        [false, true] => Some(SnakeBattleResult::Winner(Player::Two)),
        [false, false] => Some(SnakeBattleResult::Draw),
    };
    if let Some(result) = result {
        finish(game, result);
    }

    changed
}

/// Move one snake a cell. `other_before` is the other snake's pre-tick body.
pub fn move_snake<R: Rng>(
    game: &mut SnakeBattleGame,
    player: Player,
    other_before: &[Position],
    rng: &mut R,
) -> MoveOutcome {
    let idx = player.index();
    let grid_size = game.grid_size;
    let snake = &mut game.snakes[idx];
    snake.direction = snake.next_direction;
    let new_head = snake.head().step(snake.direction);

    let in_bounds =
        new_head.x >= 0 && new_head.y >= 0 && new_head.x < grid_size && new_head.y < grid_size;
    let cause = if !in_bounds {
        Some(DeathCause::Wall)
    } else if snake.occupies(new_head) {
        Some(DeathCause::OwnBody)
    } else if other_before.contains(&new_head) {
        Some(DeathCause::OtherSnake)
    } else {
        None
    };
    if let Some(cause) = cause {
        kill(game, player, cause);
        return MoveOutcome::Died(cause);
    }

    // The new head starts drawn where the old head was.
    let (visual_x, visual_y) = snake
        .body
        .front()
        .map(|s| (s.visual_x, s.visual_y))
        .unwrap_or((new_head.x as f64, new_head.y as f64));
    snake.body.push_front(Segment {
        cell: new_head,
        visual_x,
        visual_y,
    });

    let mut outcome = MoveOutcome::Moved;
    if !snake.ate_this_tick && new_head == game.food.position {
        snake.ate_this_tick = true;
        let kind = game.food.kind;
        snake.score += kind.score();
        snake.growth_pending += kind.growth();
        if kind == FoodKind::Pear {
            snake.boost_remaining_ms = SPEED_BOOST_MS;
        }
        outcome = MoveOutcome::Ate(kind);
    }

    if snake.growth_pending > 0 {
        snake.growth_pending -= 1;
    } else {
        snake.body.pop_back();
    }

    if let MoveOutcome::Ate(kind) = outcome {
        debug!(player = ?player, food = ?kind, score = game.snakes[idx].score, "snake ate");
        game.food = spawn_food(game, rng);
    }
    outcome
}

fn kill(game: &mut SnakeBattleGame, player: Player, cause: DeathCause) {
    let snake = &mut game.snakes[player.index()];
    if !snake.alive {
        return;
    }
    snake.alive = false;
    snake.death = Some(cause);
    debug!(player = ?player, cause = ?cause, length = snake.len(), "snake died");
}

fn finish(game: &mut SnakeBattleGame, result: SnakeBattleResult) {
    game.game_result = Some(result);
    game.forfeit_pending = false;
    match result {
        SnakeBattleResult::Winner(player) => game.wins[player.index()] += 1,
        SnakeBattleResult::Draw => game.draws += 1,
        SnakeBattleResult::Forfeit => {}
    }
    info!(
        result = ?result,
        p1_score = game.snakes[0].score,
        p2_score = game.snakes[1].score,
        "snake battle finished"
    );
}

/// Ease every segment's drawn position toward its cell. Never touches
/// logical state.
pub fn update_visuals(game: &mut SnakeBattleGame) {
    for snake in game.snakes.iter_mut() {
        for segment in snake.body.iter_mut() {
            segment.ease();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(13)
    }

    fn started() -> (SnakeBattleGame, ChaCha8Rng) {
        let mut rng = rng();
        let mut game = SnakeBattleGame::new(DEFAULT_GRID_SIZE, &mut rng);
        process_input(&mut game, SnakeBattleInput::Select);
        // Park the food where neither snake goes unless a test moves it.
        game.food = Food {
            position: Position::new(0, DEFAULT_GRID_SIZE - 1),
            kind: FoodKind::Apple,
        };
        (game, rng)
    }

    fn place(game: &mut SnakeBattleGame, player: Player, cells: &[(i16, i16)], dir: Direction) {
        let snake = &mut game.snakes[player.index()];
        snake.body = cells
            .iter()
            .map(|&(x, y)| Segment::at(Position::new(x, y)))
            .collect::<VecDeque<_>>();
        snake.direction = dir;
        snake.next_direction = dir;
    }

    fn food_at(game: &mut SnakeBattleGame, x: i16, y: i16, kind: FoodKind) {
        game.food = Food {
            position: Position::new(x, y),
            kind,
        };
    }

    #[test]
    fn test_waiting_blocks_movement() {
        let mut rng = rng();
        let mut game = SnakeBattleGame::new(DEFAULT_GRID_SIZE, &mut rng);
        let head = game.snake(Player::One).head();
        assert!(!tick_snake_battle(&mut game, 250, &mut rng));
        assert_eq!(game.snake(Player::One).head(), head);
    }

    #[test]
    fn test_snakes_move_on_own_interval() {
        let (mut game, mut rng) = started();
        let head = game.snake(Player::One).head();
        assert!(!tick_snake_battle(&mut game, 249, &mut rng));
        assert!(tick_snake_battle(&mut game, 1, &mut rng));
        assert_eq!(game.snake(Player::One).head(), Position::new(head.x + 1, head.y));
        assert_eq!(game.snake(Player::One).since_move_ms, 0);
    }

    #[test]
    fn test_reversal_rejected() {
        let (mut game, _) = started();
        process_input(&mut game, SnakeBattleInput::Steer(Player::One, Direction::Left));
        assert_eq!(game.snake(Player::One).next_direction, Direction::Right);
        process_input(&mut game, SnakeBattleInput::Steer(Player::One, Direction::Up));
        assert_eq!(game.snake(Player::One).next_direction, Direction::Up);
        // Still moving right, so Left stays illegal until the turn is taken.
        process_input(&mut game, SnakeBattleInput::Steer(Player::One, Direction::Left));
        assert_eq!(game.snake(Player::One).next_direction, Direction::Up);
    }

    #[test]
    fn test_apple_scores_and_grows_one() {
        let (mut game, mut rng) = started();
        let head = game.snake(Player::One).head();
        food_at(&mut game, head.x + 1, head.y, FoodKind::Apple);
        tick_snake_battle(&mut game, 250, &mut rng);
        let snake = game.snake(Player::One);
        assert_eq!(snake.score, 1);
        // Growth is applied one segment per move, starting with this one.
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.growth_pending, 0);
        assert_ne!(game.food.position, Position::new(head.x + 1, head.y));
    }

    #[test]
    fn test_banana_grows_exactly_two() {
        let (mut with_food, mut rng_a) = started();
        let (mut without_food, mut rng_b) = started();
        let head = with_food.snake(Player::One).head();
        food_at(&mut with_food, head.x + 1, head.y, FoodKind::Banana);

        for _ in 0..5 {
            tick_snake_battle(&mut with_food, 250, &mut rng_a);
            tick_snake_battle(&mut without_food, 250, &mut rng_b);
            // Keep later food out of the way in both games.
            food_at(&mut with_food, 0, DEFAULT_GRID_SIZE - 1, FoodKind::Apple);
            food_at(&mut without_food, 0, DEFAULT_GRID_SIZE - 1, FoodKind::Apple);
        }
        assert!(with_food.game_result.is_none());
        assert_eq!(
            with_food.snake(Player::One).len(),
            without_food.snake(Player::One).len() + 2
        );
        assert_eq!(with_food.snake(Player::One).score, 2);
    }

    #[test]
    fn test_growth_stacks_additively() {
        let (mut game, mut rng) = started();
        game.snakes[0].growth_pending = 1;
        let head = game.snake(Player::One).head();
        food_at(&mut game, head.x + 1, head.y, FoodKind::Banana);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert_eq!(game.snake(Player::One).growth_pending, 2);
    }

    #[test]
    fn test_pear_boosts_only_the_eater() {
        let (mut game, mut rng) = started();
        let head = game.snake(Player::Two).head();
        food_at(&mut game, head.x - 1, head.y, FoodKind::Pear);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert!(game.snake(Player::Two).is_boosted());
        assert!(!game.snake(Player::One).is_boosted());
        assert_eq!(game.snake(Player::Two).score, 0);

        // Boosted snake moves at 150ms, the other still at 250ms.
        let two = game.snake(Player::Two).head();
        let one = game.snake(Player::One).head();
        tick_snake_battle(&mut game, 150, &mut rng);
        assert_ne!(game.snake(Player::Two).head(), two);
        assert_eq!(game.snake(Player::One).head(), one);
    }

    #[test]
    fn test_boost_expires() {
        let (mut game, mut rng) = started();
        game.snakes[0].boost_remaining_ms = 300;
        tick_snake_battle(&mut game, 150, &mut rng);
        assert!(game.snake(Player::One).is_boosted());
        tick_snake_battle(&mut game, 150, &mut rng);
        assert!(!game.snake(Player::One).is_boosted());
    }

    #[test]
    fn test_wall_death_gives_other_the_win() {
        let (mut game, mut rng) = started();
        place(&mut game, Player::One, &[(15, 1), (14, 1), (13, 1)], Direction::Right);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert_eq!(game.snake(Player::One).death, Some(DeathCause::Wall));
        assert_eq!(game.game_result, Some(SnakeBattleResult::Winner(Player::Two)));
        assert_eq!(game.wins, [0, 1]);
    }

    #[test]
    fn test_own_body_collision_checks_whole_body() {
        let (mut game, mut rng) = started();
        // Head at (5,5) heading up into its own tail at (5,4).
        place(
            &mut game,
            Player::One,
            &[(5, 5), (6, 5), (6, 4), (5, 4)],
            Direction::Up,
        );
        tick_snake_battle(&mut game, 250, &mut rng);
        assert_eq!(game.snake(Player::One).death, Some(DeathCause::OwnBody));
    }

    #[test]
    fn test_other_snake_checked_against_pre_move_body() {
        let (mut game, mut rng) = started();
        // Snake one moves first and vacates its tail at (3,5).
        place(&mut game, Player::One, &[(5, 5), (4, 5), (3, 5)], Direction::Right);
        // Snake two steps into that tail cell.
        place(&mut game, Player::Two, &[(3, 6), (3, 7), (3, 8)], Direction::Up);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert!(game.snake(Player::One).alive);
        assert_eq!(game.snake(Player::Two).death, Some(DeathCause::OtherSnake));
        assert_eq!(game.game_result, Some(SnakeBattleResult::Winner(Player::One)));
    }

    #[test]
    fn test_head_on_same_cell_is_a_draw() {
        let (mut game, mut rng) = started();
        place(&mut game, Player::One, &[(4, 5), (3, 5), (2, 5)], Direction::Right);
        place(&mut game, Player::Two, &[(6, 5), (7, 5), (8, 5)], Direction::Left);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert_eq!(game.snake(Player::One).death, Some(DeathCause::HeadOn));
        assert_eq!(game.snake(Player::Two).death, Some(DeathCause::HeadOn));
        assert_eq!(game.game_result, Some(SnakeBattleResult::Draw));
        assert_eq!(game.draws, 1);
    }

    #[test]
    fn test_both_die_same_tick_is_a_draw() {
        let (mut game, mut rng) = started();
        place(&mut game, Player::One, &[(15, 1), (14, 1), (13, 1)], Direction::Right);
        place(&mut game, Player::Two, &[(0, 9), (1, 9), (2, 9)], Direction::Left);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert_eq!(game.game_result, Some(SnakeBattleResult::Draw));
    }

    #[test]
    fn test_rematch_keeps_tally() {
        let (mut game, mut rng) = started();
        place(&mut game, Player::Two, &[(0, 9), (1, 9), (2, 9)], Direction::Left);
        tick_snake_battle(&mut game, 250, &mut rng);
        assert_eq!(game.wins, [1, 0]);
        let next = game.rematch(&mut rng);
        assert_eq!(next.wins, [1, 0]);
        assert!(next.game_result.is_none());
        assert!(next.waiting_to_start);
    }

    #[test]
    fn test_visuals_never_touch_cells() {
        let (mut game, mut rng) = started();
        tick_snake_battle(&mut game, 250, &mut rng);
        let cells = game.snake(Player::One).cells();
        let head = game.snake(Player::One).body[0];
        assert!(head.visual_x < head.cell.x as f64);
        for _ in 0..10 {
            update_visuals(&mut game);
        }
        assert_eq!(game.snake(Player::One).cells(), cells);
    }

    #[test]
    fn test_pause_and_forfeit() {
        let (mut game, mut rng) = started();
        process_input(&mut game, SnakeBattleInput::Select);
        assert!(!tick_snake_battle(&mut game, 250, &mut rng));
        process_input(&mut game, SnakeBattleInput::Select);
        process_input(&mut game, SnakeBattleInput::Forfeit);
        process_input(&mut game, SnakeBattleInput::Forfeit);
        assert_eq!(game.game_result, Some(SnakeBattleResult::Forfeit));
        assert_eq!(game.wins, [0, 0]);
    }

    #[test]
    fn test_dt_clamped() {
        let (mut game, mut rng) = started();
        let head = game.snake(Player::One).head();
        tick_snake_battle(&mut game, 10_000, &mut rng);
        // Clamped to 500ms: one move, not forty.
        assert_eq!(game.snake(Player::One).head(), Position::new(head.x + 1, head.y));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn food_kind() -> impl Strategy<Value = FoodKind> {
            prop_oneof![
                Just(FoodKind::Apple),
                Just(FoodKind::Banana),
                Just(FoodKind::Pear),
            ]
        }

        proptest! {
            #[test]
            fn eating_grows_by_exactly_the_food_growth(
                kind in food_kind(),
                seed in 0u64..1000,
                extra_moves in 0usize..4,
            ) {
                let mut rng_a = ChaCha8Rng::seed_from_u64(seed);
                let mut rng_b = ChaCha8Rng::seed_from_u64(seed);
                let mut with_food = SnakeBattleGame::new(DEFAULT_GRID_SIZE, &mut rng_a);
                let mut without_food = with_food.clone();
                process_input(&mut with_food, SnakeBattleInput::Select);
                process_input(&mut without_food, SnakeBattleInput::Select);

                let head = with_food.snake(Player::One).head();
                food_at(&mut with_food, head.x + 1, head.y, kind);
                food_at(&mut without_food, 0, DEFAULT_GRID_SIZE - 1, FoodKind::Apple);

                // Pear speeds the eater up, so step by the eater's own interval.
                for _ in 0..=extra_moves {
                    let step = with_food.snake(Player::One).move_interval_ms();
                    tick_snake_battle(&mut with_food, step, &mut rng_a);
                    tick_snake_battle(&mut without_food, BASE_MOVE_INTERVAL_MS, &mut rng_b);
                    food_at(&mut with_food, 0, DEFAULT_GRID_SIZE - 1, FoodKind::Apple);
                    food_at(&mut without_food, 0, DEFAULT_GRID_SIZE - 1, FoodKind::Apple);
                }

                prop_assert!(with_food.snake(Player::One).alive);
                let moves = extra_moves + 1;
                let grown = (kind.growth() as usize).min(moves);
                prop_assert_eq!(
                    with_food.snake(Player::One).len(),
                    without_food.snake(Player::One).len() + grown
                );
            }
        }
    }
}
