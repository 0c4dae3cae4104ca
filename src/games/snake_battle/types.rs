//! Snake battle data structures.
//!
//! Two snakes share one grid and one piece of food. Each snake moves on its
//! own timer, so a speed boost only affects the snake that earned it. The
//! match ends as soon as either snake dies.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

use crate::games::Player;

pub const DEFAULT_GRID_SIZE: i16 = 16;
pub const MIN_GRID_SIZE: i16 = 12;
pub const MAX_GRID_SIZE: i16 = 40;
pub const BASE_MOVE_INTERVAL_MS: u64 = 250;
pub const BOOSTED_MOVE_INTERVAL_MS: u64 = 150;
pub const SPEED_BOOST_MS: u64 = 3000;
/// Fraction of the remaining distance a segment's drawn position covers per frame.
pub const VISUAL_LERP: f64 = 0.35;
pub const START_LENGTH: i16 = 3;
pub const PLAYER_ONE_START: Position = Position { x: 3, y: 3 };
pub const PLAYER_TWO_START: Position = Position { x: 9, y: 9 };

/// Match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeBattleResult {
    Winner(Player),
    Draw,
    Forfeit,
}

/// Cardinal direction for snake movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the (dx, dy) delta for this direction.
    pub fn delta(&self) -> (i16, i16) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// One body segment: its logical cell plus a smoothed drawing position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub cell: Position,
    pub visual_x: f64,
    pub visual_y: f64,
}

impl Segment {
    pub fn at(cell: Position) -> Self {
        Self {
            cell,
            visual_x: cell.x as f64,
            visual_y: cell.y as f64,
        }
    }

    /// Move the drawn position a fraction of the way toward the cell.
    pub fn ease(&mut self) {
        self.visual_x += (self.cell.x as f64 - self.visual_x) * VISUAL_LERP;
        self.visual_y += (self.cell.y as f64 - self.visual_y) * VISUAL_LERP;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    /// +1 score, +1 length.
    Apple,
    /// +2 score, +2 length.
    Banana,
    /// Speed boost.
    Pear,
}

impl FoodKind {
    /// Apple 50%, banana 25%, pear 25%.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let roll = rng.gen::<f64>();
        if roll < 0.5 {
            FoodKind::Apple
        } else if roll < 0.75 {
            FoodKind::Banana
        } else {
            FoodKind::Pear
        }
    }

    pub fn score(self) -> u32 {
        match self {
            FoodKind::Apple => 1,
            FoodKind::Banana => 2,
            FoodKind::Pear => 0,
        }
    }

    pub fn growth(self) -> u32 {
        match self {
            FoodKind::Apple => 1,
            FoodKind::Banana => 2,
            FoodKind::Pear => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Wall,
    OwnBody,
    OtherSnake,
    HeadOn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Head at the front.
    pub body: VecDeque<Segment>,
    pub direction: Direction,
    /// Applied at the next move; reversal onto the neck is rejected on input.
    pub next_direction: Direction,
    pub alive: bool,
    pub death: Option<DeathCause>,
    pub score: u32,
    /// Segments still to be added, one per move.
    pub growth_pending: u32,
    /// Food already resolved this tick.
    pub ate_this_tick: bool,
    /// Time since this snake last moved.
    pub since_move_ms: u64,
    pub boost_remaining_ms: u64,
}

impl Snake {
    /// A snake of `START_LENGTH` with its head at `head`, body trailing behind.
    pub fn new(head: Position, direction: Direction) -> Self {
        let trail = direction.opposite();
        let mut body = VecDeque::new();
        let mut cell = head;
        for _ in 0..START_LENGTH {
            body.push_back(Segment::at(cell));
            cell = cell.step(trail);
        }
        Self {
            body,
            direction,
            next_direction: direction,
            alive: true,
            death: None,
            score: 0,
            growth_pending: 0,
            ate_this_tick: false,
            since_move_ms: 0,
            boost_remaining_ms: 0,
        }
    }

    pub fn head(&self) -> Position {
        self.body.front().map(|s| s.cell).unwrap_or(Position::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Position) -> bool {
        self.body.iter().any(|s| s.cell == cell)
    }

    pub fn cells(&self) -> Vec<Position> {
        self.body.iter().map(|s| s.cell).collect()
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_remaining_ms > 0
    }

    pub fn move_interval_ms(&self) -> u64 {
        if self.is_boosted() {
            BOOSTED_MOVE_INTERVAL_MS
        } else {
            BASE_MOVE_INTERVAL_MS
        }
    }
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct SnakeBattleGame {
    pub game_result: Option<SnakeBattleResult>,
    pub forfeit_pending: bool,
    pub waiting_to_start: bool,
    pub paused: bool,

    pub grid_size: i16,
    pub snakes: [Snake; 2],
    pub food: Food,

    /// Match wins carried across rematches.
    pub wins: [u32; 2],
    pub draws: u32,
    pub tick_count: u64,
}

impl SnakeBattleGame {
    /// Snake one starts at (3,3) heading right, snake two at (9,9) heading left.
    pub fn new<R: Rng>(grid_size: i16, rng: &mut R) -> Self {
        let grid_size = grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        let snakes = [
            Snake::new(PLAYER_ONE_START, Direction::Right),
            Snake::new(PLAYER_TWO_START, Direction::Left),
        ];
        let placeholder = Food {
            position: Position::new(grid_size / 2, grid_size / 2),
            kind: FoodKind::Apple,
        };
        let mut game = Self {
            game_result: None,
            forfeit_pending: false,
            waiting_to_start: true,
            paused: false,
            grid_size,
            snakes,
            food: placeholder,
            wins: [0, 0],
            draws: 0,
            tick_count: 0,
        };
        game.food = spawn_food(&game, rng);
        game
    }

    /// A fresh match on the same grid, keeping the tally.
    pub fn rematch<R: Rng>(&self, rng: &mut R) -> Self {
        let mut next = Self::new(self.grid_size, rng);
        next.wins = self.wins;
        next.draws = self.draws;
        next
    }

    pub fn snake(&self, player: Player) -> &Snake {
        &self.snakes[player.index()]
    }

    pub fn in_bounds(&self, cell: Position) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.grid_size && cell.y < self.grid_size
    }
}

/// Pick a random free cell for the next food: off both snakes and not where
/// the last food was. Keeps the current food if the grid is full.
pub fn spawn_food<R: Rng>(game: &SnakeBattleGame, rng: &mut R) -> Food {
    let free: Vec<Position> = (0..game.grid_size)
        .flat_map(|y| (0..game.grid_size).map(move |x| Position::new(x, y)))
        .filter(|&cell| {
            cell != game.food.position && !game.snakes.iter().any(|s| s.occupies(cell))
        })
        .collect();

    match free.choose(rng) {
        Some(&position) => Food {
            position,
            kind: FoodKind::random(rng),
        },
        None => game.food,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_snakes_are_three_long_and_apart() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let game = SnakeBattleGame::new(DEFAULT_GRID_SIZE, &mut rng);
        for snake in &game.snakes {
            assert_eq!(snake.len(), 3);
            assert!(snake.body.iter().all(|s| game.in_bounds(s.cell)));
        }
        let one = game.snake(Player::One).cells();
        assert!(one.iter().all(|c| !game.snake(Player::Two).occupies(*c)));
        assert!(game.waiting_to_start);
    }

    #[test]
    fn test_body_trails_behind_head() {
        let snake = Snake::new(Position::new(5, 5), Direction::Left);
        assert_eq!(
            snake.cells(),
            vec![Position::new(5, 5), Position::new(6, 5), Position::new(7, 5)]
        );
    }

    #[test]
    fn test_grid_size_is_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(SnakeBattleGame::new(4, &mut rng).grid_size, MIN_GRID_SIZE);
        assert_eq!(SnakeBattleGame::new(200, &mut rng).grid_size, MAX_GRID_SIZE);
    }

    #[test]
    fn test_food_never_on_snake_or_previous_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut game = SnakeBattleGame::new(MIN_GRID_SIZE, &mut rng);
        for _ in 0..500 {
            let previous = game.food.position;
            let food = spawn_food(&game, &mut rng);
            assert_ne!(food.position, previous);
            assert!(game.snakes.iter().all(|s| !s.occupies(food.position)));
            game.food = food;
        }
    }

    #[test]
    fn test_food_stays_put_when_grid_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut game = SnakeBattleGame::new(MIN_GRID_SIZE, &mut rng);
        let mut body = VecDeque::new();
        for y in 0..game.grid_size {
            for x in 0..game.grid_size {
                body.push_back(Segment::at(Position::new(x, y)));
            }
        }
        game.snakes[0].body = body;
        let before = game.food;
        assert_eq!(spawn_food(&game, &mut rng), before);
    }

    #[test]
    fn test_food_odds_roughly_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut counts = [0u32; 3];
        for _ in 0..4000 {
            match FoodKind::random(&mut rng) {
                FoodKind::Apple => counts[0] += 1,
                FoodKind::Banana => counts[1] += 1,
                FoodKind::Pear => counts[2] += 1,
            }
        }
        assert!((1800..2200).contains(&counts[0]));
        assert!((850..1150).contains(&counts[1]));
        assert!((850..1150).contains(&counts[2]));
    }

    #[test]
    fn test_segment_eases_toward_cell() {
        let mut segment = Segment::at(Position::new(0, 0));
        segment.cell = Position::new(1, 0);
        segment.ease();
        assert!((segment.visual_x - 0.35).abs() < 1e-9);
        for _ in 0..60 {
            segment.ease();
        }
        assert!((segment.visual_x - 1.0).abs() < 1e-6);
        assert_eq!(segment.visual_y, 0.0);
    }

    #[test]
    fn test_boost_shortens_interval() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);
        assert_eq!(snake.move_interval_ms(), BASE_MOVE_INTERVAL_MS);
        snake.boost_remaining_ms = 10;
        assert_eq!(snake.move_interval_ms(), BOOSTED_MOVE_INTERVAL_MS);
    }
}
