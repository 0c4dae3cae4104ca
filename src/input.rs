//! Key mapping from crossterm events to each game's input actions.
//!
//! Player one plays on W/A/S/D, player two on the arrow keys. Space starts
//! and pauses, Esc asks to forfeit.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use harmony::games::boxing::{BoxingInput, Move};
use harmony::games::runner::{Lane, RunnerInput};
use harmony::games::snake_battle::{Direction, SnakeBattleInput};
use harmony::games::Player;

/// A direction key, independent of which player pressed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pad {
    Up,
    Down,
    Left,
    Right,
}

pub fn pad_key(code: KeyCode) -> Option<(Player, Pad)> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some((Player::One, Pad::Up)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some((Player::One, Pad::Down)),
        KeyCode::Char('a') | KeyCode::Char('A') => Some((Player::One, Pad::Left)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some((Player::One, Pad::Right)),
        KeyCode::Up => Some((Player::Two, Pad::Up)),
        KeyCode::Down => Some((Player::Two, Pad::Down)),
        KeyCode::Left => Some((Player::Two, Pad::Left)),
        KeyCode::Right => Some((Player::Two, Pad::Right)),
        _ => None,
    }
}

/// Boxing ignores releases and auto-repeat: one press is one strike.
pub fn map_boxing_key(key: KeyEvent) -> Option<BoxingInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    Some(match key.code {
        KeyCode::Char(' ') => BoxingInput::Select,
        KeyCode::Esc => BoxingInput::Forfeit,
        code => match pad_key(code) {
            Some((player, pad)) => {
                let mv = match pad {
                    Pad::Up => Move::HighKick,
                    Pad::Down => Move::LowKick,
                    Pad::Left => Move::LeftPunch,
                    Pad::Right => Move::RightPunch,
                };
                BoxingInput::Strike(player, mv)
            }
            None => BoxingInput::Other,
        },
    })
}

/// Player one runs the top lane, player two the bottom. Up jumps, Down
/// crouches; releasing Down stands back up.
pub fn map_runner_key(key: KeyEvent) -> Option<RunnerInput> {
    let pad = pad_key(key.code);
    match key.kind {
        KeyEventKind::Release => {
            return match pad {
                Some((player, Pad::Down)) => Some(RunnerInput::ReleaseCrouch(Lane::of(player))),
                _ => None,
            };
        }
        // Auto-repeat only reaches the movement keys.
        KeyEventKind::Repeat if pad.is_none() => return None,
        _ => {}
    }
    Some(match key.code {
        KeyCode::Char(' ') => RunnerInput::Select,
        KeyCode::Esc => RunnerInput::Forfeit,
        _ => match pad {
            Some((player, Pad::Up)) => RunnerInput::Jump(Lane::of(player)),
            Some((player, Pad::Down)) => RunnerInput::Crouch(Lane::of(player)),
            Some(_) => return None,
            None => RunnerInput::Other,
        },
    })
}

pub fn map_snake_battle_key(key: KeyEvent) -> Option<SnakeBattleInput> {
    let pad = pad_key(key.code);
    match key.kind {
        KeyEventKind::Release => return None,
        KeyEventKind::Repeat if pad.is_none() => return None,
        _ => {}
    }
    Some(match key.code {
        KeyCode::Char(' ') => SnakeBattleInput::Select,
        KeyCode::Esc => SnakeBattleInput::Forfeit,
        _ => match pad {
            Some((player, pad)) => {
                let direction = match pad {
                    Pad::Up => Direction::Up,
                    Pad::Down => Direction::Down,
                    Pad::Left => Direction::Left,
                    Pad::Right => Direction::Right,
                };
                SnakeBattleInput::Steer(player, direction)
            }
            None => SnakeBattleInput::Other,
        },
    })
}
