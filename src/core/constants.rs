// Frame timing shared by every game loop
pub const FRAME_MS: u64 = 16; // ~60 FPS physics frame
pub const MAX_FRAME_DT_MS: u64 = 100; // clamp after a stall so catch-up stays bounded
pub const MAX_SNAKE_DT_MS: u64 = 500;
pub const INPUT_POLL_MS: u64 = 16;

// Screen flow
pub const GAME_OVER_GRACE_MS: u64 = 1000; // ignore keys right after a game ends
