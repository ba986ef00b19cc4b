pub mod game;
pub mod state;
pub mod summary;
pub mod timers;
