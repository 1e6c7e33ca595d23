pub mod button;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod fleet;
pub mod game;
pub mod settings;
pub mod stats;
