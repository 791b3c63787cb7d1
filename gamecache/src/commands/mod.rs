pub mod cache;
pub mod covers;
pub mod game;
pub mod install;
pub mod settings;
