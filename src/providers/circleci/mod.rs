mod client;
pub mod filters;
mod reader;
pub mod types;

pub use client::CircleClient;
pub use reader::CircleLogReader;
