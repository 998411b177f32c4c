pub mod circleci;

pub use circleci::CircleLogReader;
