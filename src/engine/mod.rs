pub mod achievements;
pub mod coach;
pub mod levels;
