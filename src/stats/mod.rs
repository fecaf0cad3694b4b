pub mod aggregate;
pub mod heatmap;
pub mod mastery;
pub mod streak;
pub mod velocity;
pub mod weakness;
