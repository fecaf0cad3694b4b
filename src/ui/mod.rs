pub mod components;
pub mod layout;
pub mod sound;
pub mod theme;
