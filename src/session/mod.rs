pub mod attempt;
pub mod practice;
pub mod question;
pub mod summary;
