pub mod attempt;
pub mod job;
pub mod question;
