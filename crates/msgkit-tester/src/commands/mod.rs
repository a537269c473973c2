pub mod fatal;
pub mod genout;
pub mod run;
pub mod selftest;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
