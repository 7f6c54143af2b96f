pub mod generate;
pub mod run;
pub mod show;
