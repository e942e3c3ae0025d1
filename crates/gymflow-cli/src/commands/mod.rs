pub mod config;
pub mod log;
pub mod member;
pub mod plan;
pub mod run;
pub mod stats;
pub mod task;
