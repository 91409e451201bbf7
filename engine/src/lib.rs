pub mod config;
pub mod games;
pub mod high_scores;
pub mod logger;
