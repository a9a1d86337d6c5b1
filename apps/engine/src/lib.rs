// Adaptive mock interview engine.
// Sessions ask questions through pluggable capabilities, score answers,
// adapt difficulty, stop early on sustained low scores and build a report.

pub mod capability;
pub mod config;
pub mod errors;
pub mod evaluation;
pub mod interview;
pub mod llm_client;
pub mod models;
pub mod question_bank;
pub mod report;
pub mod runner;

#[cfg(test)]
mod testing;
