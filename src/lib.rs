pub mod cli;
pub mod commands;
pub mod config;
pub mod detect;
pub mod display;
pub mod edit;
pub mod error;
pub mod extract;
pub mod index;
pub mod pipeline;
pub mod range;
pub mod search;
pub mod session;
