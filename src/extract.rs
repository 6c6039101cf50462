pub mod heuristic;
pub mod language;
pub mod scanner;
pub mod symbols;
