pub mod export;
pub mod prune;
