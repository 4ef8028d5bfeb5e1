pub mod charts;
pub mod config;
pub mod data;
pub mod filters;
pub mod format;
pub mod indicators;

#[cfg(test)]
pub mod testing;
