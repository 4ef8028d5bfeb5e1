pub mod common;
pub mod customers;
pub mod delivery;
pub mod overview;
pub mod products;
pub mod profitability;
pub mod sales;
pub mod service;
pub mod time_analysis;
