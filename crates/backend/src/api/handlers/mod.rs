// Dashboard handlers (d500)
pub mod d500_sales_dashboard;
pub mod dataset;
pub mod indicators;
