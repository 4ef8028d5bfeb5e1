pub mod d500_sales_dashboard;
