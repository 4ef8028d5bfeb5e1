pub mod delivery_status;
