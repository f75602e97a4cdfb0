pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod master;
pub mod metrics;
