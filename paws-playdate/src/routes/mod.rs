pub mod health;
pub mod playdates;
pub mod requests;
