pub mod health;
pub mod locations;
