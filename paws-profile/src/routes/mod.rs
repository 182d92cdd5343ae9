pub mod dogs;
pub mod health;
pub mod internal;
pub mod profile;
