pub mod candidates;
pub mod health;
pub mod internal;
pub mod matches;
pub mod swipes;
