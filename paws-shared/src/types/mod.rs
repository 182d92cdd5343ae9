pub mod api;
pub mod auth;
pub mod event;
pub mod geo;
pub mod pagination;

pub use api::*;
pub use auth::*;
pub use event::*;
pub use geo::*;
pub use pagination::*;
