pub mod scoring;
pub mod status;
