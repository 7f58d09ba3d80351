pub mod mask;
pub mod scoring;
pub mod srs;
