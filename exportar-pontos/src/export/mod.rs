//! Módulos do pipeline de exportação

pub mod normalize;
pub mod pipeline;
pub mod reproject;
pub mod writer;
pub mod z;

pub use pipeline::{run, ExportError};
pub use reproject::Reprojector;
