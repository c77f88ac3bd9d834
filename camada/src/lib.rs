//! # camada
//!
//! Modelo em memória de camadas vetoriais e raster para a exportação de
//! pontos. Faz o papel do registro de camadas do aplicativo hospedeiro: o
//! pipeline de exportação só enxerga estes tipos.
//!
//! ## Features
//!
//! - Camadas vetoriais carregadas de GeoJSON, com esquema de atributos
//!   inferido e ordenadas Z recuperadas das posições 3D
//! - Camadas raster de banda única carregadas de grade ASCII ESRI (.asc)
//! - Extração de vértices e remoção de geometrias duplicadas, as duas
//!   operações que preparam camadas de linha/polígono para exportação
//! - Tipos `geo` para interoperabilidade com o ecossistema Rust geoespacial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use camada::{load_geojson, LayerRegistry};
//! use std::path::Path;
//!
//! let layer = load_geojson(Path::new("pontos.geojson"), "pontos")?;
//! println!("{} feições ({})", layer.feature_count(), layer.crs);
//!
//! let mut registry = LayerRegistry::new();
//! registry.add_vector(layer);
//! ```

pub mod error;
pub mod geojson;
pub mod raster;
pub mod registry;
pub mod types;
pub mod vertices;

pub use error::CamadaError;
pub use geojson::load_geojson;
pub use raster::{load_ascii_grid, RasterLayer};
pub use registry::LayerRegistry;
pub use types::{value_as_f64, value_as_text, Crs, Feature, Field, FieldType, GeometryKind, VectorLayer};
pub use vertices::{extract_vertices, remove_duplicate_geometries, VERTEX_INDEX_FIELD};
