//! # exportar-pontos
//!
//! Exportação de coordenadas de pontos (com nome, descrição e cota
//! opcionais) de camadas vetoriais para arquivo texto separado por
//! tabulação, com reprojeção, cota vinda da geometria, de um modelo
//! digital de elevação ou de um campo, e formatação numérica configurável
//! (separador decimal, precisão arredondada ou truncada).
//!
//! ## Features
//!
//! - Camadas de linha/polígono viram pontos por extração de vértices
//! - Cota por geometria 3D, amostragem de MDE ou campo numérico
//! - Políticas de precisão natural, arredondada e truncada
//! - Reprojeção opcional via PROJ (feature `reproject`)
//! - CLI simples
//!
//! ## Usage CLI
//!
//! ```bash
//! # Exportar uma camada de pontos
//! exportar-pontos --layer pontos.geojson --output pontos.txt --name-field nome
//!
//! # Cota amostrada de um MDE, coordenadas em outro CRS
//! exportar-pontos --layer pontos.geojson --output pontos.txt \
//!     --z-source raster --dem mde.asc --target-epsg 4326
//!
//! # Listar os campos de uma camada
//! exportar-pontos fields --layer pontos.geojson
//! ```

pub mod config;
pub mod export;
pub mod format;
pub mod report;

pub use config::{ColumnOrder, DecimalSeparator, ExportConfig, ZSource};
pub use export::{run, ExportError};
pub use format::{format_value, PrecisionPolicy};
pub use report::{ExportReport, ExportStatus};
