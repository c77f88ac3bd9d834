//! Tipos de erro do crate camada

use thiserror::Error;

/// Erros ao carregar ou manipular camadas
#[derive(Debug, Error)]
pub enum CamadaError {
    /// Erro de I/O na leitura do arquivo de origem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erro de parsing de um arquivo de camada
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// Geometria sem suporte no modelo de camadas
    #[error("Unsupported geometry in {file}: {reason}")]
    UnsupportedGeometry { file: String, reason: String },

    /// CRS não reconhecido
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),
}

impl CamadaError {
    /// Cria um erro de parsing com contexto
    pub fn parse_error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Cria um erro de geometria sem suporte
    pub fn unsupported_geometry(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedGeometry {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
