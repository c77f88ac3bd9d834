//! Registro de camadas do projeto
//!
//! Equivalente em memória do registro de camadas do aplicativo hospedeiro:
//! o pipeline de exportação apenas resolve camadas por id e enumera as
//! disponíveis, sem assumir nada sobre a origem dos dados.

use crate::raster::RasterLayer;
use crate::types::VectorLayer;

/// Registro de camadas vetoriais e raster, em ordem de inserção
#[derive(Debug, Default)]
pub struct LayerRegistry {
    vectors: Vec<VectorLayer>,
    rasters: Vec<RasterLayer>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona uma camada vetorial ao registro
    pub fn add_vector(&mut self, layer: VectorLayer) {
        self.vectors.push(layer);
    }

    /// Adiciona uma camada raster ao registro
    pub fn add_raster(&mut self, layer: RasterLayer) {
        self.rasters.push(layer);
    }

    /// Resolve uma camada vetorial por id
    pub fn vector_layer(&self, id: &str) -> Option<&VectorLayer> {
        self.vectors.iter().find(|l| l.id == id)
    }

    /// Resolve uma camada vetorial por id, com acesso mutável (seleção)
    pub fn vector_layer_mut(&mut self, id: &str) -> Option<&mut VectorLayer> {
        self.vectors.iter_mut().find(|l| l.id == id)
    }

    /// Resolve uma camada raster por id
    pub fn raster_layer(&self, id: &str) -> Option<&RasterLayer> {
        self.rasters.iter().find(|l| l.id == id)
    }

    /// Enumera as camadas vetoriais na ordem de inserção
    pub fn vector_layers(&self) -> impl Iterator<Item = &VectorLayer> {
        self.vectors.iter()
    }

    /// Enumera as camadas raster na ordem de inserção
    pub fn raster_layers(&self) -> impl Iterator<Item = &RasterLayer> {
        self.rasters.iter()
    }
}
