//! Normalização de geometria: toda camada vira uma sequência de pontos
//!
//! Camadas de ponto passam direto; camadas de linha/polígono viram uma
//! camada derivada de vértices sem geometrias duplicadas. A camada derivada
//! é um valor possuído pelo pipeline — o descarte acontece no fim do
//! escopo da exportação, em qualquer caminho de saída.

use camada::{extract_vertices, remove_duplicate_geometries, GeometryKind, VectorLayer};

/// Resultado da normalização de uma camada
#[derive(Debug)]
pub enum NormalizedLayer<'a> {
    /// A própria camada de pontos, emprestada do registro
    Original(&'a VectorLayer),
    /// Camada derivada de vértices, local ao pipeline
    Derived(VectorLayer),
}

impl NormalizedLayer<'_> {
    /// A camada de pontos a iterar
    pub fn layer(&self) -> &VectorLayer {
        match self {
            NormalizedLayer::Original(layer) => layer,
            NormalizedLayer::Derived(layer) => layer,
        }
    }

    /// Feições derivadas usam o índice do vértice como nome padrão
    pub fn is_derived(&self) -> bool {
        matches!(self, NormalizedLayer::Derived(_))
    }
}

/// Normaliza uma camada para a exportação de pontos
pub fn normalize(layer: &VectorLayer) -> NormalizedLayer<'_> {
    match layer.geometry_kind {
        GeometryKind::Point => NormalizedLayer::Original(layer),
        GeometryKind::Line | GeometryKind::Polygon => {
            NormalizedLayer::Derived(remove_duplicate_geometries(&extract_vertices(layer)))
        }
    }
}
