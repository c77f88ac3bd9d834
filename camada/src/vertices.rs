//! Operações de geometria sobre camadas: extração de vértices e remoção
//! de geometrias duplicadas
//!
//! São as duas operações que preparam camadas de linha/polígono para a
//! exportação de pontos: cada vértice vira uma feição de ponto (com os
//! atributos originais mais o campo `vertex_index`), e feições com a mesma
//! geometria são reduzidas à primeira ocorrência.

use std::collections::HashMap;
use std::collections::HashSet;

use geo::{CoordsIter, Geometry, Point};
use serde_json::Value;

use crate::types::{Feature, Field, FieldType, GeometryKind, VectorLayer};

/// Campo sintetizado com o índice do vértice dentro da feição de origem
pub const VERTEX_INDEX_FIELD: &str = "vertex_index";

/// Extrai todos os vértices de uma camada como feições de ponto.
///
/// Os atributos da feição de origem são copiados para cada vértice e o
/// campo `vertex_index` (inteiro, começando em 0 por feição) é acrescentado
/// ao esquema. Ordenadas Z acompanham cada vértice quando a origem é 3D.
pub fn extract_vertices(layer: &VectorLayer) -> VectorLayer {
    let mut fields = layer.fields.clone();
    fields.push(Field {
        name: VERTEX_INDEX_FIELD.to_string(),
        field_type: FieldType::Integer,
    });

    let mut features = Vec::new();
    for feature in &layer.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };

        for (vertex_index, coord) in geometry.coords_iter().enumerate() {
            let mut attributes: HashMap<String, Value> = feature.attributes.clone();
            attributes.insert(
                VERTEX_INDEX_FIELD.to_string(),
                Value::from(vertex_index as u64),
            );

            features.push(Feature {
                id: features.len() as u64,
                geometry: Some(Geometry::Point(Point::new(coord.x, coord.y))),
                z: feature.z_at(vertex_index).map(|z| vec![z]),
                attributes,
            });
        }
    }

    VectorLayer {
        id: format!("{}_vertices", layer.id),
        name: format!("{} vertices", layer.name),
        crs: layer.crs,
        geometry_kind: GeometryKind::Point,
        fields,
        features,
        selected: Vec::new(),
    }
}

/// Remove feições cuja geometria já apareceu antes na camada.
///
/// A igualdade é por coordenadas exatas (padrão de bits do f64), mantendo a
/// primeira ocorrência na ordem nativa. Feições com geometria vazia são
/// sempre mantidas.
pub fn remove_duplicate_geometries(layer: &VectorLayer) -> VectorLayer {
    let mut seen: HashSet<(u8, Vec<(u64, u64)>)> = HashSet::new();
    let mut features = Vec::new();

    for feature in &layer.features {
        match &feature.geometry {
            None => features.push(feature.clone()),
            Some(geometry) => {
                if seen.insert(geometry_key(geometry)) {
                    features.push(feature.clone());
                }
            }
        }
    }

    VectorLayer {
        id: layer.id.clone(),
        name: layer.name.clone(),
        crs: layer.crs,
        geometry_kind: layer.geometry_kind,
        fields: layer.fields.clone(),
        features,
        selected: layer.selected.clone(),
    }
}

/// Chave de comparação de geometria: discriminante + coordenadas em bits
fn geometry_key(geometry: &Geometry) -> (u8, Vec<(u64, u64)>) {
    let tag = match geometry {
        Geometry::Point(_) => 0,
        Geometry::Line(_) => 1,
        Geometry::LineString(_) => 2,
        Geometry::Polygon(_) => 3,
        Geometry::MultiPoint(_) => 4,
        Geometry::MultiLineString(_) => 5,
        Geometry::MultiPolygon(_) => 6,
        _ => 7,
    };

    let coords = geometry
        .coords_iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();

    (tag, coords)
}
