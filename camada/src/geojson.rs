//! Carregamento de camadas vetoriais a partir de GeoJSON
//!
//! Um FeatureCollection vira uma `VectorLayer`: geometrias convertidas para
//! os tipos `geo`, ordenadas Z recuperadas das posições de três elementos
//! (os tipos `geo` são 2D), esquema de atributos inferido dos properties e
//! CRS lido do membro legado `crs` (`urn:ogc:def:crs:EPSG::nnnn`), com
//! WGS84 como padrão do formato.

use std::collections::HashMap;
use std::path::Path;

use geojson::GeoJson;
use serde_json::Value;
use tracing::debug;

use crate::error::CamadaError;
use crate::types::{Crs, Feature, Field, FieldType, GeometryKind, VectorLayer};

/// Carrega um arquivo GeoJSON como camada vetorial
pub fn load_geojson(path: &Path, id: impl Into<String>) -> Result<VectorLayer, CamadaError> {
    let content = std::fs::read_to_string(path)?;
    let file = path.display().to_string();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("camada")
        .to_string();

    parse_geojson(&content, &file, id.into(), name)
}

/// Parse do conteúdo de um FeatureCollection GeoJSON
pub fn parse_geojson(
    content: &str,
    file: &str,
    id: String,
    name: String,
) -> Result<VectorLayer, CamadaError> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e: geojson::Error| CamadaError::parse_error(file, e.to_string()))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(CamadaError::parse_error(
                file,
                "expected a FeatureCollection",
            ))
        }
    };

    let crs = parse_crs(collection.foreign_members.as_ref())?;

    let mut geometry_kind: Option<GeometryKind> = None;
    let mut field_order: Vec<String> = Vec::new();
    let mut field_types: HashMap<String, Option<FieldType>> = HashMap::new();
    let mut features = Vec::new();

    for (index, gfeat) in collection.features.into_iter().enumerate() {
        let (geometry, z) = match &gfeat.geometry {
            None => (None, None),
            Some(g) => {
                let kind = kind_of(&g.value).ok_or_else(|| {
                    CamadaError::unsupported_geometry(
                        file,
                        format!("feature {index}: geometry collections are not supported"),
                    )
                })?;

                match geometry_kind {
                    None => geometry_kind = Some(kind),
                    Some(expected) if expected != kind => {
                        return Err(CamadaError::unsupported_geometry(
                            file,
                            format!("feature {index}: mixed geometry kinds in one layer"),
                        ))
                    }
                    Some(_) => {}
                }

                let geom = geo::Geometry::try_from(&g.value)
                    .map_err(|e: geojson::Error| CamadaError::parse_error(file, e.to_string()))?;
                (Some(geom), collect_z(&g.value))
            }
        };

        let mut attributes: HashMap<String, Value> = HashMap::new();
        if let Some(properties) = gfeat.properties {
            for (key, value) in properties {
                let inferred = infer_field_type(&value);
                match field_types.get_mut(&key) {
                    None => {
                        field_order.push(key.clone());
                        field_types.insert(key.clone(), inferred);
                    }
                    Some(current) => *current = widen(*current, inferred),
                }
                attributes.insert(key, value);
            }
        }

        features.push(Feature {
            id: index as u64,
            geometry,
            z,
            attributes,
        });
    }

    let geometry_kind = geometry_kind.ok_or_else(|| {
        CamadaError::parse_error(file, "unable to infer geometry kind (no geometries)")
    })?;

    debug!(
        file = file,
        features = features.len(),
        crs = %crs,
        "GeoJSON layer loaded"
    );

    let fields = field_order
        .into_iter()
        .map(|name| {
            let field_type = field_types
                .get(&name)
                .copied()
                .flatten()
                .unwrap_or(FieldType::Text);
            Field { name, field_type }
        })
        .collect();

    Ok(VectorLayer {
        id,
        name,
        crs,
        geometry_kind,
        fields,
        features,
        selected: Vec::new(),
    })
}

/// Lê o membro legado `crs` do FeatureCollection, se presente
fn parse_crs(foreign_members: Option<&geojson::JsonObject>) -> Result<Crs, CamadaError> {
    let Some(crs) = foreign_members.and_then(|m| m.get("crs")) else {
        return Ok(Crs::default());
    };

    let name = crs
        .pointer("/properties/name")
        .and_then(Value::as_str)
        .ok_or_else(|| CamadaError::UnknownCrs(crs.to_string()))?;

    // "urn:ogc:def:crs:OGC:1.3:CRS84" é o WGS84 do próprio formato
    if name.ends_with("CRS84") {
        return Ok(Crs::default());
    }

    // "urn:ogc:def:crs:EPSG::31982" ou "EPSG:31982"
    let epsg = name
        .rsplit(':')
        .next()
        .and_then(|code| code.parse::<u32>().ok())
        .filter(|_| name.contains("EPSG"));

    match epsg {
        Some(epsg) => Ok(Crs::new(epsg)),
        None => Err(CamadaError::UnknownCrs(name.to_string())),
    }
}

/// Tipo de camada correspondente a uma geometria GeoJSON
fn kind_of(value: &geojson::Value) -> Option<GeometryKind> {
    use geojson::Value::*;
    match value {
        Point(_) | MultiPoint(_) => Some(GeometryKind::Point),
        LineString(_) | MultiLineString(_) => Some(GeometryKind::Line),
        Polygon(_) | MultiPolygon(_) => Some(GeometryKind::Polygon),
        GeometryCollection(_) => None,
    }
}

/// Recupera as ordenadas Z das posições, na ordem dos vértices
fn collect_z(value: &geojson::Value) -> Option<Vec<f64>> {
    let mut positions: Vec<&Vec<f64>> = Vec::new();
    collect_positions(value, &mut positions);

    if positions.iter().any(|p| p.len() > 2) {
        Some(
            positions
                .iter()
                .map(|p| p.get(2).copied().unwrap_or(0.0))
                .collect(),
        )
    } else {
        None
    }
}

fn collect_positions<'a>(value: &'a geojson::Value, out: &mut Vec<&'a Vec<f64>>) {
    use geojson::Value::*;
    match value {
        Point(p) => out.push(p),
        MultiPoint(ps) | LineString(ps) => out.extend(ps.iter()),
        MultiLineString(lines) | Polygon(lines) => {
            for line in lines {
                out.extend(line.iter());
            }
        }
        MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    out.extend(ring.iter());
                }
            }
        }
        GeometryCollection(_) => {}
    }
}

fn infer_field_type(value: &Value) -> Option<FieldType> {
    match value {
        Value::Null => None,
        Value::Number(n) => {
            if n.is_f64() {
                Some(FieldType::Real)
            } else {
                Some(FieldType::Integer)
            }
        }
        _ => Some(FieldType::Text),
    }
}

/// Alarga o tipo de um campo quando valores de tipos diferentes aparecem
fn widen(current: Option<FieldType>, seen: Option<FieldType>) -> Option<FieldType> {
    match (current, seen) {
        (None, t) | (t, None) => t,
        (Some(a), Some(b)) if a == b => Some(a),
        (Some(a), Some(b)) if a.is_numeric() && b.is_numeric() => Some(FieldType::Real),
        _ => Some(FieldType::Text),
    }
}
