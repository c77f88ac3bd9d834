//! Tipos de dados do crate camada

use std::collections::HashMap;
use std::fmt;

use geo::{Coord, Geometry};
use serde_json::Value;

/// Sistema de referência de coordenadas, identificado pelo código EPSG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crs {
    /// Código EPSG
    pub epsg: u32,
}

impl Crs {
    pub fn new(epsg: u32) -> Self {
        Self { epsg }
    }
}

impl Default for Crs {
    fn default() -> Self {
        // WGS84, o padrão do GeoJSON (RFC 7946)
        Self { epsg: 4326 }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Tipo de geometria de uma camada vetorial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

/// Tipo de dado de um campo de atributo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Real,
}

impl FieldType {
    /// Campos numéricos são os candidatos válidos para a coluna Z
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Real)
    }
}

/// Um campo do esquema de atributos de uma camada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

/// Uma feição de uma camada vetorial
///
/// `geometry: None` representa a geometria vazia. As ordenadas Z, quando
/// presentes, acompanham a ordem dos vértices da geometria (ordem de
/// `CoordsIter`), já que os tipos `geo` são estritamente 2D.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Identificador da feição dentro da camada
    pub id: u64,

    /// Geometria 2D (ausente = geometria vazia)
    pub geometry: Option<Geometry>,

    /// Ordenadas Z por vértice, presente apenas em camadas 3D
    pub z: Option<Vec<f64>>,

    /// Atributos da feição (nome do campo -> valor)
    pub attributes: HashMap<String, Value>,
}

impl Feature {
    /// Coordenada representativa quando a geometria é de ponto
    /// (o primeiro ponto, no caso de MultiPoint)
    pub fn point(&self) -> Option<Coord> {
        match &self.geometry {
            Some(Geometry::Point(p)) => Some(p.0),
            Some(Geometry::MultiPoint(mp)) => mp.0.first().map(|p| p.0),
            _ => None,
        }
    }

    /// Ordenada Z do vértice `index`, se a feição for 3D
    pub fn z_at(&self, index: usize) -> Option<f64> {
        self.z.as_ref().and_then(|zs| zs.get(index)).copied()
    }

    /// Valor de um atributo por nome de campo
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Uma camada vetorial em memória
#[derive(Debug, Clone)]
pub struct VectorLayer {
    /// Identificador da camada no registro
    pub id: String,

    /// Nome de exibição
    pub name: String,

    /// CRS das coordenadas das feições
    pub crs: Crs,

    /// Tipo de geometria (homogêneo para toda a camada)
    pub geometry_kind: GeometryKind,

    /// Esquema de atributos, em ordem
    pub fields: Vec<Field>,

    /// Feições na ordem nativa da camada
    pub features: Vec<Feature>,

    /// Ids das feições atualmente selecionadas, na ordem de seleção
    pub selected: Vec<u64>,
}

impl VectorLayer {
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Busca um campo do esquema por nome
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Campos numéricos, os candidatos válidos para a coluna Z
    pub fn numeric_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.field_type.is_numeric())
    }

    /// Feições selecionadas, na ordem de seleção
    pub fn selected_features(&self) -> Vec<&Feature> {
        self.selected
            .iter()
            .filter_map(|id| self.features.iter().find(|f| f.id == *id))
            .collect()
    }

    /// A camada carrega ordenadas Z em alguma feição?
    pub fn has_z(&self) -> bool {
        self.features.iter().any(|f| f.z.is_some())
    }
}

/// Converte um valor de atributo para texto (Null vira string vazia)
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converte um valor de atributo para número, se for conversível
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use serde_json::json;

    fn feature_with(attrs: &[(&str, Value)]) -> Feature {
        Feature {
            id: 0,
            geometry: Some(Geometry::Point(Point::new(1.0, 2.0))),
            z: None,
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_point_of_point_feature() {
        let feat = feature_with(&[]);
        let coord = feat.point().unwrap();
        assert_eq!(coord.x, 1.0);
        assert_eq!(coord.y, 2.0);
    }

    #[test]
    fn test_point_of_empty_geometry() {
        let mut feat = feature_with(&[]);
        feat.geometry = None;
        assert!(feat.point().is_none());
    }

    #[test]
    fn test_z_at() {
        let mut feat = feature_with(&[]);
        feat.z = Some(vec![10.5, 20.0]);
        assert_eq!(feat.z_at(0), Some(10.5));
        assert_eq!(feat.z_at(1), Some(20.0));
        assert_eq!(feat.z_at(2), None);
    }

    #[test]
    fn test_value_as_text() {
        assert_eq!(value_as_text(&json!("abc")), "abc");
        assert_eq!(value_as_text(&json!(42)), "42");
        assert_eq!(value_as_text(&json!(1.5)), "1.5");
        assert_eq!(value_as_text(&Value::Null), "");
        assert_eq!(value_as_text(&json!(true)), "true");
    }

    #[test]
    fn test_value_as_f64() {
        assert_eq!(value_as_f64(&json!(42)), Some(42.0));
        assert_eq!(value_as_f64(&json!(1.5)), Some(1.5));
        assert_eq!(value_as_f64(&json!(" 3.25 ")), Some(3.25));
        assert_eq!(value_as_f64(&json!("abc")), None);
        assert_eq!(value_as_f64(&Value::Null), None);
    }

    #[test]
    fn test_selected_features_order() {
        let mut layer = VectorLayer {
            id: "l".into(),
            name: "L".into(),
            crs: Crs::default(),
            geometry_kind: GeometryKind::Point,
            fields: vec![],
            features: (0..4).map(|i| {
                let mut f = feature_with(&[]);
                f.id = i;
                f
            }).collect(),
            selected: vec![2, 0],
        };

        let selected = layer.selected_features();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, 2);
        assert_eq!(selected[1].id, 0);

        // Id inexistente na seleção é ignorado
        layer.selected = vec![9, 1];
        assert_eq!(layer.selected_features().len(), 1);
    }

    #[test]
    fn test_numeric_fields() {
        let layer = VectorLayer {
            id: "l".into(),
            name: "L".into(),
            crs: Crs::default(),
            geometry_kind: GeometryKind::Point,
            fields: vec![
                Field { name: "nome".into(), field_type: FieldType::Text },
                Field { name: "cota".into(), field_type: FieldType::Real },
                Field { name: "classe".into(), field_type: FieldType::Integer },
            ],
            features: vec![],
            selected: vec![],
        };

        let numeric: Vec<_> = layer.numeric_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(numeric, vec!["cota", "classe"]);
    }
}
