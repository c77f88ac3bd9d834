//! Resolução do valor Z de cada feição
//!
//! A política de degradação segue a origem configurada: falha de transform
//! ou de amostragem no modo raster vira o sentinela NoData; campo ausente
//! ou não numérico no modo campo vira 0. Nenhuma feição aborta a
//! exportação por causa do Z.

use camada::{value_as_f64, Feature, RasterLayer};
use geo::Coord;
use tracing::{debug, warn};

use crate::config::ZSource;
use crate::export::reproject::Reprojector;

/// Sentinela escrito literalmente quando nenhuma cota válida foi obtida
pub const NODATA: &str = "NoData";

/// Valor de elevação resolvido para uma feição
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Elevation {
    Value(f64),
    NoData,
}

/// Resolve o Z das feições de uma execução, sem efeitos colaterais
pub struct ZResolver<'a> {
    source: &'a ZSource,
    raster: Option<&'a RasterLayer>,
    to_raster: Option<Reprojector>,
    band: usize,
}

impl<'a> ZResolver<'a> {
    /// Monta o resolvedor para uma execução.
    ///
    /// A falha na construção do reprojetor camada→raster já é rebaixada
    /// aqui: sem reprojetor, o modo raster degrada para NoData em todas as
    /// linhas em vez de abortar.
    pub fn new(
        source: &'a ZSource,
        raster: Option<&'a RasterLayer>,
        source_epsg: u32,
        band: usize,
    ) -> Self {
        let to_raster = raster.and_then(|r| match Reprojector::new(source_epsg, r.crs.epsg) {
            Ok(reprojector) => Some(reprojector),
            Err(e) => {
                warn!(
                    "Failed to build layer to raster reprojector ({} -> {}): {}",
                    source_epsg, r.crs.epsg, e
                );
                None
            }
        });

        Self {
            source,
            raster,
            to_raster,
            band,
        }
    }

    /// Resolve o Z de uma feição.
    ///
    /// `original_point` é o ponto representativo no CRS de origem da
    /// camada, antes da transformação principal — é ele que amostra o
    /// raster.
    pub fn resolve(&self, feature: &Feature, original_point: Coord) -> Elevation {
        match self.source {
            ZSource::Geometry => Elevation::Value(feature.z_at(0).unwrap_or(0.0)),
            ZSource::Raster { .. } => self.sample_raster(original_point),
            ZSource::Field { name } => Elevation::Value(self.field_value(feature, name)),
            ZSource::Unset => Elevation::NoData,
        }
    }

    fn sample_raster(&self, point: Coord) -> Elevation {
        let (Some(raster), Some(to_raster)) = (self.raster, self.to_raster.as_ref()) else {
            return Elevation::NoData;
        };

        let transformed = match to_raster.transform_point(point) {
            Ok(p) => p,
            Err(e) => {
                warn!("Raster sampling transform failed: {}", e);
                return Elevation::NoData;
            }
        };

        match raster.sample(transformed.x, transformed.y, self.band) {
            Some(value) => Elevation::Value(value),
            None => Elevation::NoData,
        }
    }

    fn field_value(&self, feature: &Feature, name: &str) -> f64 {
        match feature.attribute(name).and_then(value_as_f64) {
            Some(value) => value,
            None => {
                debug!(field = name, "Z field missing or not numeric, using 0");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camada::raster::parse_ascii_grid;
    use camada::{Crs, Feature};
    use geo::{Geometry, Point};
    use serde_json::json;
    use std::collections::HashMap;

    fn point_feature(x: f64, y: f64, z: Option<f64>) -> Feature {
        Feature {
            id: 0,
            geometry: Some(Geometry::Point(Point::new(x, y))),
            z: z.map(|v| vec![v]),
            attributes: HashMap::new(),
        }
    }

    fn grid() -> RasterLayer {
        let content = "\
ncols 2
nrows 2
xllcorner 0.0
yllcorner 0.0
cellsize 10.0
NODATA_value -9999
1 2
3 -9999
";
        parse_ascii_grid(content, "mde.asc", "mde".into(), "mde".into(), Crs::new(31982)).unwrap()
    }

    #[test]
    fn test_geometry_mode_with_z() {
        let source = ZSource::Geometry;
        let resolver = ZResolver::new(&source, None, 31982, 1);
        let feat = point_feature(1.0, 2.0, Some(847.3));

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(847.3)
        );
    }

    #[test]
    fn test_geometry_mode_without_z_is_zero() {
        let source = ZSource::Geometry;
        let resolver = ZResolver::new(&source, None, 31982, 1);
        let feat = point_feature(1.0, 2.0, None);

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(0.0)
        );
    }

    #[test]
    fn test_raster_mode_same_crs() {
        let raster = grid();
        let source = ZSource::Raster {
            layer_id: "mde".into(),
        };
        let resolver = ZResolver::new(&source, Some(&raster), 31982, 1);
        let feat = point_feature(5.0, 5.0, None);

        // Célula inferior esquerda (linha sul): valor 3
        assert_eq!(
            resolver.resolve(&feat, Coord { x: 5.0, y: 5.0 }),
            Elevation::Value(3.0)
        );
    }

    #[test]
    fn test_raster_mode_out_of_extent_is_nodata() {
        let raster = grid();
        let source = ZSource::Raster {
            layer_id: "mde".into(),
        };
        let resolver = ZResolver::new(&source, Some(&raster), 31982, 1);
        let feat = point_feature(-5.0, 5.0, None);

        assert_eq!(
            resolver.resolve(&feat, Coord { x: -5.0, y: 5.0 }),
            Elevation::NoData
        );
    }

    #[test]
    fn test_raster_mode_nodata_cell() {
        let raster = grid();
        let source = ZSource::Raster {
            layer_id: "mde".into(),
        };
        let resolver = ZResolver::new(&source, Some(&raster), 31982, 1);
        let feat = point_feature(15.0, 5.0, None);

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 15.0, y: 5.0 }),
            Elevation::NoData
        );
    }

    #[test]
    fn test_raster_mode_without_raster_is_nodata() {
        let source = ZSource::Raster {
            layer_id: "inexistente".into(),
        };
        let resolver = ZResolver::new(&source, None, 31982, 1);
        let feat = point_feature(5.0, 5.0, None);

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 5.0, y: 5.0 }),
            Elevation::NoData
        );
    }

    #[test]
    fn test_field_mode_numeric() {
        let source = ZSource::Field {
            name: "cota".into(),
        };
        let resolver = ZResolver::new(&source, None, 31982, 1);

        let mut feat = point_feature(1.0, 2.0, None);
        feat.attributes.insert("cota".into(), json!(912.4));

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(912.4)
        );
    }

    #[test]
    fn test_field_mode_numeric_string() {
        let source = ZSource::Field {
            name: "cota".into(),
        };
        let resolver = ZResolver::new(&source, None, 31982, 1);

        let mut feat = point_feature(1.0, 2.0, None);
        feat.attributes.insert("cota".into(), json!("912.4"));

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(912.4)
        );
    }

    #[test]
    fn test_field_mode_missing_or_invalid_is_zero() {
        let source = ZSource::Field {
            name: "cota".into(),
        };
        let resolver = ZResolver::new(&source, None, 31982, 1);

        let feat = point_feature(1.0, 2.0, None);
        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(0.0)
        );

        let mut feat = point_feature(1.0, 2.0, None);
        feat.attributes.insert("cota".into(), json!("abc"));
        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(0.0)
        );

        let mut feat = point_feature(1.0, 2.0, None);
        feat.attributes.insert("cota".into(), serde_json::Value::Null);
        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::Value(0.0)
        );
    }

    #[test]
    fn test_unset_mode_is_nodata() {
        let source = ZSource::Unset;
        let resolver = ZResolver::new(&source, None, 31982, 1);
        let feat = point_feature(1.0, 2.0, Some(10.0));

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 1.0, y: 2.0 }),
            Elevation::NoData
        );
    }

    #[test]
    fn test_raster_mode_wrong_band_is_nodata() {
        let raster = grid();
        let source = ZSource::Raster {
            layer_id: "mde".into(),
        };
        let resolver = ZResolver::new(&source, Some(&raster), 31982, 2);
        let feat = point_feature(5.0, 5.0, None);

        assert_eq!(
            resolver.resolve(&feat, Coord { x: 5.0, y: 5.0 }),
            Elevation::NoData
        );
    }
}
