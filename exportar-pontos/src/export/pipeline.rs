//! Pipeline de exportação
//!
//! A máquina de estados Validating → Exporting → Done/Failed como função
//! síncrona: valida a configuração, normaliza a camada, itera as feições
//! (todas ou só a seleção), reprojeta o ponto representativo, resolve
//! nome/descrição/Z, formata e escreve um registro por feição. Erros por
//! feição viram sentinelas; só configuração, transformação principal e I/O
//! do arquivo abortam a execução.

use std::time::Instant;

use thiserror::Error;
use tracing::info;

use camada::{value_as_text, Feature, LayerRegistry, VERTEX_INDEX_FIELD};

use crate::config::{ExportConfig, ZSource};
use crate::export::normalize::normalize;
use crate::export::reproject::Reprojector;
use crate::export::writer::{assemble_record, RecordWriter};
use crate::export::z::{Elevation, NODATA, ZResolver};
use crate::format::format_value;
use crate::report::ExportReport;

/// Erros fatais de uma exportação
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuração inválida: nada foi escrito
    #[error("configuration error: {0}")]
    Config(String),

    /// Falha na transformação principal de coordenadas
    #[error("coordinate transform failed: {0}")]
    Transform(String),

    /// Falha de I/O no arquivo de destino; o conteúdo parcial permanece
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Executa uma exportação.
///
/// `progress` recebe `(registros escritos, total considerado)` após cada
/// registro — é o ponto onde um hospedeiro interativo devolve controle ao
/// laço de eventos. A ordem das linhas segue a ordem de iteração da
/// camada (ou da seleção), menos as feições de geometria vazia.
pub fn run(
    registry: &LayerRegistry,
    config: &ExportConfig,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<ExportReport, ExportError> {
    let started = Instant::now();

    // Validating: nenhum arquivo é aberto neste estado
    if config.output_path.as_os_str().is_empty() {
        return Err(ExportError::Config("destination path is empty".into()));
    }
    let layer = registry
        .vector_layer(&config.layer_id)
        .ok_or_else(|| ExportError::Config(format!("layer not found: {}", config.layer_id)))?;

    // Exporting
    let normalized = normalize(layer);
    let current = normalized.layer();

    let features: Vec<&Feature> = if config.selected_only {
        current.selected_features()
    } else {
        current.features.iter().collect()
    };
    let total = features.len();

    info!(
        layer = config.layer_id.as_str(),
        features = total,
        derived = normalized.is_derived(),
        "Starting export"
    );

    let reprojector = Reprojector::new(current.crs.epsg, config.target_crs.epsg)
        .map_err(|e| ExportError::Transform(e.to_string()))?;

    let raster = match &config.z_source {
        ZSource::Raster { layer_id } => registry.raster_layer(layer_id),
        _ => None,
    };
    // A amostragem do raster parte do ponto no CRS original da camada
    let resolver = ZResolver::new(&config.z_source, raster, current.crs.epsg, config.raster_band);

    let columns = config.columns();
    let separator = config.decimal_separator.as_char();

    let io_err = |source: std::io::Error| ExportError::Io {
        path: config.output_path.display().to_string(),
        source,
    };

    let mut report = ExportReport::new(&config.output_path);
    let mut writer = RecordWriter::create(&config.output_path, &columns).map_err(io_err)?;

    let mut written = 0usize;
    for feature in features {
        // Geometria vazia não vira registro
        let Some(point) = feature.point() else {
            report.record_skipped_empty();
            continue;
        };

        let transformed = reprojector
            .transform_point(point)
            .map_err(|e| ExportError::Transform(e.to_string()))?;

        let name = resolve_name(feature, config, normalized.is_derived());
        let description = resolve_description(feature, config);

        let x = format_value(transformed.x, config.precision, config.digits, separator);
        let y = format_value(transformed.y, config.precision, config.digits, separator);
        let z = match resolver.resolve(feature, point) {
            Elevation::Value(value) => {
                format_value(value, config.precision, config.digits, separator)
            }
            Elevation::NoData => {
                report.record_nodata();
                NODATA.to_string()
            }
        };

        let record = assemble_record(&columns, &name, &description, &x, &y, &z);
        writer.write_record(&record).map_err(io_err)?;

        written += 1;
        report.record_written();
        progress(written, total);
    }

    writer.finish().map_err(io_err)?;

    // Done: a camada derivada, se houver, é descartada no fim deste escopo
    report.set_duration(started.elapsed());
    report.finalize();

    info!(
        written = report.features_written,
        skipped = report.skipped_empty,
        nodata = report.nodata_rows,
        "Export complete"
    );

    Ok(report)
}

/// Nome do registro: campo configurado, índice do vértice para feições
/// derivadas sem campo de nome, ou vazio
fn resolve_name(feature: &Feature, config: &ExportConfig, derived: bool) -> String {
    match config.effective_name_field() {
        Some(field) => feature
            .attribute(field)
            .map(value_as_text)
            .unwrap_or_default(),
        None if derived => feature
            .attribute(VERTEX_INDEX_FIELD)
            .map(value_as_text)
            .unwrap_or_default(),
        None => String::new(),
    }
}

/// Descrição do registro: campo configurado ou vazio quando ausente
fn resolve_description(feature: &Feature, config: &ExportConfig) -> String {
    match config.effective_description_field() {
        Some(field) => feature
            .attribute(field)
            .map(value_as_text)
            .unwrap_or_default(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnOrder, DecimalSeparator};
    use crate::format::PrecisionPolicy;
    use camada::{Crs, GeometryKind, VectorLayer};
    use geo::{Geometry, Point};
    use serde_json::json;
    use std::path::PathBuf;

    fn layer_with_names(names: &[(&str, f64, f64)]) -> VectorLayer {
        VectorLayer {
            id: "pontos".into(),
            name: "Pontos".into(),
            crs: Crs::new(31982),
            geometry_kind: GeometryKind::Point,
            fields: vec![camada::Field {
                name: "nome".into(),
                field_type: camada::FieldType::Text,
            }],
            features: names
                .iter()
                .enumerate()
                .map(|(i, (name, x, y))| Feature {
                    id: i as u64,
                    geometry: Some(Geometry::Point(Point::new(*x, *y))),
                    z: None,
                    attributes: [("nome".to_string(), json!(name))].into_iter().collect(),
                })
                .collect(),
            selected: vec![],
        }
    }

    fn config(output: PathBuf) -> ExportConfig {
        ExportConfig {
            layer_id: "pontos".into(),
            name_field: Some("nome".into()),
            description_field: None,
            z_source: ZSource::Geometry,
            raster_band: 1,
            column_order: ColumnOrder::XY,
            decimal_separator: DecimalSeparator::Point,
            precision: PrecisionPolicy::Natural,
            digits: 0,
            selected_only: false,
            target_crs: Crs::new(31982),
            output_path: output,
        }
    }

    #[test]
    fn test_empty_destination_is_config_error() {
        let mut registry = LayerRegistry::new();
        registry.add_vector(layer_with_names(&[("A", 1.0, 2.0)]));

        let cfg = config(PathBuf::new());
        let result = run(&registry, &cfg, &mut |_, _| {});

        assert!(matches!(result, Err(ExportError::Config(_))));
    }

    #[test]
    fn test_unknown_layer_is_config_error() {
        let registry = LayerRegistry::new();
        let cfg = config(std::env::temp_dir().join("exportar_pontos_nolayer.txt"));
        let result = run(&registry, &cfg, &mut |_, _| {});

        assert!(matches!(result, Err(ExportError::Config(_))));
        // Validating não abre arquivo
        assert!(!cfg.output_path.exists());
    }

    #[test]
    fn test_progress_is_reported_per_record() {
        let mut registry = LayerRegistry::new();
        registry.add_vector(layer_with_names(&[("A", 1.0, 2.0), ("B", 3.0, 4.0)]));

        let path = std::env::temp_dir().join("exportar_pontos_progress_test.txt");
        let cfg = config(path.clone());

        let mut calls = Vec::new();
        run(&registry, &cfg, &mut |done, total| calls.push((done, total))).unwrap();

        assert_eq!(calls, vec![(1, 2), (2, 2)]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_resolve_name_fallbacks() {
        let layer = layer_with_names(&[("A", 1.0, 2.0)]);
        let feature = &layer.features[0];
        let mut cfg = config(PathBuf::from("x.txt"));

        assert_eq!(resolve_name(feature, &cfg, false), "A");

        cfg.name_field = Some("inexistente".into());
        assert_eq!(resolve_name(feature, &cfg, false), "");

        cfg.name_field = None;
        assert_eq!(resolve_name(feature, &cfg, false), "");

        // Feição derivada sem campo de nome usa o índice do vértice
        let mut derived = feature.clone();
        derived
            .attributes
            .insert(VERTEX_INDEX_FIELD.to_string(), json!(7));
        assert_eq!(resolve_name(&derived, &cfg, true), "7");
    }
}
