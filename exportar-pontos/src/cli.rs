//! Definição e implementação dos comandos CLI
//!
//! CLI simplificada:
//! - comando padrão: exporta uma camada GeoJSON para TXT
//! - `fields`: lista o esquema de uma camada (candidatos a nome/descrição
//!   e os campos numéricos válidos para a coluna Z)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use tracing::info;

use camada::{load_ascii_grid, load_geojson, Crs, LayerRegistry};

use crate::config::{ColumnOrder, DecimalSeparator, ExportConfig, ZSource};
use crate::export;
use crate::format::PrecisionPolicy;
use crate::report::ExportReport;

#[derive(Subcommand)]
pub enum Commands {
    /// List a layer's fields (name/description candidates and Z candidates)
    Fields {
        /// Path to the GeoJSON layer
        #[arg(short, long)]
        layer: PathBuf,
    },
}

/// Argumentos da exportação (comando padrão)
#[derive(Args)]
pub struct ExportArgs {
    /// Path to the GeoJSON layer to export
    #[arg(short, long)]
    pub layer: PathBuf,

    /// Destination text file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Field written to the Nome column
    #[arg(long)]
    pub name_field: Option<String>,

    /// Field written to the Descricao column (column omitted when absent)
    #[arg(long)]
    pub desc_field: Option<String>,

    /// Elevation source for the Z column
    #[arg(long, value_enum, default_value = "geometry")]
    pub z_source: ZSourceArg,

    /// Numeric field used when --z-source=field
    #[arg(long)]
    pub z_field: Option<String>,

    /// ESRI ASCII grid DEM sampled when --z-source=raster
    #[arg(long)]
    pub dem: Option<PathBuf>,

    /// EPSG code of the DEM grid (default: the layer CRS)
    #[arg(long)]
    pub dem_epsg: Option<u32>,

    /// Raster band sampled for Z
    #[arg(long, default_value_t = 1)]
    pub band: usize,

    /// Target EPSG for the exported coordinates (default: the layer CRS)
    #[arg(long)]
    pub target_epsg: Option<u32>,

    /// Coordinate column order
    #[arg(long, value_enum, default_value = "xy")]
    pub order: OrderArg,

    /// Decimal separator written to the file
    #[arg(long, value_enum, default_value = "point")]
    pub decimal_separator: SeparatorArg,

    /// Precision policy for numeric values
    #[arg(long, value_enum, default_value = "natural")]
    pub precision: PrecisionArg,

    /// Fractional digits for the rounded/truncated policies
    #[arg(long, default_value_t = 2)]
    pub digits: usize,

    /// Export only these feature ids (comma separated, 0-based, in order)
    #[arg(long, value_delimiter = ',')]
    pub selected: Option<Vec<u64>>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ZSourceArg {
    /// Z ordinate stored in the geometry (0 for 2D features)
    Geometry,
    /// Sample a DEM raster at each point
    Raster,
    /// Read a numeric field of the layer
    Field,
    /// No source: every row gets the NoData sentinel
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Xy,
    Yx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeparatorArg {
    Point,
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrecisionArg {
    Natural,
    Rounded,
    Truncated,
}

/// Executa o comando de exportação
pub fn cmd_export(args: ExportArgs) -> Result<()> {
    let layer_id = layer_id_from_path(&args.layer);

    let mut layer = load_geojson(&args.layer, layer_id.clone())
        .with_context(|| format!("Failed to load layer {}", args.layer.display()))?;
    let source_epsg = layer.crs.epsg;

    info!(
        layer = layer_id.as_str(),
        features = layer.feature_count(),
        crs = %layer.crs,
        "Layer loaded"
    );

    // Invariante do formulário de origem: só campo numérico vira coluna Z
    if args.z_source == ZSourceArg::Field {
        let name = args
            .z_field
            .as_deref()
            .context("--z-field is required with --z-source=field")?;
        match layer.field(name) {
            None => bail!("Z field '{}' does not exist on layer '{}'", name, layer_id),
            Some(field) if !field.field_type.is_numeric() => {
                bail!("Z field '{}' is not numeric", name)
            }
            Some(_) => {}
        }
    }

    let selected = args.selected.clone().unwrap_or_default();
    let selected_only = !selected.is_empty();
    layer.selected = selected;

    let mut registry = LayerRegistry::new();
    registry.add_vector(layer);

    let z_source = match args.z_source {
        ZSourceArg::Geometry => ZSource::Geometry,
        ZSourceArg::None => ZSource::Unset,
        ZSourceArg::Field => ZSource::Field {
            // Validado acima
            name: args.z_field.clone().unwrap_or_default(),
        },
        ZSourceArg::Raster => {
            let dem = args
                .dem
                .as_ref()
                .context("--dem is required with --z-source=raster")?;
            let dem_id = layer_id_from_path(dem);
            let dem_crs = Crs::new(args.dem_epsg.unwrap_or(source_epsg));
            let raster = load_ascii_grid(dem, dem_id.clone(), dem_crs)
                .with_context(|| format!("Failed to load DEM {}", dem.display()))?;
            registry.add_raster(raster);
            ZSource::Raster { layer_id: dem_id }
        }
    };

    let target_epsg = args.target_epsg.unwrap_or(source_epsg);
    if target_epsg != source_epsg && !export::reproject::is_available() {
        bail!(
            "Reprojection from EPSG:{} to EPSG:{} requires building with --features reproject",
            source_epsg,
            target_epsg
        );
    }

    let config = ExportConfig {
        layer_id,
        name_field: args.name_field.clone(),
        description_field: args.desc_field.clone(),
        z_source,
        raster_band: args.band,
        column_order: column_order(args.order),
        decimal_separator: decimal_separator(args.decimal_separator),
        precision: precision(args.precision),
        digits: args.digits,
        selected_only,
        target_crs: Crs::new(target_epsg),
        output_path: args.output.clone(),
    };

    let mut progress = |done: usize, total: usize| {
        if done % 100 == 0 {
            info!(done, total, "Export progress");
        }
    };

    match export::run(&registry, &config, &mut progress) {
        Ok(report) => {
            report.display();
            if let Some(path) = &args.report {
                report.save_to_file(path)?;
            }
            info!("{}", report.summary());
            Ok(())
        }
        Err(e) => {
            if let Some(path) = &args.report {
                let mut report = ExportReport::new(&config.output_path);
                report.mark_failed();
                let _ = report.save_to_file(path);
            }
            Err(anyhow::Error::new(e).context("Export failed"))
        }
    }
}

/// Executa o comando fields
pub fn cmd_fields(layer_path: &Path) -> Result<()> {
    let layer_id = layer_id_from_path(layer_path);
    let layer = load_geojson(layer_path, layer_id)
        .with_context(|| format!("Failed to load layer {}", layer_path.display()))?;

    println!(
        "Layer: {} ({} features, {})",
        layer.name,
        layer.feature_count(),
        layer.crs
    );
    println!("Geometry: {:?}", layer.geometry_kind);
    println!("3D geometry: {}", if layer.has_z() { "yes" } else { "no" });

    println!("\nFields:");
    for field in &layer.fields {
        let z_marker = if field.field_type.is_numeric() {
            "  (Z candidate)"
        } else {
            ""
        };
        println!("- {} [{:?}]{}", field.name, field.field_type, z_marker);
    }

    Ok(())
}

fn column_order(arg: OrderArg) -> ColumnOrder {
    match arg {
        OrderArg::Xy => ColumnOrder::XY,
        OrderArg::Yx => ColumnOrder::YX,
    }
}

fn decimal_separator(arg: SeparatorArg) -> DecimalSeparator {
    match arg {
        SeparatorArg::Point => DecimalSeparator::Point,
        SeparatorArg::Comma => DecimalSeparator::Comma,
    }
}

fn precision(arg: PrecisionArg) -> PrecisionPolicy {
    match arg {
        PrecisionArg::Natural => PrecisionPolicy::Natural,
        PrecisionArg::Rounded => PrecisionPolicy::Rounded,
        PrecisionArg::Truncated => PrecisionPolicy::Truncated,
    }
}

/// Id de camada derivado do nome do arquivo
fn layer_id_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("camada")
        .to_string()
}
