//! Camada raster de banda única (modelo digital de elevação)
//!
//! O formato de origem é a grade ASCII da ESRI (.asc): cabeçalho com
//! `ncols`/`nrows`/`xllcorner`/`yllcorner`/`cellsize`/`nodata_value` e os
//! valores em ordem de linha, do norte para o sul. O formato não carrega
//! CRS, então o código EPSG é informado no carregamento.

use std::path::Path;

use tracing::debug;

use crate::error::CamadaError;
use crate::types::Crs;

/// Uma camada raster em memória, banda única
#[derive(Debug, Clone)]
pub struct RasterLayer {
    /// Identificador da camada no registro
    pub id: String,

    /// Nome de exibição
    pub name: String,

    /// CRS das coordenadas da grade
    pub crs: Crs,

    ncols: usize,
    nrows: usize,

    /// Canto inferior esquerdo da grade
    xll: f64,
    yll: f64,

    cellsize: f64,

    /// Valor que marca célula sem dado
    nodata: Option<f64>,

    /// Valores em ordem de linha, primeira linha = norte
    values: Vec<f64>,
}

impl RasterLayer {
    /// Amostra a grade na coordenada dada (no CRS da própria grade).
    ///
    /// Retorna `None` para ponto fora da extensão, célula nodata ou banda
    /// diferente de 1 — o chamador decide a política de degradação.
    pub fn sample(&self, x: f64, y: f64, band: usize) -> Option<f64> {
        if band != 1 {
            return None;
        }

        let col = ((x - self.xll) / self.cellsize).floor();
        let row = ((y - self.yll) / self.cellsize).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as usize, row as usize);
        if col >= self.ncols || row >= self.nrows {
            return None;
        }

        // `row` conta a partir do sul; os valores são armazenados do norte
        let value = self.values[(self.nrows - 1 - row) * self.ncols + col];
        if self.nodata.map_or(false, |nd| value == nd) {
            return None;
        }

        Some(value)
    }

    /// Dimensões da grade (colunas, linhas)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.ncols, self.nrows)
    }
}

/// Carrega uma grade ASCII ESRI como camada raster
pub fn load_ascii_grid(
    path: &Path,
    id: impl Into<String>,
    crs: Crs,
) -> Result<RasterLayer, CamadaError> {
    let content = std::fs::read_to_string(path)?;
    let file = path.display().to_string();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("raster")
        .to_string();

    parse_ascii_grid(&content, &file, id.into(), name, crs)
}

/// Parse do conteúdo de uma grade ASCII ESRI
pub fn parse_ascii_grid(
    content: &str,
    file: &str,
    id: String,
    name: String,
    crs: Crs,
) -> Result<RasterLayer, CamadaError> {
    let mut tokens = content.split_whitespace().peekable();

    let mut ncols: Option<usize> = None;
    let mut nrows: Option<usize> = None;
    let mut xll: Option<f64> = None;
    let mut yll: Option<f64> = None;
    let mut center_origin = false;
    let mut cellsize: Option<f64> = None;
    let mut nodata: Option<f64> = None;

    // Cabeçalho: pares chave/valor enquanto o token iniciar com letra
    while tokens
        .peek()
        .map_or(false, |t| t.starts_with(|c: char| c.is_ascii_alphabetic()))
    {
        let key = tokens.next().unwrap().to_ascii_lowercase();
        let raw = tokens
            .next()
            .ok_or_else(|| CamadaError::parse_error(file, format!("missing value for '{key}'")))?;
        let value: f64 = raw
            .parse()
            .map_err(|_| CamadaError::parse_error(file, format!("invalid value for '{key}': {raw}")))?;

        match key.as_str() {
            "ncols" => ncols = Some(value as usize),
            "nrows" => nrows = Some(value as usize),
            "xllcorner" => xll = Some(value),
            "yllcorner" => yll = Some(value),
            "xllcenter" => {
                xll = Some(value);
                center_origin = true;
            }
            "yllcenter" => {
                yll = Some(value);
                center_origin = true;
            }
            "cellsize" => cellsize = Some(value),
            "nodata_value" => nodata = Some(value),
            other => {
                return Err(CamadaError::parse_error(
                    file,
                    format!("unknown header key: {other}"),
                ))
            }
        }
    }

    let ncols = ncols.ok_or_else(|| CamadaError::parse_error(file, "missing 'ncols'"))?;
    let nrows = nrows.ok_or_else(|| CamadaError::parse_error(file, "missing 'nrows'"))?;
    let cellsize = cellsize.ok_or_else(|| CamadaError::parse_error(file, "missing 'cellsize'"))?;
    let mut xll = xll.ok_or_else(|| CamadaError::parse_error(file, "missing 'xllcorner'"))?;
    let mut yll = yll.ok_or_else(|| CamadaError::parse_error(file, "missing 'yllcorner'"))?;

    // Origem informada pelo centro da célula: deslocar para o canto
    if center_origin {
        xll -= cellsize / 2.0;
        yll -= cellsize / 2.0;
    }

    let mut values = Vec::with_capacity(ncols * nrows);
    for raw in tokens {
        let value: f64 = raw
            .parse()
            .map_err(|_| CamadaError::parse_error(file, format!("invalid cell value: {raw}")))?;
        values.push(value);
    }

    if values.len() != ncols * nrows {
        return Err(CamadaError::parse_error(
            file,
            format!(
                "expected {} cell values, found {}",
                ncols * nrows,
                values.len()
            ),
        ));
    }

    debug!(file = file, ncols, nrows, cellsize, "ASCII grid loaded");

    Ok(RasterLayer {
        id,
        name,
        crs,
        ncols,
        nrows,
        xll,
        yll,
        cellsize,
        nodata,
        values,
    })
}
