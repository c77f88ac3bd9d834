//! Reprojeção de coordenadas com PROJ
//!
//! Este módulo está disponível apenas com o feature `reproject`; sem ele,
//! apenas a transformação identidade (mesmo EPSG) é possível.

#[cfg(feature = "reproject")]
use anyhow::{Context, Result};
#[cfg(feature = "reproject")]
use geo::Coord;
#[cfg(feature = "reproject")]
use proj::Proj;

/// Reprojeção de pontos entre dois sistemas de coordenadas
#[cfg(feature = "reproject")]
pub struct Reprojector {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

#[cfg(feature = "reproject")]
impl Reprojector {
    /// Cria um reprojetor entre dois códigos EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&source, &target, None).context(format!(
            "Failed to create projection from {} to {}",
            source, target
        ))?;

        Ok(Self {
            proj,
            source_epsg,
            target_epsg,
        })
    }

    /// Retorna o EPSG de origem
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Retorna o EPSG de destino
    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Transforma uma coordenada
    pub fn transform_point(&self, coord: Coord) -> Result<Coord> {
        if self.source_epsg == self.target_epsg {
            return Ok(coord);
        }

        let (x, y) = self
            .proj
            .convert((coord.x, coord.y))
            .context("Coordinate transformation failed")?;

        Ok(Coord { x, y })
    }
}


// Função pública sem feature para permitir o uso condicional
/// Verifica se a reprojeção está disponível
pub fn is_available() -> bool {
    cfg!(feature = "reproject")
}

// Implementação substituta quando o feature reproject está desativado
#[cfg(not(feature = "reproject"))]
use anyhow::{bail, Result};
#[cfg(not(feature = "reproject"))]
use geo::Coord;

/// Reprojetor substituto - apenas a transformação identidade
#[cfg(not(feature = "reproject"))]
pub struct Reprojector {
    source_epsg: u32,
    target_epsg: u32,
}

#[cfg(not(feature = "reproject"))]
impl Reprojector {
    /// Tenta criar um reprojetor - falha sempre que os EPSG diferem
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        if source_epsg == target_epsg {
            Ok(Self {
                source_epsg,
                target_epsg,
            })
        } else {
            bail!(
                "Reprojection from EPSG:{} to EPSG:{} requires the 'reproject' feature. \
                 Build with: cargo build --features reproject",
                source_epsg,
                target_epsg
            )
        }
    }

    /// Retorna o EPSG de origem
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Retorna o EPSG de destino
    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Retorna a coordenada inalterada (transformação identidade)
    pub fn transform_point(&self, coord: Coord) -> Result<Coord> {
        Ok(coord)
    }
}
