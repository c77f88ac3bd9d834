//! Configuração de uma exportação
//!
//! Montada uma única vez no momento do disparo (a partir da linha de
//! comando ou de um formulário) e consumida pelo pipeline como valor puro,
//! sem nenhum estado de interface pendurado.

use std::path::PathBuf;

use camada::Crs;

use crate::format::PrecisionPolicy;

/// Origem do valor Z de cada feição — exatamente uma origem é ativa
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZSource {
    /// Ordenada Z da própria geometria (0 quando a feição é 2D)
    Geometry,
    /// Amostragem de um modelo digital de elevação
    Raster { layer_id: String },
    /// Campo numérico da camada
    Field { name: String },
    /// Nenhuma origem ativa: o sentinela NoData é escrito em todas as linhas
    Unset,
}

/// Ordem das colunas de coordenadas no arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    XY,
    YX,
}

/// Separador decimal do arquivo de saída
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalSeparator {
    Point,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// Colunas possíveis de um registro exportado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Nome,
    Descricao,
    X,
    Y,
    Z,
}

impl Column {
    /// Nome da coluna como escrito na linha de cabeçalho
    pub fn header(&self) -> &'static str {
        match self {
            Column::Nome => "Nome",
            Column::Descricao => "Descricao",
            Column::X => "X",
            Column::Y => "Y",
            Column::Z => "Z",
        }
    }
}

/// Configuração completa de uma execução de exportação
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Id da camada vetorial no registro
    pub layer_id: String,

    /// Campo da coluna Nome (em branco conta como não configurado)
    pub name_field: Option<String>,

    /// Campo da coluna Descricao; ausente = coluna omitida do arquivo
    pub description_field: Option<String>,

    /// Origem do valor Z
    pub z_source: ZSource,

    /// Banda amostrada no modo raster
    pub raster_band: usize,

    /// Ordem das colunas de coordenadas
    pub column_order: ColumnOrder,

    /// Separador decimal
    pub decimal_separator: DecimalSeparator,

    /// Política de precisão e número de casas
    pub precision: PrecisionPolicy,
    pub digits: usize,

    /// Exportar apenas as feições selecionadas da camada
    pub selected_only: bool,

    /// CRS de destino das coordenadas exportadas
    pub target_crs: Crs,

    /// Caminho do arquivo de destino
    pub output_path: PathBuf,
}

impl ExportConfig {
    /// Campo de nome efetivo: em branco conta como não configurado
    pub fn effective_name_field(&self) -> Option<&str> {
        self.name_field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Campo de descrição efetivo: em branco conta como não configurado
    pub fn effective_description_field(&self) -> Option<&str> {
        self.description_field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// A coluna Descricao entra no arquivo?
    pub fn include_description(&self) -> bool {
        self.effective_description_field().is_some()
    }

    /// Colunas do arquivo, na ordem configurada
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![Column::Nome];
        if self.include_description() {
            columns.push(Column::Descricao);
        }
        match self.column_order {
            ColumnOrder::XY => {
                columns.push(Column::X);
                columns.push(Column::Y);
            }
            ColumnOrder::YX => {
                columns.push(Column::Y);
                columns.push(Column::X);
            }
        }
        columns.push(Column::Z);
        columns
    }
}
