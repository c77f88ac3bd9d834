//! Relatório de uma execução de exportação
//!
//! Contadores e status coletados pelo pipeline, exibidos no console ao
//! final e opcionalmente gravados em JSON.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Status final da exportação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStatus {
    /// Todas as feições consideradas viraram registros completos
    Success,
    /// Exportação concluída, mas com feições puladas ou linhas NoData
    PartialSuccess,
    /// Exportação abortada
    Failed,
}

/// Relatório completo de uma exportação
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Arquivo de destino
    pub output: PathBuf,

    /// Status final
    pub status: ExportStatus,

    /// Duração da exportação
    pub duration_secs: f64,

    /// Registros escritos no arquivo
    pub features_written: usize,

    /// Feições puladas por geometria vazia
    pub skipped_empty: usize,

    /// Linhas escritas com Z = NoData
    pub nodata_rows: usize,
}

impl ExportReport {
    /// Cria um relatório para um arquivo de destino
    pub fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            status: ExportStatus::Success,
            duration_secs: 0.0,
            features_written: 0,
            skipped_empty: 0,
            nodata_rows: 0,
        }
    }

    /// Registra um registro escrito
    pub fn record_written(&mut self) {
        self.features_written += 1;
    }

    /// Registra uma feição pulada por geometria vazia
    pub fn record_skipped_empty(&mut self) {
        self.skipped_empty += 1;
    }

    /// Registra uma linha com Z = NoData
    pub fn record_nodata(&mut self) {
        self.nodata_rows += 1;
    }

    /// Define a duração da exportação
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Marca a exportação como abortada
    pub fn mark_failed(&mut self) {
        self.status = ExportStatus::Failed;
    }

    /// Determina o status final a partir dos contadores
    pub fn finalize(&mut self) {
        if self.status == ExportStatus::Failed {
            return;
        }
        self.status = if self.skipped_empty > 0 || self.nodata_rows > 0 {
            ExportStatus::PartialSuccess
        } else {
            ExportStatus::Success
        };
    }

    /// Total de feições consideradas na iteração
    pub fn total_considered(&self) -> usize {
        self.features_written + self.skipped_empty
    }

    /// Exibe o relatório no console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("EXPORT REPORT - {}", self.output.display());
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Features: {} considered, {} written, {} skipped (empty geometry)",
            self.total_considered(),
            self.features_written,
            self.skipped_empty
        );
        if self.nodata_rows > 0 {
            println!("Rows with Z = NoData: {}", self.nodata_rows);
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Resumo compacto de uma linha
    pub fn summary(&self) -> String {
        format!(
            "{}: {} written, {} skipped, {} NoData",
            self.output.display(),
            self.features_written,
            self.skipped_empty,
            self.nodata_rows
        )
    }

    /// Grava o relatório em JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
