//! Escrita do arquivo texto delimitado
//!
//! Uma linha de cabeçalho com os nomes das colunas na ordem configurada e
//! um registro por feição, separados por tabulação, UTF-8, uma quebra de
//! linha por registro.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::Column;

/// Escritor do arquivo de destino
pub struct RecordWriter {
    writer: BufWriter<File>,
}

impl RecordWriter {
    /// Cria (truncando) o arquivo de destino e escreve o cabeçalho
    pub fn create(path: &Path, columns: &[Column]) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header: Vec<&str> = columns.iter().map(Column::header).collect();
        writeln!(writer, "{}", header.join("\t"))?;

        Ok(Self { writer })
    }

    /// Escreve um registro já montado na ordem das colunas
    pub fn write_record(&mut self, values: &[String]) -> io::Result<()> {
        writeln!(self.writer, "{}", values.join("\t"))
    }

    /// Descarrega o buffer. Erros de escrita pendentes aparecem aqui em
    /// vez de sumirem no Drop.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Monta um registro na ordem configurada das colunas
pub fn assemble_record(
    columns: &[Column],
    name: &str,
    description: &str,
    x: &str,
    y: &str,
    z: &str,
) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            match column {
                Column::Nome => name,
                Column::Descricao => description,
                Column::X => x,
                Column::Y => y,
                Column::Z => z,
            }
            .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Column;

    #[test]
    fn test_assemble_record_order() {
        let columns = [Column::Nome, Column::Y, Column::X, Column::Z];
        let record = assemble_record(&columns, "P1", "", "10", "20", "0");
        assert_eq!(record, vec!["P1", "20", "10", "0"]);
    }

    #[test]
    fn test_assemble_record_with_description() {
        let columns = [Column::Nome, Column::Descricao, Column::X, Column::Y, Column::Z];
        let record = assemble_record(&columns, "P1", "marco", "10", "20", "NoData");
        assert_eq!(record, vec!["P1", "marco", "10", "20", "NoData"]);
    }

    #[test]
    fn test_header_and_records_on_disk() {
        let path = std::env::temp_dir().join("exportar_pontos_writer_test.txt");
        let columns = [Column::Nome, Column::X, Column::Y, Column::Z];

        let mut writer = RecordWriter::create(&path, &columns).unwrap();
        writer
            .write_record(&assemble_record(&columns, "A", "", "1", "2", "0"))
            .unwrap();
        writer.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Nome\tX\tY\tZ\nA\t1\t2\t0\n");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let path = std::env::temp_dir().join("exportar_pontos_writer_trunc_test.txt");
        std::fs::write(&path, "conteudo antigo que deve sumir\nlinha\nlinha\n").unwrap();

        let columns = [Column::Nome, Column::X, Column::Y, Column::Z];
        let writer = RecordWriter::create(&path, &columns).unwrap();
        writer.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Nome\tX\tY\tZ\n");

        std::fs::remove_file(path).ok();
    }
}
