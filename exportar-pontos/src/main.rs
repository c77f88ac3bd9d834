//! Ponto de entrada CLI para exportar-pontos

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod export;
mod format;
mod report;

use cli::{Commands, ExportArgs};

/// Exportar coordenadas de pontos de camadas vetoriais para arquivo texto
#[derive(Parser)]
#[command(name = "exportar-pontos")]
#[command(author, version)]
#[command(about = "Exportar pontos de camadas vetoriais para TXT delimitado")]
#[command(
    long_about = "Exporta coordenadas (e nome/descrição/cota) de camadas GeoJSON para arquivo texto separado por tabulação, com reprojeção e cota vinda da geometria, de um MDE ou de um campo numérico.\n\nPor padrão executa a exportação. Use 'fields' para listar o esquema de uma camada."
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Aumentar a verbosidade (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Modo silencioso
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Subcomando (padrão: exportação)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Argumentos da exportação (comando padrão)
    #[command(flatten)]
    export: Option<ExportArgs>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configurar o logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Fields { layer }) => {
            cli::cmd_fields(&layer)?;
        }
        None => {
            // Comando padrão: exportação
            let args = cli
                .export
                .expect("Argumentos de exportação requeridos (--layer e --output)");
            info!(
                layer = %args.layer.display(),
                output = %args.output.display(),
                "Export to delimited text"
            );
            cli::cmd_export(args)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
