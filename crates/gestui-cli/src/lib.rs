use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for gestui
#[derive(Parser, Debug)]
#[command(version, about = "gestui — gestión del negocio en la terminal")]
pub struct Args {
    /// Optional JSON seed file with initial rows per module.
    /// Without it the built-in demo dataset is loaded.
    pub data: Option<PathBuf>,

    /// Open on a specific module (clientes, categorias, citas, compras,
    /// cotizaciones, proveedores, tecnicos)
    #[arg(long = "module")]
    pub module: Option<String>,

    /// Rows per page for every table (overrides the config file)
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Force the narrow (card) layout regardless of terminal width
    #[arg(long = "narrow", action)]
    pub narrow: bool,

    /// Enable debug logging
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write the default config file and exit
    #[arg(long = "write-config", action)]
    pub write_config: bool,

    /// Overwrite an existing config file (with --write-config)
    #[arg(long = "force", action)]
    pub force: bool,
}
