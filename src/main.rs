mod dump;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use cafedump_class_file::decode;
use clap::Parser;
use log::{error, info};

use crate::dump::Dump;

#[derive(Parser)]
#[command(author, version, about = "Prints the structure of JVM class files", long_about = None)]
struct Cli {
    /// The class files to dump
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[arg(long)]
    /// Leave the constant pool entries out of the dump
    no_pool: bool,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut failed = 0;
    for path in &cli.paths {
        if let Err(e) = dump_file(path, &cli) {
            error!("{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        error!("{} of {} files could not be dumped", failed, cli.paths.len());
        process::exit(1);
    }
}

fn dump_file(path: &Path, cli: &Cli) -> Result<()> {
    let bytes =
        fs::read(path).with_context(|| format!("Could not open '{}'", path.display()))?;
    let class_file = decode(&bytes)
        .with_context(|| format!("Invalid class file contents: '{}'", path.display()))?;
    info!("decoded {} ({} bytes)", path.display(), bytes.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}:", path.display())?;
    Dump::new(&class_file)
        .show_pool(!cli.no_pool)
        .write_to(&mut out)?;

    Ok(())
}
