//! Maintenance CLI for SKK dictionary files.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use encoding_rs::Encoding;
use skk_engine::dict::{FileDict, FsStorage};

#[derive(Parser)]
#[command(name = "skkdict", about = "Inspect and convert SKK dictionary files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print reading and candidate counts.
    Info {
        file: PathBuf,
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },
    /// Validate the file, reporting the first malformed line.
    Check {
        file: PathBuf,
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },
    /// Re-encode a dictionary and normalize its formatting.
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "utf-8")]
        from: String,
        #[arg(long, default_value = "utf-8")]
        to: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Info { file, encoding } => info(&file, &encoding),
        Command::Check { file, encoding } => check(&file, &encoding),
        Command::Convert {
            input,
            output,
            from,
            to,
        } => convert(&input, &output, &from, &to),
    };
    if let Err(message) = result {
        eprintln!("skkdict: {message}");
        process::exit(1);
    }
}

fn resolve_encoding(label: &str) -> Result<&'static Encoding, String> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| format!("unknown encoding label {label:?}"))
}

fn open(file: &Path, label: &str, readonly: bool) -> Result<FileDict, String> {
    let encoding = resolve_encoding(label)?;
    // FileDict treats a missing backing file as an empty dictionary; for a
    // maintenance tool that is a usage error instead.
    if !file.exists() {
        return Err(format!("{}: no such file", file.display()));
    }
    FileDict::open(file, encoding, readonly, Box::new(FsStorage)).map_err(|e| e.to_string())
}

fn info(file: &Path, label: &str) -> Result<(), String> {
    let dict = open(file, label, true)?;
    let candidates: usize = dict.readings().map(|yomi| dict.refer(yomi).len()).sum();
    println!(
        "{}: {} readings, {} candidates",
        dict.id(),
        dict.entry_count(),
        candidates
    );
    Ok(())
}

fn check(file: &Path, label: &str) -> Result<(), String> {
    let dict = open(file, label, true)?;
    println!("{}: OK ({} readings)", dict.id(), dict.entry_count());
    Ok(())
}

fn convert(input: &Path, output: &Path, from: &str, to: &str) -> Result<(), String> {
    if output.exists() {
        return Err(format!("{}: already exists, refusing to overwrite", output.display()));
    }
    let source = open(input, from, true)?;
    let to_encoding = resolve_encoding(to)?;
    let mut target = FileDict::open(output, to_encoding, false, Box::new(FsStorage))
        .map_err(|e| e.to_string())?;

    for yomi in source.readings() {
        // add() puts each word at the front, so feed the list back to front
        for word in source.refer(yomi).iter().rev() {
            target
                .add(yomi, word.clone())
                .map_err(|e| e.to_string())?;
        }
    }
    target.save().map_err(|e| e.to_string())?;
    println!(
        "wrote {} readings to {}",
        target.entry_count(),
        output.display()
    );
    Ok(())
}
