//! ddstool CLI - Command-line tool for inspecting and restructuring DDS textures.
//!
//! This is the main entry point for the ddstool command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use ddstool::prelude::*;

/// ddstool - DDS texture container tool
#[derive(Parser)]
#[command(name = "ddstool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header of one or more DDS files
    Info {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Reject non-official (ASTC) formats
        #[arg(long)]
        strict: bool,
    },

    /// Split an array or volume into single textures
    Disassemble {
        /// Input DDS file
        #[arg(short, long, env = "DDSTOOL_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "DDSTOOL_OUTPUT")]
        output: PathBuf,
    },

    /// Stack single textures into an array, volume or cubemap
    Assemble {
        /// Input DDS files, in slice order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output DDS file
        #[arg(short, long, env = "DDSTOOL_OUTPUT")]
        output: PathBuf,

        /// What to build
        #[arg(long = "as", value_enum, default_value_t = Layout::Array)]
        layout: Layout,
    },

    /// Keep only the base mip level
    StripMips {
        /// Input DDS file
        #[arg(short, long, env = "DDSTOOL_INPUT")]
        input: PathBuf,

        /// Output DDS file
        #[arg(short, long, env = "DDSTOOL_OUTPUT")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Array,
    Volume,
    Cube,
}

impl From<Layout> for AssembleMode {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Array => AssembleMode::Array,
            Layout::Volume => AssembleMode::Volume,
            Layout::Cube => AssembleMode::Cube,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info { inputs, json, strict } => {
            cmd_info(&inputs, json, strict)?;
        }
        Commands::Disassemble { input, output } => {
            cmd_disassemble(&input, &output)?;
        }
        Commands::Assemble {
            inputs,
            output,
            layout,
        } => {
            cmd_assemble(&inputs, &output, layout.into())?;
        }
        Commands::StripMips { input, output } => {
            cmd_strip_mips(&input, &output)?;
        }
    }

    Ok(())
}

/// Header summary printed by `info`.
#[derive(Serialize)]
struct TextureInfo {
    path: String,
    format: String,
    width: u32,
    height: u32,
    depth: u32,
    mip_count: u32,
    array_size: u32,
    texture_type: String,
    partial_cube: bool,
    dx10: bool,
    slice_count: usize,
    payload_bytes: usize,
}

impl TextureInfo {
    fn new(path: &Path, dds: &Dds) -> Self {
        let header = dds.header();
        Self {
            path: path.display().to_string(),
            format: header.format().to_string(),
            width: header.width(),
            height: header.height(),
            depth: header.depth(),
            mip_count: header.mip_count(),
            array_size: header.array_size(),
            texture_type: header.texture_type().to_string(),
            partial_cube: header.is_partial_cube(),
            dx10: header.is_dx10(),
            slice_count: dds.slices().len(),
            payload_bytes: dds.payload_len(),
        }
    }
}

fn cmd_info(inputs: &[String], json: bool, strict: bool) -> Result<()> {
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        anyhow::bail!("No DDS files matched the given inputs");
    }

    let options = if strict {
        ReadOptions::strict()
    } else {
        ReadOptions::default()
    };

    let start = Instant::now();
    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = Dds::open_with_options(path, &options).map(|dds| TextureInfo::new(path, &dds));
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut infos = Vec::with_capacity(results.len());
    let mut errors = 0;
    for (path, result) in results {
        match result {
            Ok(info) => infos.push(info),
            Err(e) if e.is_file_fatal() => {
                eprintln!("Error reading {}: {}", path.display(), e);
                errors += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for info in &infos {
            print_info(info);
        }
    }

    debug!(files = files.len(), elapsed = ?start.elapsed(), "info finished");
    if errors > 0 {
        eprintln!("\n{} of {} files could not be read", errors, files.len());
    }

    Ok(())
}

fn print_info(info: &TextureInfo) {
    println!("{}", info.path);
    println!("  format:     {}", info.format);
    println!("  size:       {}x{}x{}", info.width, info.height, info.depth);
    println!("  type:       {}{}", info.texture_type, if info.partial_cube { " (partial)" } else { "" });
    println!("  mips:       {}", info.mip_count);
    println!("  array size: {}", info.array_size);
    println!("  slices:     {} ({} bytes)", info.slice_count, info.payload_bytes);
    println!("  header:     {}", if info.dx10 { "DX10" } else { "legacy" });
}

fn cmd_disassemble(input: &Path, output: &Path) -> Result<()> {
    println!("Disassembling: {} -> {}", input.display(), output.display());

    let dds = Dds::open(input).context("Failed to read input file")?;
    let parts = dds.disassemble().context("Failed to disassemble texture")?;

    fs::create_dir_all(output)?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "texture".to_string());
    let width = parts.len().to_string().len();

    for (i, part) in parts.iter().enumerate() {
        let path = output.join(format!("{stem}_{i:0width$}.dds"));
        part.save_to_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("Wrote {} textures", parts.len());

    Ok(())
}

fn cmd_assemble(inputs: &[PathBuf], output: &Path, mode: AssembleMode) -> Result<()> {
    println!("Assembling {} textures -> {}", inputs.len(), output.display());

    let parts = inputs
        .iter()
        .map(|path| Dds::open(path).with_context(|| format!("Failed to read {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let dds = Dds::assemble(parts, mode).context("Failed to assemble textures")?;
    dds.save_to_file(output).context("Failed to write output file")?;

    println!("Wrote {} ({})", output.display(), dds.header().texture_type());

    Ok(())
}

fn cmd_strip_mips(input: &Path, output: &Path) -> Result<()> {
    println!("Stripping mips: {} -> {}", input.display(), output.display());

    let mut dds = Dds::open(input).context("Failed to read input file")?;
    let before = dds.header().mip_count();
    dds.remove_mips().context("Failed to strip mips")?;
    dds.save_to_file(output).context("Failed to write output file")?;

    println!("Removed {} mip levels", before - 1);

    Ok(())
}

/// Expand files, directories and glob patterns into a sorted list of paths.
fn collect_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && has_dds_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if input.contains(['*', '?', '[']) {
            for entry in glob::glob(input).with_context(|| format!("Invalid glob pattern: {input}"))? {
                files.push(entry?);
            }
        } else {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn has_dds_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("dds"))
}
