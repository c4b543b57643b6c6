use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use outliner_cli::batch::{collect_layout_files, save_stages};
use outliner_cli::{process_batch, BatchOptions};
use outliner_core::rules::DebugConfig;
use outliner_core::{OutlineConfig, OutlineProcessor};

#[derive(Parser)]
#[command(name = "outliner")]
#[command(about = "Extract document outlines (title + H1..H5 headings) from page layout dumps")]
struct Args {
    /// Layout file, or directory of layout files, to process
    #[arg(short, long, default_value = "input_layouts")]
    input: String,

    /// Directory for the per-document outline JSON files
    #[arg(short, long, default_value = "output_json")]
    output: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the default config as YAML and exit
    #[arg(long)]
    show_config: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Skip cache and force fresh processing (useful for development/testing)
    #[arg(long)]
    skip_cache: bool,

    /// Directory for cached outlines
    #[arg(long, default_value = "cache")]
    cache_dir: String,

    /// Process documents one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: lines, merged lines, title, levels, candidates and final outline
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Trace lines matching these patterns (regex or substring) through the pipeline
    #[arg(long = "debug-filter")]
    debug_filters: Vec<String>,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose || !args.debug_filters.is_empty() {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.show_config {
        print!("{}", OutlineConfig::default().to_yaml()?);
        return Ok(());
    }

    println!("🦀 Outliner");

    let config = match &args.config {
        Some(path) => {
            let config = OutlineConfig::load_from_file(path)?;
            println!("📋 Loaded config from: {path}");
            config
        }
        None => {
            println!("📋 Using default config");
            OutlineConfig::default()
        }
    };

    let input = Path::new(&args.input);

    let mut processor = if args.skip_cache {
        OutlineProcessor::new_uncached(&config)?
    } else {
        OutlineProcessor::new_cli_with_cache(&config, &args.cache_dir)?
    };
    if !args.debug_filters.is_empty() {
        processor.set_debug_config(DebugConfig::new(true, args.debug_filters.clone()));
    }

    let files = collect_layout_files(input, &processor)?;
    if files.is_empty() {
        println!(
            "⚠️  No {} layout files found in: {}",
            processor.source_name(),
            args.input
        );
        return Ok(());
    }

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let stages_dir = PathBuf::from(&args.stages_dir);
        let mut failed = false;
        for file in &files {
            match processor
                .process_capture_stages(file)
                .and_then(|stages| save_stages(&stages, file, &stages_dir))
            {
                Ok(dir) => println!("✅ Stages for '{}' dumped to: {}", file.display(), dir.display()),
                Err(e) => {
                    eprintln!("❌ Stage dump failed for '{}': {e:#}", file.display());
                    failed = true;
                }
            }
        }
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("📄 Processing {} document(s) from: {}", files.len(), args.input);

    let options = BatchOptions {
        output_dir: PathBuf::from(&args.output),
        enable_profiling: args.profile,
        skip_cache: args.skip_cache,
        sequential: args.sequential,
    };
    let report = process_batch(&processor, &files, &options)?;

    for result in &report.results {
        let name = result
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &result.error {
            None => {
                println!(
                    "Processed '{}' -> outline saved to '{}'",
                    name,
                    result.output_path.display()
                );
                log::debug!(
                    "   {} headings in {}ms",
                    result.heading_count,
                    result.latency_ms
                );
            }
            Some(error) => eprintln!("❌ Failed to process '{name}': {error}"),
        }
    }

    println!(
        "\n📊 {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
