use std::env;
use std::path::{Path, PathBuf};
use std::process;

use log::{error, info};

use dotdoc::logging;
use dotdoc::manager::ModelManager;

struct CliArgs {
    manifest: PathBuf,
    xml_files: Vec<PathBuf>,
    out: PathBuf,
    verbose: bool,
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <model.json> [--xml <comments.xml>]... [--out <file>] [--verbose]",
        program
    );
    eprintln!("  <model.json>: documentation model manifest to load");
    eprintln!("  --xml <comments.xml>: compiler XML comments file to attach (repeatable)");
    eprintln!("  --out <file>: resolved snapshot path (default: <model>.resolved.json)");
    eprintln!("  --verbose: log at debug level");
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut manifest: Option<PathBuf> = None;
    let mut xml_files = Vec::new();
    let mut out: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--xml" => {
                i += 1;
                let value = args.get(i).ok_or("--xml requires a file path")?;
                xml_files.push(PathBuf::from(value));
            }
            "--out" => {
                i += 1;
                let value = args.get(i).ok_or("--out requires a file path")?;
                out = Some(PathBuf::from(value));
            }
            "--verbose" => verbose = true,
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{}'", other));
            }
            other => {
                if manifest.is_some() {
                    return Err(format!("Unexpected argument '{}'", other));
                }
                manifest = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    let manifest = manifest.ok_or("A model manifest path is required")?;
    let out = out.unwrap_or_else(|| default_out_path(&manifest));
    Ok(CliArgs {
        manifest,
        xml_files,
        out,
        verbose,
    })
}

fn default_out_path(manifest: &Path) -> PathBuf {
    let stem = manifest
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    manifest.with_file_name(format!("{stem}.resolved.json"))
}

fn run(cli: &CliArgs) -> anyhow::Result<()> {
    let mut manager = ModelManager::from_manifest_file(&cli.manifest)?;

    for xml in &cli.xml_files {
        let stats = manager.attach_xml_comments(xml)?;
        println!(
            "Attached {} comment(s) from {} ({} unknown id(s))",
            stats.attached,
            xml.display(),
            stats.unknown
        );
    }

    let stats = manager.resolve();
    println!(
        "Resolved {} inherited member(s) in {} pass(es); {} member(s) remain undocumented",
        stats.inherited, stats.passes, stats.undocumented
    );

    manager.save_resolved(&cli.out)?;
    println!("Wrote {}", cli.out.display());
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            // Use eprintln for usage info since the logger isn't initialized yet
            eprintln!("{message}");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    match logging::init_logger(cli.verbose) {
        Ok(path) => {
            if cli.verbose {
                eprintln!("Logging to {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            process::exit(1);
        }
    }

    info!("dotdoc starting");
    info!("Command line arguments: {:?}", args);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("dotdoc finished");
}
