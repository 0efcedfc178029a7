// befungen - Befunge-93 method layout tool
// Lays out a method described in TOML and prints the resulting grid

use std::env;
use std::fs;
use std::process;

use befungen::codegen::manifest::MethodManifest;
use befungen::codegen::{BefunGen, CodeGenError, CodeGenOptions};

/// Parsed command line
#[derive(Debug, PartialEq)]
struct CliArgs {
    input_file: String,
    config_file: Option<String>,
    output_file: Option<String>,
    verbose: bool,
}

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("befungen");

    let cli = match parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage(program_name);
            process::exit(0);
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage(program_name);
            process::exit(1);
        }
    };

    match run(&cli.input_file, cli.config_file.as_deref(), cli.verbose) {
        Ok(grid) => {
            if let Some(path) = cli.output_file {
                if let Err(err) = fs::write(&path, &grid) {
                    eprintln!("Error writing '{}': {}", path, err);
                    process::exit(1);
                }
                if cli.verbose {
                    println!("Wrote {} bytes to {}", grid.len(), path);
                }
            } else {
                print!("{}", grid);
            }
        }
        Err(err) => {
            eprintln!("Compilation error: {}", err);
            process::exit(1);
        }
    }
}

/// Parse the arguments after the program name; `Ok(None)` means help was requested
fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    let mut input_file: Option<String> = None;
    let mut config_file = None;
    let mut output_file = None;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                let value = args.get(i + 1).ok_or("--config requires a filename")?;
                config_file = Some(value.clone());
                i += 2;
            }
            "-o" | "--output" => {
                let value = args.get(i + 1).ok_or("--output requires a filename")?;
                output_file = Some(value.clone());
                i += 2;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            "-h" | "--help" => return Ok(None),
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option '{}'", arg));
            }
            arg => {
                if input_file.is_some() {
                    return Err("Multiple input files specified".to_string());
                }
                input_file = Some(arg.to_string());
                i += 1;
            }
        }
    }

    let input_file = input_file.ok_or("No input file specified")?;
    Ok(Some(CliArgs {
        input_file,
        config_file,
        output_file,
        verbose,
    }))
}

fn run(input_file: &str, config_file: Option<&str>, verbose: bool) -> Result<String, CodeGenError> {
    let options = match config_file {
        Some(path) => CodeGenOptions::from_file(path)?,
        None => CodeGenOptions::default(),
    };

    let source = fs::read_to_string(input_file)
        .map_err(|e| CodeGenError::IOError(format!("cannot read '{}': {}", input_file, e)))?;
    let manifest = MethodManifest::from_toml_str(&source)?;
    let method = manifest.to_method()?;
    let (offset_x, offset_y) = manifest.offset();

    let mut generator = BefunGen::new(options)?;
    let layout = generator.compile_method(&method, offset_x, offset_y)?;

    if verbose {
        eprintln!(
            "Method '{}': {}x{} cells, entry at {:?}",
            method.identifier,
            layout.fragment.width(),
            layout.fragment.height(),
            layout.entry()
        );
        for (name, slot) in &layout.slots {
            eprintln!("  {} -> ({}, {})", name, slot.x, slot.y);
        }
    }

    Ok(generator.render(&layout.fragment))
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [options] <method.toml>", program_name);
    println!();
    println!("Options:");
    println!("  -c, --config <file>    Code generation options (TOML)");
    println!("  -o, --output <file>    Output filename (default: stdout)");
    println!("  -v, --verbose          Verbose output");
    println!("  -h, --help             Show this help message");
}
