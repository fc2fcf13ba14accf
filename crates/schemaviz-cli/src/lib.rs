//! CLI logic for the schemaviz diagram tool.
//!
//! Reads a schema, lays it out and writes the rendered diagram.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
};

use log::{debug, info};

use schemaviz::{DiagramBuilder, SchemavizError};

/// Run the schemaviz CLI application
///
/// The input is read as JSON when its name ends in `.json` and as SDL
/// otherwise. `--seed` and `--iterations` override the loaded configuration.
///
/// # Errors
///
/// Returns `SchemavizError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SchemavizError> {
    let format = args.output_format();
    info!(
        input_path = args.input,
        output_path:? = args.output,
        format:% = format;
        "Processing schema"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        app_config.layout_mut().set_seed(Some(seed));
    }
    if let Some(iterations) = args.iterations {
        app_config.layout_mut().set_iterations(iterations);
    }
    debug!(config:? = app_config; "Effective configuration");

    let source = read_input(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let schema = if args.is_json_input() {
        builder.parse_json(&source)?
    } else {
        builder.parse(&source)?
    };
    let rendered = builder.render(&schema, format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Diagram exported successfully");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn read_input(input: &str) -> io::Result<String> {
    if input == "-" {
        io::read_to_string(io::stdin())
    } else {
        fs::read_to_string(input)
    }
}
