//! Command-line argument definitions for the schemaviz CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, layout overrides and logging verbosity.

use clap::Parser;

use schemaviz::OutputFormat;

/// Command-line arguments for the schemaviz diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input schema (`.graphql` SDL or `.json`), or `-` for stdin
    #[arg(help = "Path to the input schema, or - for stdin")]
    pub input: String,

    /// Path to the output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (mermaid, drawio, svg); inferred from the output extension when omitted
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed for the initial placement; overrides the configuration
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of simulation iterations; overrides the configuration
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The requested format, falling back to the output file extension and
    /// then to Mermaid.
    pub fn output_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }
        let extension = self
            .output
            .as_deref()
            .and_then(|output| output.rsplit_once('.'))
            .map(|(_, extension)| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("svg") => OutputFormat::Svg,
            Some("drawio" | "xml") => OutputFormat::Drawio,
            _ => OutputFormat::Mermaid,
        }
    }

    /// Whether the input should be read as a JSON schema document.
    pub fn is_json_input(&self) -> bool {
        self.input.to_ascii_lowercase().ends_with(".json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["schemaviz", "schema.graphql"]);
        assert_eq!(args.input, "schema.graphql");
        assert!(args.output.is_none());
        assert_eq!(args.log_level, "info");
        assert_eq!(args.output_format(), OutputFormat::Mermaid);
        assert!(!args.is_json_input());
    }

    #[test]
    fn test_format_from_flag_and_extension() {
        let args = parse(&["schemaviz", "in.json", "-o", "out.SVG"]);
        assert_eq!(args.output_format(), OutputFormat::Svg);
        assert!(args.is_json_input());

        let args = parse(&["schemaviz", "in.graphql", "-o", "out.svg", "-f", "drawio"]);
        assert_eq!(args.output_format(), OutputFormat::Drawio);

        assert!(Args::try_parse_from(["schemaviz", "x", "-f", "png"]).is_err());
    }

    #[test]
    fn test_layout_overrides() {
        let args = parse(&["schemaviz", "-", "--seed", "7", "--iterations", "25"]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.iterations, Some(25));
    }
}
