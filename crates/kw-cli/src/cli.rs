//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kiriwake", about = "Split technical prose into topic-coherent chunks")]
pub struct Cli {
    /// Suppress all but error-level logging.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug-level logging.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline over an input document, writing chunks as JSONL.
    Run(RunArgs),

    /// Compare detected boundaries against a gold-labeled reference.
    Eval(EvalArgs),
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Path to the input document.
    pub input: PathBuf,

    /// Path to write the output JSONL chunks to.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Force every LLM call to the remote provider, overriding the
    /// configured mode (applied after config load, not baked into it).
    #[arg(long)]
    pub force_remote: bool,

    /// Run every stage except the final JSONL write, printing a summary
    /// instead.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Path to the input document to chunk.
    pub input: PathBuf,

    /// Path to a gold-label file: one 1-indexed sentence line number per
    /// line, naming the sentence after which a boundary should fall.
    #[arg(long)]
    pub gold: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_subcommand_parses_required_and_flag_args() {
        let cli = Cli::parse_from([
            "kiriwake",
            "run",
            "doc.txt",
            "--output",
            "out.jsonl",
            "--force-remote",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.input, PathBuf::from("doc.txt"));
        assert_eq!(args.output, PathBuf::from("out.jsonl"));
        assert!(args.force_remote);
        assert!(!args.dry_run);
    }

    #[test]
    fn global_quiet_flag_is_recognized_before_subcommand() {
        let cli = Cli::parse_from(["kiriwake", "--quiet", "eval", "doc.txt", "--gold", "g.txt"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn missing_required_output_is_rejected() {
        let result = Cli::try_parse_from(["kiriwake", "run", "doc.txt"]);
        assert!(result.is_err());
    }
}
