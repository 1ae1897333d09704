//! Subcommand handlers.

use anyhow::Result;

use crate::cli::{EvalArgs, RunArgs};
use crate::progress::Progress;
use crate::{bootstrap, eval, pipeline, writer};

pub async fn run(args: &RunArgs, quiet: bool) -> Result<()> {
    let config = bootstrap::load_config(args.force_remote)?;
    let router = bootstrap::build_router(&config);

    let spinner = Progress::spinner("chunking document", quiet);
    let chunks = match pipeline::run(&args.input, &config, &router).await {
        Ok(chunks) => chunks,
        Err(error) => {
            spinner.finish_err("chunking failed");
            return Err(error);
        }
    };
    spinner.finish_ok(&format!("{} chunks ready", chunks.len()));

    if args.dry_run {
        println!(
            "{} chunks would be written to {} ({} sentences total)",
            chunks.len(),
            args.output.display(),
            chunks.iter().map(|c| c.sentences.len()).sum::<usize>(),
        );
        return Ok(());
    }

    writer::write_chunks(&args.output, &chunks)?;
    tracing::info!(chunks = chunks.len(), output = %args.output.display(), "wrote chunks");
    Ok(())
}

pub async fn eval(args: &EvalArgs, quiet: bool) -> Result<()> {
    let config = bootstrap::load_config(false)?;
    let router = bootstrap::build_router(&config);

    let spinner = Progress::spinner("evaluating against gold boundaries", quiet);
    let matrix = match eval::run(&args.input, &args.gold, &config, &router).await {
        Ok(matrix) => matrix,
        Err(error) => {
            spinner.finish_err("evaluation failed");
            return Err(error);
        }
    };
    spinner.finish_ok("evaluation complete");

    println!("true_positive:  {}", matrix.true_positive);
    println!("false_positive: {}", matrix.false_positive);
    println!("false_negative: {}", matrix.false_negative);
    println!("true_negative:  {}", matrix.true_negative);
    println!("precision: {:.4}", matrix.precision());
    println!("recall:    {:.4}", matrix.recall());
    println!("f1:        {:.4}", matrix.f1());
    Ok(())
}
