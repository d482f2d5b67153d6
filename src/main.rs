use anyhow::{Context, Result};
use bench_score::cli::{self, Args, Command, ScoreConfig};
use bench_score::eval::{self, ResponseLog, ResultsFile, ScoredRun};
use bench_score::scoring::{rank_evals, RunWindow};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        // stdout carries the summary and rendered reports
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Score(score_args) => run_scoring(score_args)?,
        Command::Init(init_args) => generate_sample_config(init_args)?,
        Command::Show(show_args) => show_report(show_args)?,
    }

    Ok(())
}

fn run_scoring(args: cli::ScoreArgs) -> Result<()> {
    let config = ScoreConfig::load_or_default(args.config.as_deref())?;

    info!("Loading results from {:?}", args.input);
    let raw = ResultsFile::load(&args.input)
        .with_context(|| format!("Failed to load results file: {:?}", args.input))?;

    let window = RunWindow::resolve(
        &raw.results.timestamp,
        args.started_at.as_deref(),
        args.ended_at.as_deref(),
    )?;

    let run = eval::score_run(raw, window).context("Failed to score results")?;

    print_results(&run);

    if args.dry_run {
        println!("\nDry run mode - no report written");
        return Ok(());
    }

    let output_dir = args.output.unwrap_or(config.output_dir);
    let pretty = config.pretty && !args.compact;
    let path = run
        .save(&output_dir, pretty)
        .context("Failed to write report")?;

    println!("\nReport saved to: {:?}", path);

    Ok(())
}

fn print_results(run: &ScoredRun) {
    let stats = &run.stats;

    println!("\n{}", "=".repeat(60));
    println!("SCORING COMPLETE");
    println!("{}", "=".repeat(60));
    println!("\nSummary:");
    println!("  Evaluation: {}", run.raw.eval_id);
    println!("  Models: {}", stats.llms.len());
    println!("  Tests: {}", run.tests.len());
    println!("  Max total score: {}", stats.max_total_score);

    println!("\nModel Rankings:");
    for (rank, eval) in rank_evals(&run.scores) {
        println!(
            "  #{} {} - {:.2}/{} (context {:.2}, reasoning {:.2}, compliance {:.2})",
            rank,
            eval.llm_id,
            eval.total_score,
            stats.max_total_score,
            eval.aggregated_scores.context_length,
            eval.aggregated_scores.reasoning_depth,
            eval.aggregated_scores.instruction_compliance
        );
    }
}

fn generate_sample_config(args: cli::InitArgs) -> Result<()> {
    let config = ScoreConfig::sample();

    config.save(&args.output)?;
    println!("Generated sample config at: {:?}", args.output);

    Ok(())
}

fn show_report(args: cli::ShowArgs) -> Result<()> {
    let config = ScoreConfig::load_or_default(args.config.as_deref())?;

    let log = ResponseLog::load(&args.report)
        .with_context(|| format!("Failed to load report: {:?}", args.report))?;

    print!("{}", log.render_markdown(&config.name));

    Ok(())
}
