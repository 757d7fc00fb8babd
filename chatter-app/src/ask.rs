use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use chatter_common::ChatterError;
use chatter_pipeline::{Pipeline, RawQuery, SummaryOutcome};
use clap::Args;
use dialoguer::Input;

use crate::report;

#[derive(Args, Debug, Default)]
pub struct AskArgs {
    /// Topic to search for
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Subreddit to search, `all` for every subreddit
    #[arg(short, long)]
    pub subreddit: Option<String>,

    /// Start date (YYYY-MM-DD, UTC)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD, UTC, inclusive)
    #[arg(long)]
    pub end: Option<String>,

    /// List the fetched content without calling the summarizer
    #[arg(long)]
    pub no_summary: bool,
}

/// Fill in anything not given on the command line. Prompts only when stdin
/// is a terminal.
fn complete_query(args: AskArgs) -> Result<(RawQuery, bool)> {
    let interactive = std::io::stdin().is_terminal();
    let prompt = |label: &str, default: Option<&str>| -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(label).allow_empty(true);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        Ok(input.interact_text()?)
    };

    let mut ask = |given: Option<String>, label: &str, default: Option<&str>| -> Result<String> {
        match given {
            Some(v) => Ok(v),
            None if interactive => prompt(label, default),
            None => Ok(default.unwrap_or_default().to_string()),
        }
    };

    let query = RawQuery {
        topic: ask(args.topic, "Enter a topic to search", None)?,
        subreddit: ask(args.subreddit, "Subreddit", Some("all"))?,
        start_date: Some(ask(args.start, "Start date (YYYY-MM-DD, empty for none)", None)?),
        end_date: Some(ask(args.end, "End date (YYYY-MM-DD, empty for none)", None)?),
    };
    Ok((query, !args.no_summary))
}

pub async fn run(pipeline: &Pipeline, args: AskArgs) -> Result<ExitCode> {
    let (query, summarize) = complete_query(args)?;

    let report = match pipeline.run(&query, summarize).await {
        Ok(report) => report,
        Err(ChatterError::Validation(e)) => {
            eprintln!("Invalid input: {e}");
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    print!("{}", report::render(&report));

    Ok(match report.summary {
        SummaryOutcome::Failed(_) => ExitCode::from(1),
        SummaryOutcome::Done(_) | SummaryOutcome::Skipped => ExitCode::SUCCESS,
    })
}
