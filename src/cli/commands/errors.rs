use anyhow::Result;
use clap::Args;

use crate::cli::context::AppContext;
use crate::cli::output::table::format_error_table;
use crate::domain::models::{FailureMatch, TextLogError};
use crate::domain::ports::{FailureMatchRepository, TextLogErrorRepository};

#[derive(Args)]
pub struct ErrorsArgs {
    /// Job whose error lines to list
    #[arg(long)]
    pub job: i64,
}

pub async fn execute(args: ErrorsArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;

    let errors = ctx.error_repo.for_job(args.job).await?;
    let mut listing: Vec<(TextLogError, Vec<FailureMatch>)> = Vec::with_capacity(errors.len());
    for error in errors {
        let matches = ctx.match_repo.for_error(error.id).await?;
        listing.push((error, matches));
    }

    if json {
        let output: Vec<_> = listing
            .iter()
            .map(|(error, matches)| {
                serde_json::json!({
                    "error": error,
                    "matches": matches,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if listing.is_empty() {
        println!("No error lines recorded for job {}.", args.job);
    } else {
        println!("{}", format_error_table(&listing));
    }
    Ok(())
}
