use anyhow::{Context, Result};
use clap::Args;

use crate::cli::context::AppContext;

#[derive(Args)]
pub struct BugArgs {
    /// Classified failure to tag
    #[arg(long = "classified-failure")]
    pub classified_failure: i64,

    /// Bug number to attach
    #[arg(long)]
    pub bug: i64,
}

pub async fn execute(args: BugArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;

    let canonical = ctx
        .bug_assignment
        .set_bug(args.classified_failure, args.bug)
        .await
        .with_context(|| {
            format!(
                "Failed to set bug {} on classified failure {}",
                args.bug, args.classified_failure
            )
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&canonical)?);
    } else if canonical.id == args.classified_failure {
        println!(
            "Classified failure {} now carries bug {}",
            canonical.id, args.bug
        );
    } else {
        println!(
            "Classified failure {} merged into {} (bug {})",
            args.classified_failure, canonical.id, args.bug
        );
    }
    Ok(())
}
