use anyhow::{Context, Result};
use clap::Args;

use crate::cli::context::AppContext;
use crate::domain::ports::JobRepository;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Job id to autoclassify
    #[arg(long)]
    pub job: i64,
}

pub async fn execute(args: ClassifyArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;

    ctx.autoclassifier
        .match_errors(args.job)
        .await
        .with_context(|| format!("Autoclassification of job {} failed", args.job))?;

    let job = ctx
        .job_repo
        .get(args.job)
        .await?
        .with_context(|| format!("Job {} not found", args.job))?;

    if json {
        let output = serde_json::json!({
            "job_id": job.id,
            "autoclassify_status": job.autoclassify_status.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Job {}: autoclassify status is now '{}'",
            job.id,
            job.autoclassify_status.as_str()
        );
    }
    Ok(())
}
