use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::context::AppContext;
use crate::config::ConfigLoader;
use crate::domain::models::Config;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: InitArgs, json: bool) -> Result<()> {
    let config_path = Path::new(".logsift/config.yaml");

    if !config_path.exists() || args.force {
        let config = Config::default();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml_string(&config)?;
        std::fs::write(config_path, yaml)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let config = ConfigLoader::load()?;
    let ctx = AppContext::from_config(&config).await?;
    ctx.pool.close().await;

    if json {
        let output = serde_json::json!({
            "config": config_path.display().to_string(),
            "database": config.database.path,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Initialized logsift.");
        println!("  Config: {}", config_path.display());
        println!("  Database: {}", config.database.path);
    }
    Ok(())
}

/// Serialize the default config by hand; the figment yaml provider only
/// reads, and pulling in a yaml writer for one file is not worth it.
fn serde_yaml_string(config: &Config) -> Result<String> {
    Ok(format!(
        "database:\n  path: {}\n  max_connections: {}\nlogging:\n  level: {}\n  format: {}\n",
        config.database.path,
        config.database.max_connections,
        config.logging.level,
        config.logging.format,
    ))
}
