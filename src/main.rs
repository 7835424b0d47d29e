use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use kb_lookup::core::config::{AppPaths, ConfigService};
use kb_lookup::core::logging;
use kb_lookup::rag::{KeywordContextBuilder, KnowledgeIndex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    let config_service = ConfigService::new(paths.clone());
    let config = config_service
        .load_config()
        .with_context(|| format!("Failed to load {}", config_service.config_path().display()))?;
    logging::init(&paths, &config.logging);

    for status in config_service.key_status()? {
        match status.prefix {
            Some(prefix) => tracing::info!("{} is set and begins {}", status.name, prefix),
            None => tracing::info!("{} is not set", status.name),
        }
    }

    let sources = config.knowledge.resolved_sources();
    let index = KnowledgeIndex::load(&sources).context("Failed to load knowledge base")?;
    tracing::info!("Knowledge keys: {:?}", index.keys());

    let builder = KeywordContextBuilder::new(config.context.clone());

    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        println!("{}", builder.additional_context(&index, &args.join(" ")));
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        println!("{}\n", builder.additional_context(&index, &line));
    }

    Ok(())
}
