//! autoblog: generate, store and optionally publish one blog post.
//!
//! Collaborators are configured from the environment (`OPENAI_API_KEY`,
//! `BRAVE_API_KEY`, `SUPABASE_URL`/`SUPABASE_KEY`, `WORDPRESS_URL`/
//! `WORDPRESS_USERNAME`/`WORDPRESS_PASSWORD`). The pipeline result is printed
//! to stdout as JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use autoblog::core::RunStatus;
use autoblog::events::LoggingEventSink;
use autoblog::models::BlogRequest;
use autoblog::observability::init_tracing;
use autoblog::pipeline::{Pipeline, PipelineConfig};
use autoblog::stages::Collaborators;

#[derive(Parser)]
#[command(name = "autoblog", about = "Research, write and publish a blog post")]
struct Args {
    /// Requesting user
    #[arg(long, env = "AUTOBLOG_USER_ID", default_value = "cli")]
    user_id: String,

    /// Topic of the post
    #[arg(long)]
    topic: String,

    /// Target keyword; repeat for more, the first is primary
    #[arg(long = "keyword", required = true)]
    keywords: Vec<String>,

    /// Type of content to create
    #[arg(long, default_value = autoblog::models::DEFAULT_CONTENT_TYPE)]
    content_type: String,

    /// Publish after storing
    #[arg(long)]
    publish: bool,

    /// Timeout applied to every stage, in seconds
    #[arg(long)]
    stage_timeout: Option<f64>,

    /// Log as JSON
    #[arg(long, env = "AUTOBLOG_LOG_JSON")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let mut config = PipelineConfig::from_env().context("reading configuration")?;
    if args.stage_timeout.is_some() {
        config.stage_timeout_seconds = args.stage_timeout;
    }
    config.validate().context("validating configuration")?;

    let collaborators = Collaborators::from_config(&config).context("building collaborators")?;
    let pipeline = Pipeline::new(config, collaborators).with_event_sink(Arc::new(LoggingEventSink::debug()));

    let request = BlogRequest::new(args.user_id, args.topic, args.keywords)
        .with_content_type(args.content_type)
        .with_publish(args.publish);
    let result = pipeline.create_blog_post(&request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.status == RunStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}
