//! Videos Command
//!
//! Suggest educational videos for a topic.

use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::types::Result;

pub async fn run(query: &str, format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let assistant = ctx.assistant()?;

    let videos = assistant.search_educational_videos(query).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&videos)?),
        _ => Output::new().videos(query, &videos),
    }
    Ok(())
}
