//! Worksheet Command
//!
//! Usage:
//!   studymate worksheet --subject Math --grade 5th --topic Fractions [-f json]

use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::types::Result;

pub async fn run(subject: &str, grade: &str, topic: &str, format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let assistant = ctx.assistant()?;

    let worksheet = assistant.generate_worksheet(subject, grade, topic).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&worksheet)?),
        _ => Output::new().worksheet(&worksheet),
    }
    Ok(())
}
