use crate::cli::CommandContext;
use crate::types::Result;

pub async fn run(message: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let reply = ctx.assistant()?.chat_with_ai(message).await?;
    println!("{}", reply);
    Ok(())
}
