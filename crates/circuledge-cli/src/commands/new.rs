use circuledge_core::workflow::ConflictWorkflow;

use crate::commands::common::{connect, normalize_content, prompt_resolution, read_piped_stdin};
use crate::commands::edit::settle_save;
use crate::error::CliError;

pub async fn run_new(content_parts: &[String], server: &str) -> Result<(), CliError> {
    let content = match normalize_content(&content_parts.join(" ")) {
        Some(content) => Some(content),
        None => read_piped_stdin()?,
    };

    let client = connect(server)?;
    let created = client.create_note().await?;
    tracing::debug!(note = %created.id, revision = %created.revision, "Created note");

    let Some(content) = content else {
        println!("{}", created.id);
        return Ok(());
    };

    let mut workflow = ConflictWorkflow::new();
    workflow.start_editing(&client, created.id).await?;
    workflow.set_body(content)?;
    let completion = workflow.save(&client).await?;
    settle_save(&mut workflow, &client, completion, |_| prompt_resolution()).await
}
