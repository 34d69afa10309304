use crate::commands::common::connect;
use crate::error::CliError;

pub async fn run_channels(as_json: bool, server: &str) -> Result<(), CliError> {
    let client = connect(server)?;
    let channels = client.channels().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
    } else {
        for channel in &channels {
            println!("{}  {}", channel.id, channel.path);
        }
    }
    Ok(())
}
