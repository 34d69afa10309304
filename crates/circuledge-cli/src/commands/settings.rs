use circuledge_core::models::UserSettings;

use crate::commands::common::{channel_label, connect, find_channel_by_path};
use crate::error::CliError;

pub async fn run_settings(default_channel: Option<&str>, server: &str) -> Result<(), CliError> {
    let client = connect(server)?;
    let channels = client.channels().await?;

    let settings = match default_channel {
        Some(path) => {
            let channel = find_channel_by_path(&channels, path)?;
            client
                .update_settings(&UserSettings {
                    default_channel: channel.id,
                })
                .await?
        }
        None => client.settings().await?,
    };

    println!(
        "default channel: {}",
        channel_label(&channels, settings.default_channel)
    );
    Ok(())
}
