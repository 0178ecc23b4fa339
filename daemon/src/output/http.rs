use anyhow::Result;
use tracing::debug;

use super::MediaCommand;
use crate::config::HttpSinkConfig;

/// VLC web-interface sink. Every command is a GET against
/// /requests/status.json with HTTP basic auth (empty user).
pub struct HttpSink {
    client: reqwest::Client,
    base_url: String,
    password: String,
    volume_step: u32,
    seek_step: u32,
}

impl HttpSink {
    pub fn new(config: &HttpSinkConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!(
                "http://{}:{}/requests/status.json",
                config.host, config.port
            ),
            password: config.password.clone(),
            volume_step: config.volume_step,
            seek_step: config.seek_step,
        }
    }

    fn query(&self, command: MediaCommand) -> Vec<(&'static str, String)> {
        match command {
            MediaCommand::PlayPause => vec![("command", "pl_pause".to_string())],
            MediaCommand::NextTrack => vec![("command", "pl_next".to_string())],
            MediaCommand::PrevTrack => vec![("command", "pl_previous".to_string())],
            MediaCommand::VolumeUp => vec![
                ("command", "volume".to_string()),
                ("val", format!("+{}", self.volume_step)),
            ],
            MediaCommand::VolumeDown => vec![
                ("command", "volume".to_string()),
                ("val", format!("-{}", self.volume_step)),
            ],
            MediaCommand::SeekForward => vec![
                ("command", "seek".to_string()),
                ("val", format!("+{}S", self.seek_step)),
            ],
            MediaCommand::SeekBack => vec![
                ("command", "seek".to_string()),
                ("val", format!("-{}S", self.seek_step)),
            ],
            // The web interface has no mute toggle; zeroing the volume
            // is the closest equivalent.
            MediaCommand::Mute => vec![
                ("command", "volume".to_string()),
                ("val", "0".to_string()),
            ],
            // Pause playback when the system disengages.
            MediaCommand::SystemOff => vec![("command", "pl_pause".to_string())],
        }
    }

    pub async fn send(&self, command: MediaCommand) -> Result<()> {
        let query = self.query(command);
        debug!("HTTP sink: {} -> {:?}", command, query);
        self.client
            .get(&self.base_url)
            .basic_auth("", Some(&self.password))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> HttpSink {
        HttpSink::new(&HttpSinkConfig::default())
    }

    #[test]
    fn test_base_url() {
        assert_eq!(sink().base_url, "http://127.0.0.1:8080/requests/status.json");
    }

    #[test]
    fn test_query_mapping() {
        let s = sink();
        assert_eq!(
            s.query(MediaCommand::PlayPause),
            vec![("command", "pl_pause".to_string())]
        );
        assert_eq!(
            s.query(MediaCommand::VolumeUp),
            vec![
                ("command", "volume".to_string()),
                ("val", "+13".to_string())
            ]
        );
        assert_eq!(
            s.query(MediaCommand::SeekBack),
            vec![("command", "seek".to_string()), ("val", "-5S".to_string())]
        );
    }
}
