//! [`Notifier`] that shows desktop notifications through `notify-send`.

use crate::config::NotificationConfig;
use crate::traits::Notifier;
use log::{debug, info};
use std::process::Command;

pub struct NotifySend {
    config: NotificationConfig,
}

#[derive(Debug, thiserror::Error)]
#[error("notification error: {0}")]
pub struct NotifyError(String);

impl NotifySend {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the notification program, title and body last.
    fn args(&self, title: &str, body: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(app) = &self.config.app_name {
            args.push("-a".to_string());
            args.push(app.clone());
        }
        if let Some(ms) = self.config.expire_ms {
            args.push("-t".to_string());
            args.push(ms.to_string());
        }
        args.push(title.to_string());
        args.push(body.to_string());
        args
    }
}

impl Notifier for NotifySend {
    type Error = NotifyError;

    fn notify(&self, title: &str, body: &str) -> Result<(), Self::Error> {
        if !self.config.enabled {
            info!("notification (disabled): {}: {}", title, body);
            return Ok(());
        }
        debug!("{} {:?}", self.config.program, self.args(title, body));
        let status = Command::new(&self.config.program)
            .args(self.args(title, body))
            .status()
            .map_err(|e| NotifyError(format!("failed to run {}: {}", self.config.program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(NotifyError(format!("{} exited with {}", self.config.program, status)))
        }
    }
}
