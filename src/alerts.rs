use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Ring the terminal bell.
    pub bell: bool,
    /// Show a banner line until the next key press.
    pub notification: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            bell: true,
            notification: true,
        }
    }
}

/// What the display should do to announce an event.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Alert {
    pub bell: bool,
    pub notice: Option<String>,
}

pub fn fire_alert(config: &AlertConfig, message: &str) -> Alert {
    log::info!("alert: {}", message);
    Alert {
        bell: config.bell,
        notice: config.notification.then(|| message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_alert_follows_config() {
        let alert = fire_alert(&AlertConfig::default(), "Countdown finished");
        assert!(alert.bell);
        assert_eq!(alert.notice.as_deref(), Some("Countdown finished"));

        let quiet = AlertConfig {
            bell: false,
            notification: false,
        };
        assert_eq!(fire_alert(&quiet, "x"), Alert::default());
    }
}
