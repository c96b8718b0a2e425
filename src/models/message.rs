use serde::Deserialize;

/// A message as delivered by the device inbox. Field names follow the
/// Android inbox export (`address`, `body`, `date`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "address", default)]
    pub sender: String,
    #[serde(default)]
    pub body: String,
    /// Epoch milliseconds.
    #[serde(rename = "date")]
    pub timestamp_ms: i64,
}

impl IncomingMessage {
    pub fn new(sender: impl Into<String>, body: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp_ms,
        }
    }

    /// Short single-line preview of the body, safe to log.
    pub fn preview(&self) -> String {
        let flat: String = self.body.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() > 40 {
            let cut: String = flat.chars().take(40).collect();
            format!("{cut}...")
        } else {
            flat
        }
    }
}
