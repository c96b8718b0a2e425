use thiserror::Error;

/// Failures inside the SMS pipeline. None of these are fatal; the monitor
/// logs them and carries on with the next message or the next tick.
#[derive(Error, Debug)]
pub(crate) enum SmsError {
    #[error("SMS read permission was not granted")]
    PermissionDenied,

    #[error("failed to read SMS inbox: {0:#}")]
    InboxRead(anyhow::Error),

    #[error("failed to persist {what}: {cause:#}")]
    Persistence {
        what: &'static str,
        cause: anyhow::Error,
    },

    #[error("failed to store payment {payment_id}: {cause:#}")]
    PaymentWrite {
        payment_id: String,
        cause: anyhow::Error,
    },
}

impl SmsError {
    pub(crate) fn persistence(what: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self::Persistence {
            what,
            cause: cause.into(),
        }
    }
}
