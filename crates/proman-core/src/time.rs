use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_utc_rfc3339() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

/// Source of audit timestamps.
pub trait Clock {
    fn timestamp(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        match now_utc_rfc3339() {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "failed to format current time");
                OffsetDateTime::now_utc().unix_timestamp().to_string()
            }
        }
    }
}

/// Always reports the same instant, e.g. a timestamp pinned in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}

pub fn is_rfc3339(value: &str) -> bool {
    OffsetDateTime::parse(value, &Rfc3339).is_ok()
}
