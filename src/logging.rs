use std::fmt;

/// Email address with the local part masked, safe to log.
#[derive(Debug, Clone)]
pub struct SanitizedEmail(String);

impl SanitizedEmail {
    pub fn new(email: impl AsRef<str>) -> Self {
        Self(Self::sanitize(email.as_ref()))
    }

    fn sanitize(email: &str) -> String {
        match email.split_once('@') {
            Some((local, domain)) => {
                let masked_local = match local.chars().next() {
                    Some(first) if local.chars().count() > 2 => format!("{first}***"),
                    _ => "*".repeat(local.chars().count()),
                };
                format!("{masked_local}@{domain}")
            }
            None => "***@***".to_string(),
        }
    }
}

impl fmt::Display for SanitizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Username reduced to its first and last character.
#[derive(Debug, Clone)]
pub struct SanitizedUsername(String);

impl SanitizedUsername {
    pub fn new(username: impl AsRef<str>) -> Self {
        Self(Self::sanitize(username.as_ref()))
    }

    fn sanitize(username: &str) -> String {
        let len = username.chars().count();
        let mut chars = username.chars();
        match (chars.next(), chars.last()) {
            (Some(first), Some(last)) if len > 4 => format!("{first}***{last}"),
            (Some(first), _) if len > 2 => format!("{first}***"),
            _ => "*".repeat(len),
        }
    }
}

impl fmt::Display for SanitizedUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of record passing through the validation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Event,
    Plant,
    User,
    Post,
    Comment,
    Image,
    Id,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Event => "event",
            RecordKind::Plant => "plant",
            RecordKind::User => "user",
            RecordKind::Post => "post",
            RecordKind::Comment => "comment",
            RecordKind::Image => "image",
            RecordKind::Id => "id",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationEvent {
    Accepted,
    Rejected,
}

impl ValidationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationEvent::Accepted => "accepted",
            ValidationEvent::Rejected => "rejected",
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ValidationEvent::Rejected)
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log a validation outcome; rejections at `warn`, acceptances at `debug`.
#[macro_export]
macro_rules! log_validation_event {
    ($event:expr, $kind:expr, $($field:tt)*) => {
        if $event.is_rejection() {
            tracing::warn!(
                validation_event = %$event,
                record = %$kind,
                $($field)*
            );
        } else {
            tracing::debug!(
                validation_event = %$event,
                record = %$kind,
                $($field)*
            );
        }
    };
}
