use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single message on the board.
///
/// `timestamp` is milliseconds since the Unix epoch, assigned by the client
/// at submission time. It is also the only identity a post has.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub message: String,
    pub timestamp: i64,
}

impl Post {
    pub fn new(message: impl Into<String>, timestamp: i64) -> Self {
        Post {
            message: message.into(),
            timestamp,
        }
    }

    /// A post stamped with the current wall-clock time
    pub fn now(message: impl Into<String>) -> Self {
        Post::new(message, Utc::now().timestamp_millis())
    }

    /// Timestamp as a UTC date, if it is in chrono's representable range
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// ISO-8601 rendering of the timestamp, e.g. `2024-01-01T00:00:00.000Z`
    pub fn posted_at_iso(&self) -> String {
        match self.posted_at() {
            Some(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.timestamp.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let post = Post::new("hi", 1);
        assert_eq!(
            serde_json::to_string(&post).unwrap(),
            r#"{"message":"hi","timestamp":1}"#
        );
    }

    #[test]
    fn test_posted_at_iso() {
        let post = Post::new("hi", 1_700_000_000_123);
        assert_eq!(post.posted_at_iso(), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_posted_at_out_of_range() {
        let post = Post::new("hi", i64::MAX);
        assert_eq!(post.posted_at(), None);
        assert_eq!(post.posted_at_iso(), i64::MAX.to_string());
    }
}
