//! Photo comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserSummary;

/// A comment left on a photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier
    pub id: u64,
    /// Comment text
    #[serde(default)]
    pub body: String,
    /// When the comment was posted
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Commenter
    #[serde(default)]
    pub user: UserSummary,
}

impl Comment {
    /// Commenter display name
    pub fn author(&self) -> &str {
        &self.user.fullname
    }

    /// Commenter avatar URL, if any
    pub fn avatar_url(&self) -> Option<&str> {
        self.user.userpic_url.as_deref()
    }

    /// Relative age such as "5m", "2h", "3d"
    pub fn relative_time(&self) -> String {
        let Some(created_at) = self.created_at else {
            return String::new();
        };
        let duration = Utc::now().signed_duration_since(created_at);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds().max(0))
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            created_at.format("%b %d %Y").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_from_service_json() {
        let json = r#"{
            "id": 1,
            "body": "Lovely light",
            "created_at": "2015-08-20T12:00:00-04:00",
            "user": {"fullname": "Grace", "userpic_url": "https://x/g.png"}
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.author(), "Grace");
        assert_eq!(comment.avatar_url(), Some("https://x/g.png"));
        assert_eq!(comment.relative_time(), "Aug 20 2015");
    }

    #[test]
    fn test_missing_fields_default() {
        let comment: Comment = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert!(comment.body.is_empty());
        assert_eq!(comment.avatar_url(), None);
        assert_eq!(comment.relative_time(), "");
    }

    #[test]
    fn test_recent_comment_is_relative() {
        let comment = Comment {
            id: 3,
            body: String::new(),
            created_at: Some(Utc::now() - chrono::Duration::minutes(5)),
            user: UserSummary::default(),
        };
        assert_eq!(comment.relative_time(), "5m");
    }
}
