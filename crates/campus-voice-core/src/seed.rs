//! Example items written on first start when no collection is persisted.

use chrono::{DateTime, Duration, Utc};

use crate::feedback::{Category, Comment, FeedbackItem, Status};
use crate::identity::Role;
use crate::types::{CommentId, FeedbackId, UserId};

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

fn admin_comment(id: &str, text: &str, at: DateTime<Utc>) -> Comment {
    Comment {
        id: CommentId::new(id),
        text: text.to_owned(),
        user_id: UserId::new("1"),
        user_name: "Admin User".to_owned(),
        role: Role::Admin,
        created_at: at,
    }
}

/// The three seed items, with timestamps relative to `now`.
///
/// Ids are `1`, `2`, `3` with statuses `in_progress`, `resolved`, `pending`.
pub fn seed_items(now: DateTime<Utc>) -> Vec<FeedbackItem> {
    vec![
        FeedbackItem {
            id: FeedbackId::new("1"),
            title: "Poor WiFi in Dorm Building A".to_owned(),
            description: "The WiFi signal in Dorm Building A has been extremely weak for the \
                          past week, making it difficult to complete online assignments."
                .to_owned(),
            category: Category::Infrastructure,
            status: Status::InProgress,
            is_anonymous: false,
            user_id: UserId::new("2"),
            user_name: Some("Student User".to_owned()),
            created_at: days_ago(now, 7),
            updated_at: days_ago(now, 2),
            attachments: Vec::new(),
            comments: vec![admin_comment(
                "101",
                "We have dispatched a technician to check the router in Building A.",
                days_ago(now, 3),
            )],
        },
        FeedbackItem {
            id: FeedbackId::new("2"),
            title: "Need More Vegetarian Options in Cafeteria".to_owned(),
            description: "There are very limited vegetarian food options available in the \
                          main cafeteria. Could we please have more variety?"
                .to_owned(),
            category: Category::Services,
            status: Status::Resolved,
            is_anonymous: false,
            user_id: UserId::new("3"),
            user_name: Some("Jane Smith".to_owned()),
            created_at: days_ago(now, 14),
            updated_at: days_ago(now, 1),
            attachments: Vec::new(),
            comments: vec![
                admin_comment(
                    "102",
                    "Thank you for your feedback. We have added 5 new vegetarian options to \
                     the weekly menu rotation.",
                    days_ago(now, 7),
                ),
                Comment {
                    id: CommentId::new("103"),
                    text: "Thank you! The new options are great.".to_owned(),
                    user_id: UserId::new("3"),
                    user_name: "Jane Smith".to_owned(),
                    role: Role::Student,
                    created_at: days_ago(now, 5),
                },
            ],
        },
        FeedbackItem {
            id: FeedbackId::new("3"),
            title: "Library Closing Too Early".to_owned(),
            description: "The library has been closing at 8 PM, but many students need to \
                          study later, especially during exam period."
                .to_owned(),
            category: Category::Academics,
            status: Status::Pending,
            is_anonymous: true,
            user_id: UserId::new("4"),
            user_name: None,
            created_at: days_ago(now, 2),
            updated_at: days_ago(now, 2),
            attachments: Vec::new(),
            comments: Vec::new(),
        },
    ]
}
