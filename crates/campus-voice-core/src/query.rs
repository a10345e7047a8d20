//! Dashboard queries: search, filtering, ordering and statistics.
//!
//! All queries are linear scans over a snapshot and never reorder the
//! input unless they say so.

use std::collections::HashMap;

use crate::feedback::{Category, FeedbackItem, Status};
use crate::identity::Identity;
use crate::types::UserId;

/// Search and filter criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub author: Option<UserId>,
}

impl FeedbackFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    pub fn matches(&self, item: &FeedbackItem) -> bool {
        let matches_search = self.search.as_ref().map_or(true, |term| {
            let term = term.to_lowercase();
            item.title.to_lowercase().contains(&term)
                || item.description.to_lowercase().contains(&term)
        });

        matches_search
            && self.category.map_or(true, |c| item.category == c)
            && self.status.map_or(true, |s| item.status == s)
            && self.author.as_ref().map_or(true, |a| &item.user_id == a)
    }

    /// Matching items in their original order.
    pub fn apply<'a>(&self, items: &'a [FeedbackItem]) -> Vec<&'a FeedbackItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Items `viewer` may list: everything for admins, own items for students.
pub fn visible_to<'a>(items: &'a [FeedbackItem], viewer: &Identity) -> Vec<&'a FeedbackItem> {
    items
        .iter()
        .filter(|item| viewer.is_admin() || item.is_authored_by(&viewer.id))
        .collect()
}

/// Newest submissions first, at most `limit`.
pub fn most_recent<'a, I>(items: I, limit: usize) -> Vec<&'a FeedbackItem>
where
    I: IntoIterator<Item = &'a FeedbackItem>,
{
    let mut sorted: Vec<_> = items.into_iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Most recently touched first, at most `limit`.
pub fn recently_updated<'a, I>(items: I, limit: usize) -> Vec<&'a FeedbackItem>
where
    I: IntoIterator<Item = &'a FeedbackItem>,
{
    let mut sorted: Vec<_> = items.into_iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}

/// Items still awaiting resolution.
pub fn open_items<'a, I>(items: I) -> Vec<&'a FeedbackItem>
where
    I: IntoIterator<Item = &'a FeedbackItem>,
{
    items
        .into_iter()
        .filter(|item| item.status != Status::Resolved)
        .collect()
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    /// Per-category counts, largest first. Categories with no items are omitted.
    pub by_category: Vec<(Category, usize)>,
}

impl FeedbackStats {
    pub fn compute<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a FeedbackItem>,
    {
        let mut stats = Self::default();
        let mut categories: HashMap<Category, usize> = HashMap::new();

        for item in items {
            stats.total += 1;
            match item.status {
                Status::Pending => stats.pending += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Resolved => stats.resolved += 1,
            }
            *categories.entry(item.category).or_default() += 1;
        }

        let mut by_category: Vec<_> = categories.into_iter().collect();
        by_category.sort_by(|(ca, na), (cb, nb)| nb.cmp(na).then(ca.cmp(cb)));
        stats.by_category = by_category;
        stats
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::InProgress => self.in_progress,
            Status::Resolved => self.resolved,
        }
    }

    /// Share of resolved items as a whole percentage, rounded half up.
    pub fn resolved_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let scaled = (self.resolved as u64) * 200 + self.total as u64;
        (scaled / (2 * self.total as u64)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackDraft;
    use crate::types::FeedbackId;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, author: &str, category: Category, status: Status, created: i64) -> FeedbackItem {
        let identity = Identity::student(UserId::new(author), "Someone", "someone@campus.com");
        let mut draft = FeedbackDraft::from_author(
            &identity,
            format!("Title {id}"),
            format!("Description of item {id}"),
            category,
            false,
        );
        draft.status = status;
        draft.into_item(FeedbackId::new(id), Utc.timestamp_opt(created, 0).unwrap())
    }

    fn sample() -> Vec<FeedbackItem> {
        vec![
            item("a", "u1", Category::Hostel, Status::Pending, 10),
            item("b", "u2", Category::Hostel, Status::Resolved, 30),
            item("c", "u1", Category::Sports, Status::InProgress, 20),
        ]
    }

    #[test]
    fn test_filter_combines_with_and() {
        let items = sample();
        let filter = FeedbackFilter::new()
            .category(Category::Hostel)
            .status(Status::Pending);
        let ids: Vec<_> = filter.apply(&items).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let items = sample();
        let filter = FeedbackFilter::new().search("TITLE C");
        let ids: Vec<_> = filter.apply(&items).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);

        let filter = FeedbackFilter::new().search("description");
        assert_eq!(filter.apply(&items).len(), 3);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let items = sample();
        assert_eq!(FeedbackFilter::new().search("  ").apply(&items).len(), 3);
    }

    #[test]
    fn test_visible_to() {
        let items = sample();
        let student = Identity::student(UserId::new("u1"), "S", "s@campus.com");
        let admin = Identity::admin(UserId::new("1"), "A", "admin@campus.com");
        assert_eq!(visible_to(&items, &student).len(), 2);
        assert_eq!(visible_to(&items, &admin).len(), 3);
    }

    #[test]
    fn test_most_recent_orders_and_truncates() {
        let items = sample();
        let ids: Vec<_> = most_recent(&items, 2).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_open_items() {
        let items = sample();
        assert_eq!(open_items(&items).len(), 2);
    }

    #[test]
    fn test_stats() {
        let items = sample();
        let stats = FeedbackStats::compute(&items);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(Status::Pending), 1);
        assert_eq!(stats.count(Status::Resolved), 1);
        assert_eq!(
            stats.by_category,
            vec![(Category::Hostel, 2), (Category::Sports, 1)]
        );
        assert_eq!(stats.resolved_percent(), 33);
    }

    #[test]
    fn test_stats_empty() {
        let items: Vec<FeedbackItem> = Vec::new();
        let stats = FeedbackStats::compute(&items);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.resolved_percent(), 0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn test_resolved_percent_rounds() {
        let stats = FeedbackStats {
            total: 3,
            resolved: 2,
            ..Default::default()
        };
        assert_eq!(stats.resolved_percent(), 67);
    }
}
