//! Activity feed model (news posts + user events).

use serde::{Deserialize, Serialize};

/// Items shown in the feed.
pub const FEED_LEN: usize = 5;

/// News items kept when user activity is merged in.
pub const NEWS_KEPT_ON_MERGE: usize = 2;

/// Users requested from the random-user endpoint.
pub const USER_COUNT: usize = 3;

const TITLE_CHARS: usize = 40;
const NEWS_ICONS: [&str; FEED_LEN] = ["newspaper", "trending-up", "users", "activity", "star"];
const USER_ACTIONS: [&str; USER_COUNT] = ["registered", "updated profile", "made purchase"];
const USER_ICONS: [&str; USER_COUNT] = ["user-plus", "user-check", "shopping-bag"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    pub title: String,
    pub time: String,
    pub icon: String,
}

impl ActivityItem {
    fn new(id: impl Into<String>, title: impl Into<String>, time: impl Into<String>, icon: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: time.into(),
            icon: icon.to_string(),
        }
    }
}

/// One record of the posts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RandomUser {
    pub name: PersonName,
}

/// `{results: [{name: {first, last}}]}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RandomUserResponse {
    pub results: Vec<RandomUser>,
}

/// First 40 characters, first one upper-cased, followed by `...`.
pub fn headline(title: &str) -> String {
    let mut chars = title.chars().take(TITLE_CHARS);
    let mut out = String::with_capacity(TITLE_CHARS + 3);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.extend(chars);
    out.push_str("...");
    out
}

/// Turn the first [`FEED_LEN`] posts into feed items.
pub fn news_items(posts: &[Post]) -> Vec<ActivityItem> {
    posts
        .iter()
        .take(FEED_LEN)
        .zip(NEWS_ICONS)
        .enumerate()
        .map(|(index, (post, icon))| {
            ActivityItem::new(
                post.id.to_string(),
                headline(&post.title),
                format!("{} minutes ago", (index + 1) * 5),
                icon,
            )
        })
        .collect()
}

/// Turn random users into feed items. `minutes_ago[i]` is the synthetic age of
/// the i-th event.
pub fn user_items(users: &[RandomUser], minutes_ago: &[u32]) -> Vec<ActivityItem> {
    users
        .iter()
        .zip(USER_ACTIONS.iter().zip(USER_ICONS))
        .zip(minutes_ago)
        .enumerate()
        .map(|(index, ((user, (action, icon)), minutes))| {
            ActivityItem::new(
                format!("user_{index}"),
                format!("{} {} {}", user.name.first, user.name.last, action),
                format!("{minutes} minutes ago"),
                icon,
            )
        })
        .collect()
}

/// News first, then users.
///
/// The result only depends on the two inputs, never on which request finished
/// first. Without user items the news list is returned as is.
pub fn merge_feed(news: Vec<ActivityItem>, users: Option<Vec<ActivityItem>>) -> Vec<ActivityItem> {
    match users {
        Some(users) if !users.is_empty() => news
            .into_iter()
            .take(NEWS_KEPT_ON_MERGE)
            .chain(users)
            .collect(),
        _ => news,
    }
}

/// Fixed feed used when the posts endpoint is unavailable.
pub fn fallback_feed() -> Vec<ActivityItem> {
    vec![
        ActivityItem::new("1", "New order received from John Doe", "2 minutes ago", "shopping-bag"),
        ActivityItem::new("2", "User Sarah Smith registered", "15 minutes ago", "user-plus"),
        ActivityItem::new("3", "Payment processed successfully", "1 hour ago", "credit-card"),
        ActivityItem::new("4", "New product added to catalog", "2 hours ago", "package"),
        ActivityItem::new("5", "System backup completed", "4 hours ago", "hard-drive"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64, title: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
        }
    }

    fn user(first: &str, last: &str) -> RandomUser {
        RandomUser {
            name: PersonName {
                first: first.to_string(),
                last: last.to_string(),
            },
        }
    }

    #[test]
    fn headline_truncates_long_titles() {
        let title = "abcdefghij".repeat(6);
        let h = headline(&title);
        assert_eq!(h.chars().count(), 1 + 39 + 3);
        assert!(h.starts_with("Abcdefghij"));
        assert!(h.ends_with("..."));
    }

    #[test]
    fn headline_keeps_short_titles_whole() {
        assert_eq!(headline("sunt aut facere"), "Sunt aut facere...");
        assert_eq!(headline(""), "...");
    }

    #[test]
    fn headline_counts_characters_not_bytes() {
        let title = "é".repeat(50);
        let h = headline(&title);
        assert_eq!(h.chars().count(), 43);
        assert!(h.starts_with('É'));
    }

    #[test]
    fn news_items_assign_icons_and_times_by_position() {
        let posts: Vec<_> = (1..=7).map(|i| post(i, "title")).collect();
        let items = news_items(&posts);
        assert_eq!(items.len(), FEED_LEN);
        assert_eq!(items[0].icon, "newspaper");
        assert_eq!(items[4].icon, "star");
        assert_eq!(items[0].time, "5 minutes ago");
        assert_eq!(items[4].time, "25 minutes ago");
        assert_eq!(items[2].id, "3");
    }

    #[test]
    fn user_items_describe_actions() {
        let users = vec![user("Ada", "Lovelace"), user("Alan", "Turing"), user("Grace", "Hopper")];
        let items = user_items(&users, &[1, 2, 59]);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Ada Lovelace registered");
        assert_eq!(items[1].title, "Alan Turing updated profile");
        assert_eq!(items[2].title, "Grace Hopper made purchase");
        assert_eq!(items[2].icon, "shopping-bag");
        assert_eq!(items[2].time, "59 minutes ago");
        assert_eq!(items[1].id, "user_1");
    }

    #[test]
    fn merge_is_news_first_then_users() {
        let news = news_items(&(1..=5).map(|i| post(i, "n")).collect::<Vec<_>>());
        let users = user_items(&[user("A", "B"), user("C", "D"), user("E", "F")], &[1, 2, 3]);
        let merged = merge_feed(news.clone(), Some(users.clone()));

        assert_eq!(merged.len(), 5);
        assert_eq!(&merged[..2], &news[..2]);
        assert_eq!(&merged[2..], &users[..]);
    }

    #[test]
    fn merge_without_users_keeps_news() {
        let news = fallback_feed();
        assert_eq!(merge_feed(news.clone(), None), news);
        assert_eq!(merge_feed(news.clone(), Some(vec![])), news);
    }

    #[test]
    fn fallback_feed_is_fixed() {
        let feed = fallback_feed();
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].title, "New order received from John Doe");
        assert_eq!(feed[4].icon, "hard-drive");
    }
}
