//! ActivitySource - news posts merged with random-user events.
//!
//! Both requests go out together. The merge is fixed (news first, then users)
//! so the feed never depends on which response arrives first.

use std::sync::Arc;

use async_trait::async_trait;

use super::{DataSource, decode};
use crate::domain::activity::{
    self, ActivityItem, FEED_LEN, Post, RandomUserResponse, USER_COUNT,
};
use crate::domain::FetchError;
use crate::ports::{JsonFetcher, RandomSource};

pub struct ActivitySource {
    posts_url: String,
    users_url: String,
    fetcher: Arc<dyn JsonFetcher>,
    rng: Arc<dyn RandomSource>,
}

impl ActivitySource {
    pub fn new(
        posts_endpoint: &str,
        users_endpoint: &str,
        fetcher: Arc<dyn JsonFetcher>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            posts_url: format!("{posts_endpoint}?_limit={FEED_LEN}"),
            users_url: format!("{users_endpoint}?results={USER_COUNT}"),
            fetcher,
            rng,
        }
    }

    async fn fetch_news(&self) -> Result<Vec<ActivityItem>, FetchError> {
        let body = self.fetcher.get_json(&self.posts_url).await?;
        let posts: Vec<Post> = decode(body)?;
        Ok(activity::news_items(&posts))
    }

    async fn fetch_users(&self) -> Result<Vec<ActivityItem>, FetchError> {
        let body = self.fetcher.get_json(&self.users_url).await?;
        let response: RandomUserResponse = decode(body)?;
        let minutes: Vec<u32> = (0..response.results.len())
            .map(|_| self.rng.range_i64(0, 60) as u32)
            .collect();
        Ok(activity::user_items(&response.results, &minutes))
    }
}

#[async_trait]
impl DataSource for ActivitySource {
    type Output = Vec<ActivityItem>;

    fn name(&self) -> &'static str {
        "activity"
    }

    async fn fetch_live(&self) -> Result<Vec<ActivityItem>, FetchError> {
        let (news, users) = tokio::join!(self.fetch_news(), self.fetch_users());
        let news = news?;
        let users = match users {
            Ok(users) => Some(users),
            Err(err) => {
                // ユーザー側だけの失敗はニュースをそのまま使う
                tracing::warn!(event = "source.partial", source = "activity.users", error = %err);
                None
            }
        };
        Ok(activity::merge_feed(news, users))
    }

    fn fallback(&self) -> Vec<ActivityItem> {
        activity::fallback_feed()
    }
}
