use sea_orm::DatabaseConnection;
use tracing::info;

use super::dao::{DaoBase, DaoResult, TopicDao};
use super::entities::topic;

/// Topics every installation starts with. New notes are filed under the
/// first entry.
pub const DEFAULT_TOPICS: [&str; 4] = ["Work", "School", "Admin", "Other"];

/// Idempotent: topics that already exist are reused, so running this on
/// every startup never duplicates rows.
pub async fn seed_topics(db: &DatabaseConnection) -> DaoResult<Vec<topic::Model>> {
    let dao = TopicDao::new(db);
    let mut topics = Vec::with_capacity(DEFAULT_TOPICS.len());
    let mut inserted = 0usize;
    for name in DEFAULT_TOPICS {
        let (topic, created) = dao.find_or_create_by_name(name).await?;
        if created {
            inserted += 1;
        }
        topics.push(topic);
    }
    info!(inserted, total = topics.len(), "default topics ready");
    Ok(topics)
}
