use crate::{
    db::{dao::TopicDao, entities::topic},
    error::AppError,
};

#[derive(Clone)]
pub struct TopicService {
    topic_dao: TopicDao,
}

impl TopicService {
    pub fn new(topic_dao: TopicDao) -> Self {
        Self { topic_dao }
    }

    /// Choices for the topic selector on the note form.
    pub async fn list_topics(&self) -> Result<Vec<topic::Model>, AppError> {
        Ok(self.topic_dao.list_topics().await?)
    }
}
