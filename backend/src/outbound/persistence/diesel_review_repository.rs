//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{
    EnterpriseId, FullName, PageRequest, Rating, RatingSummary, Review, ReviewContent, ReviewId,
    StartupId, UserId,
};

use super::diesel_error_mapping;
use super::models::ReviewRow;
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, startups, users};

#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    diesel_error_mapping::map_pool_error(error, ReviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn stored_rating(value: i16) -> Result<Rating, ReviewRepositoryError> {
    Rating::new(i64::from(value))
        .map_err(|err| ReviewRepositoryError::query(format!("invalid stored rating: {err}")))
}

fn row_to_review(row: ReviewRow, author_name: Option<String>) -> Result<Review, ReviewRepositoryError> {
    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        startup_id: StartupId::from_uuid(row.startup_id),
        author_id: UserId::from_uuid(row.author_id),
        author_name: author_name.and_then(|name| FullName::new(name).ok()),
        enterprise_id: row.enterprise_id.map(EnterpriseId::from_uuid),
        content: ReviewContent {
            rating: stored_rating(row.rating)?,
            title: row.title,
            content: row.content,
            pros: row.pros,
            cons: row.cons,
        },
        created_at: row.created_at,
    })
}

fn review_to_row(review: &Review) -> ReviewRow {
    ReviewRow {
        id: *review.id.as_uuid(),
        startup_id: *review.startup_id.as_uuid(),
        author_id: *review.author_id.as_uuid(),
        enterprise_id: review.enterprise_id.map(|id| *id.as_uuid()),
        rating: i16::from(review.content.rating.value()),
        title: review.content.title.clone(),
        content: review.content.content.clone(),
        pros: review.content.pros.clone(),
        cons: review.content.cons.clone(),
        created_at: review.created_at,
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list_for_startup(
        &self,
        startup_id: &StartupId,
        page: &PageRequest,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .left_join(users::table.on(users::id.eq(reviews::author_id)))
            .filter(reviews::startup_id.eq(startup_id.as_uuid()))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .limit(i64::from(page.limit))
            .offset(i64::from(page.offset))
            .select((ReviewRow::as_select(), users::full_name.nullable()))
            .load::<(ReviewRow, Option<String>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, name)| row_to_review(row, name))
            .collect()
    }

    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = review_to_row(review);
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(reviews::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(startups::table.filter(startups::id.eq(row.startup_id)))
                    .set(startups::total_reviews.eq(startups::total_reviews + 1))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn summaries(
        &self,
        startup_ids: &[StartupId],
    ) -> Result<HashMap<StartupId, RatingSummary>, ReviewRepositoryError> {
        if startup_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = startup_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = reviews::table
            .filter(reviews::startup_id.eq_any(ids))
            .select((reviews::startup_id, reviews::rating))
            .load::<(Uuid, i16)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ratings = rows
            .into_iter()
            .map(|(id, rating)| stored_rating(rating).map(|r| (StartupId::from_uuid(id), r)))
            .collect::<Result<Vec<_>, ReviewRepositoryError>>()?;
        Ok(RatingSummary::aggregate(&ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn out_of_range_stored_ratings_are_rejected() {
        let row = ReviewRow {
            id: Uuid::new_v4(),
            startup_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            enterprise_id: None,
            rating: 7,
            title: "Great".into(),
            content: "Great product overall.".into(),
            pros: Vec::new(),
            cons: Vec::new(),
            created_at: Utc::now(),
        };
        assert!(row_to_review(row, None).is_err());
    }
}
