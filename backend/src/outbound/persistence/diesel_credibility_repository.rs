//! PostgreSQL-backed `CredibilityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CredibilityRepository, CredibilityRepositoryError, LaunchEngagement};
use crate::domain::{CredibilityBreakdown, CredibilityInputs, StartupId};

use super::diesel_error_mapping::{self, counter};
use super::models::CredibilityScoreRow;
use super::pool::{DbPool, PoolError};
use super::schema::{credibility_scores, launches, startups};

#[derive(Clone)]
pub struct DieselCredibilityRepository {
    pool: DbPool,
}

impl DieselCredibilityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CredibilityRepositoryError {
    diesel_error_mapping::map_pool_error(error, CredibilityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CredibilityRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        CredibilityRepositoryError::query,
        CredibilityRepositoryError::connection,
    )
}

fn row_to_breakdown(row: CredibilityScoreRow) -> CredibilityBreakdown {
    let inputs = CredibilityInputs::new(
        i64::from(row.reviews_score),
        i64::from(row.verification_score),
        i64::from(row.engagement_score),
        i64::from(row.longevity_score),
    );
    // The stored overall is authoritative; the inputs are for display.
    CredibilityBreakdown {
        startup_id: StartupId::from_uuid(row.startup_id),
        inputs,
        overall: diesel_error_mapping::score(row.overall_score),
        computed_at: row.computed_at,
    }
}

fn sum_engagement(rows: &[(i32, i32, i32)]) -> LaunchEngagement {
    rows.iter().fold(
        LaunchEngagement::default(),
        |acc, &(upvotes, comments, views)| LaunchEngagement {
            upvotes: acc.upvotes.saturating_add(counter(upvotes)),
            comments: acc.comments.saturating_add(counter(comments)),
            views: acc.views.saturating_add(counter(views)),
        },
    )
}

#[async_trait]
impl CredibilityRepository for DieselCredibilityRepository {
    async fn engagement(&self, startup_id: &StartupId) -> Result<LaunchEngagement, CredibilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = launches::table
            .filter(launches::startup_id.eq(startup_id.as_uuid()))
            .select((
                launches::upvote_count,
                launches::comment_count,
                launches::view_count,
            ))
            .load::<(i32, i32, i32)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(sum_engagement(&rows))
    }

    async fn latest(
        &self,
        startup_id: &StartupId,
    ) -> Result<Option<CredibilityBreakdown>, CredibilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = credibility_scores::table
            .filter(credibility_scores::startup_id.eq(startup_id.as_uuid()))
            .order(credibility_scores::computed_at.desc())
            .select(CredibilityScoreRow::as_select())
            .first::<CredibilityScoreRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_breakdown))
    }

    async fn save(&self, breakdown: &CredibilityBreakdown) -> Result<(), CredibilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CredibilityScoreRow {
            id: Uuid::new_v4(),
            startup_id: *breakdown.startup_id.as_uuid(),
            reviews_score: i16::from(breakdown.inputs.reviews),
            verification_score: i16::from(breakdown.inputs.verification),
            engagement_score: i16::from(breakdown.inputs.engagement),
            longevity_score: i16::from(breakdown.inputs.longevity),
            overall_score: i16::from(breakdown.overall),
            computed_at: breakdown.computed_at,
        };
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(credibility_scores::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(startups::table.filter(startups::id.eq(row.startup_id)))
                    .set(startups::credibility_score.eq(row.overall_score))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn engagement_sums_every_launch() {
        let total = sum_engagement(&[(3, 1, 40), (2, 0, 10), (-1, 0, 0)]);
        assert_eq!(
            total,
            LaunchEngagement {
                upvotes: 5,
                comments: 1,
                views: 50,
            }
        );
    }

    #[rstest]
    fn stored_rows_keep_their_overall() {
        let row = CredibilityScoreRow {
            id: Uuid::new_v4(),
            startup_id: Uuid::new_v4(),
            reviews_score: 80,
            verification_score: 100,
            engagement_score: 60,
            longevity_score: 40,
            overall_score: 74,
            computed_at: Utc::now(),
        };
        assert_eq!(row_to_breakdown(row).overall, 74);
    }
}
