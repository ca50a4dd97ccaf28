//! PostgreSQL-backed `MatchRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MatchRepository, MatchRepositoryError};
use crate::domain::{EnterpriseId, Match, MatchId, MatchScore, MatchStatus, StartupId};

use super::diesel_error_mapping;
use super::models::MatchRow;
use super::pool::{DbPool, PoolError};
use super::schema::matches;

#[derive(Clone)]
pub struct DieselMatchRepository {
    pool: DbPool,
}

impl DieselMatchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MatchRepositoryError {
    diesel_error_mapping::map_pool_error(error, MatchRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MatchRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        MatchRepositoryError::query,
        MatchRepositoryError::connection,
    )
}

fn row_to_match(row: MatchRow) -> Result<Match, MatchRepositoryError> {
    let status = row
        .status
        .parse::<MatchStatus>()
        .map_err(|value| MatchRepositoryError::query(format!("unknown stored match status {value}")))?;
    Ok(Match {
        id: MatchId::from_uuid(row.id),
        startup_id: StartupId::from_uuid(row.startup_id),
        enterprise_id: EnterpriseId::from_uuid(row.enterprise_id),
        match_score: MatchScore::saturating(i64::from(row.match_score)),
        status,
        created_at: row.created_at,
    })
}

#[async_trait]
impl MatchRepository for DieselMatchRepository {
    async fn list_for(
        &self,
        startup_id: Option<StartupId>,
        enterprise_id: Option<EnterpriseId>,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = matches::table.select(MatchRow::as_select()).into_boxed();
        query = match (startup_id, enterprise_id) {
            (Some(s), Some(e)) => query.filter(
                matches::startup_id
                    .eq(*s.as_uuid())
                    .or(matches::enterprise_id.eq(*e.as_uuid())),
            ),
            (Some(s), None) => query.filter(matches::startup_id.eq(*s.as_uuid())),
            (None, Some(e)) => query.filter(matches::enterprise_id.eq(*e.as_uuid())),
            (None, None) => return Ok(Vec::new()),
        };
        let rows = query
            .order((matches::match_score.desc(), matches::created_at.desc()))
            .load::<MatchRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_match).collect()
    }

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = matches::table
            .filter(matches::id.eq(id.as_uuid()))
            .select(MatchRow::as_select())
            .first::<MatchRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_match).transpose()
    }

    async fn set_status(
        &self,
        id: &MatchId,
        status: MatchStatus,
    ) -> Result<Option<Match>, MatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(matches::table.filter(matches::id.eq(id.as_uuid())))
            .set(matches::status.eq(status.as_str()))
            .returning(MatchRow::as_returning())
            .get_result::<MatchRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_match).transpose()
    }
}
