//! PostgreSQL-backed `StartupRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use url::Url;

use crate::domain::ports::{StartupRepository, StartupRepositoryError};
use crate::domain::{
    ArrRange, FundingStage, Startup, StartupId, StartupOrder, StartupProfile, StartupQuery, UserId,
};

use super::diesel_error_mapping::{self, counter, is_unique_violation, score};
use super::models::{NewStartupRow, StartupProfileColumns, StartupRow};
use super::pool::{DbPool, PoolError};
use super::schema::startups;

#[derive(Clone)]
pub struct DieselStartupRepository {
    pool: DbPool,
}

impl DieselStartupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StartupRepositoryError {
    diesel_error_mapping::map_pool_error(error, StartupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StartupRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        StartupRepositoryError::query,
        StartupRepositoryError::connection,
    )
}

/// Escape `LIKE` metacharacters and wrap the term for a substring match.
diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Lower-cased industry filter values, matched against `lower(industry)`.
fn industry_keys(industries: &[String]) -> Vec<String> {
    industries
        .iter()
        .map(|industry| industry.trim().to_lowercase())
        .collect()
}

pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn parse_url(column: &str, raw: Option<String>) -> Result<Option<Url>, StartupRepositoryError> {
    raw.map(|value| {
        Url::parse(&value)
            .map_err(|err| StartupRepositoryError::query(format!("stored {column} is invalid: {err}")))
    })
    .transpose()
}

pub(crate) fn profile_columns(profile: &StartupProfile) -> StartupProfileColumns<'_> {
    StartupProfileColumns {
        name: &profile.name,
        tagline: profile.tagline.as_deref(),
        description: profile.description.as_deref(),
        industry: &profile.industry,
        stage: profile.stage.as_str(),
        arr_range: profile.arr_range.map(ArrRange::as_str),
        team_size: profile
            .team_size
            .map(|size| i32::try_from(size).unwrap_or(i32::MAX)),
        founded_year: profile.founded_year,
        headquarters: profile.headquarters.as_deref(),
        website: profile.website.as_ref().map(Url::as_str),
        logo_url: profile.logo_url.as_ref().map(Url::as_str),
        technologies: &profile.technologies,
        features: &profile.features,
    }
}

pub(crate) fn row_to_startup(row: StartupRow) -> Result<Startup, StartupRepositoryError> {
    let stage = row
        .stage
        .parse::<FundingStage>()
        .map_err(|value| StartupRepositoryError::query(format!("unknown stored stage {value}")))?;
    let arr_range = row
        .arr_range
        .map(|value| value.parse::<ArrRange>())
        .transpose()
        .map_err(|value| StartupRepositoryError::query(format!("unknown stored arr range {value}")))?;
    Ok(Startup {
        id: StartupId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        profile: StartupProfile {
            name: row.name,
            tagline: row.tagline,
            description: row.description,
            industry: row.industry,
            stage,
            arr_range,
            team_size: row.team_size.and_then(|size| u32::try_from(size).ok()),
            founded_year: row.founded_year,
            headquarters: row.headquarters,
            website: parse_url("website", row.website)?,
            logo_url: parse_url("logo_url", row.logo_url)?,
            technologies: row.technologies,
            features: row.features,
        },
        credibility_score: score(row.credibility_score),
        total_upvotes: counter(row.total_upvotes),
        total_reviews: counter(row.total_reviews),
        is_verified: row.is_verified,
        created_at: row.created_at,
    })
}

fn rows_to_startups(rows: Vec<StartupRow>) -> Result<Vec<Startup>, StartupRepositoryError> {
    rows.into_iter().map(row_to_startup).collect()
}

#[async_trait]
impl StartupRepository for DieselStartupRepository {
    async fn find_by_id(&self, id: &StartupId) -> Result<Option<Startup>, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = startups::table
            .filter(startups::id.eq(id.as_uuid()))
            .select(StartupRow::as_select())
            .first::<StartupRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_startup).transpose()
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Startup>, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = startups::table
            .filter(startups::owner_id.eq(owner.as_uuid()))
            .select(StartupRow::as_select())
            .first::<StartupRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_startup).transpose()
    }

    async fn insert(&self, startup: &Startup) -> Result<(), StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewStartupRow {
            id: *startup.id.as_uuid(),
            owner_id: *startup.owner_id.as_uuid(),
            profile: profile_columns(&startup.profile),
            credibility_score: i16::from(startup.credibility_score),
            total_upvotes: i32::try_from(startup.total_upvotes).unwrap_or(i32::MAX),
            total_reviews: i32::try_from(startup.total_reviews).unwrap_or(i32::MAX),
            is_verified: startup.is_verified,
            created_at: startup.created_at,
        };
        diesel::insert_into(startups::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StartupRepositoryError::conflict(startup.owner_id.to_string())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn update_profile(
        &self,
        id: &StartupId,
        profile: &StartupProfile,
    ) -> Result<Option<Startup>, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(startups::table.filter(startups::id.eq(id.as_uuid())))
            .set(&profile_columns(profile))
            .returning(StartupRow::as_returning())
            .get_result::<StartupRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_startup).transpose()
    }

    async fn delete(&self, id: &StartupId) -> Result<bool, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(startups::table.filter(startups::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn search(&self, query: &StartupQuery) -> Result<Vec<Startup>, StartupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut sql = startups::table
            .select(StartupRow::as_select())
            .into_boxed();

        if let Some(text) = &query.text {
            let pattern = like_pattern(text);
            sql = sql.filter(
                startups::name
                    .ilike(pattern.clone())
                    .or(startups::tagline.ilike(pattern.clone()))
                    .or(startups::description.ilike(pattern)),
            );
        }
        if !query.industries.is_empty() {
            sql = sql.filter(lower(startups::industry).eq_any(industry_keys(&query.industries)));
        }
        if !query.stages.is_empty() {
            let stages: Vec<String> = query
                .stages
                .iter()
                .map(|stage| stage.as_str().to_owned())
                .collect();
            sql = sql.filter(startups::stage.eq_any(stages));
        }
        if let Some(min_score) = query.min_score {
            sql = sql.filter(startups::credibility_score.ge(i16::from(min_score)));
        }
        if query.verified_only {
            sql = sql.filter(startups::is_verified.eq(true));
        }
        sql = match query.order {
            StartupOrder::Credibility => {
                sql.order((startups::credibility_score.desc(), startups::created_at.desc()))
            }
            StartupOrder::Upvotes => {
                sql.order((startups::total_upvotes.desc(), startups::created_at.desc()))
            }
            StartupOrder::Newest => sql.order(startups::created_at.desc()),
            StartupOrder::Name => sql.order(startups::name.asc()),
        };

        let rows = sql
            .limit(i64::from(query.limit))
            .load::<StartupRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_startups(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(stage: &str, website: Option<&str>) -> StartupRow {
        StartupRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Quantum Ledger".into(),
            tagline: None,
            description: None,
            industry: "fintech".into(),
            stage: stage.into(),
            arr_range: Some("1m_5m".into()),
            team_size: Some(-4),
            founded_year: Some(2021),
            headquarters: None,
            website: website.map(str::to_owned),
            logo_url: None,
            technologies: vec!["rust".into()],
            features: Vec::new(),
            credibility_score: 64,
            total_upvotes: 12,
            total_reviews: 3,
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("plain", "%plain%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_patterns_escape_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(term), expected);
    }

    #[rstest]
    fn industry_filters_ignore_case() {
        let keys = industry_keys(&["AI".to_owned(), " FinTech ".to_owned()]);
        assert_eq!(keys, vec!["ai".to_owned(), "fintech".to_owned()]);

        let query = startups::table
            .select(startups::id)
            .filter(lower(startups::industry).eq_any(keys));
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&query).to_string();
        assert!(sql.contains(r#"lower("startups"."industry")"#), "{sql}");
    }

    #[rstest]
    fn rows_round_trip_through_columns() {
        let startup = row_to_startup(row("series_a", Some("https://ledger.example.com/")))
            .expect("valid row");
        assert_eq!(startup.profile.stage, FundingStage::SeriesA);
        assert_eq!(startup.profile.team_size, None);
        assert_eq!(startup.credibility_score, 64);

        let columns = profile_columns(&startup.profile);
        assert_eq!(columns.stage, "series_a");
        assert_eq!(columns.website, Some("https://ledger.example.com/"));
    }

    #[rstest]
    fn unknown_stages_are_query_errors() {
        let err = row_to_startup(row("ipo", None)).expect_err("bad stage");
        assert!(matches!(err, StartupRepositoryError::Query { .. }));
    }
}
