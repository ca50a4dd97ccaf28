//! PostgreSQL-backed `LaunchRepository` implementation using Diesel ORM.
//!
//! Counter updates are single `UPDATE ... SET n = n + 1` statements inside
//! one transaction per call.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{LaunchRepository, LaunchRepositoryError};
use crate::domain::{
    CommentBody, CommentId, FullName, Launch, LaunchComment, LaunchContent, LaunchId, PageRequest,
    StartupId, UpvoteToggle, UserId,
};

use super::diesel_error_mapping::{self, counter};
use super::models::{CommentRow, LaunchRow, NewUpvoteRow};
use super::pool::{DbPool, PoolError};
use super::schema::{launch_comments, launches, startups, upvotes, users};

#[derive(Clone)]
pub struct DieselLaunchRepository {
    pool: DbPool,
}

impl DieselLaunchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LaunchRepositoryError {
    diesel_error_mapping::map_pool_error(error, LaunchRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LaunchRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        LaunchRepositoryError::query,
        LaunchRepositoryError::connection,
    )
}

fn row_to_launch(row: LaunchRow) -> Result<Launch, LaunchRepositoryError> {
    let product_url = row
        .product_url
        .map(|raw| {
            Url::parse(&raw)
                .map_err(|err| LaunchRepositoryError::query(format!("invalid stored product url: {err}")))
        })
        .transpose()?;
    Ok(Launch {
        id: LaunchId::from_uuid(row.id),
        startup_id: StartupId::from_uuid(row.startup_id),
        content: LaunchContent {
            title: row.title,
            tagline: row.tagline,
            description: row.description,
            product_url,
        },
        upvote_count: counter(row.upvote_count),
        comment_count: counter(row.comment_count),
        view_count: counter(row.view_count),
        created_at: row.created_at,
    })
}

fn launch_to_row(launch: &Launch) -> LaunchRow {
    LaunchRow {
        id: *launch.id.as_uuid(),
        startup_id: *launch.startup_id.as_uuid(),
        title: launch.content.title.clone(),
        tagline: launch.content.tagline.clone(),
        description: launch.content.description.clone(),
        product_url: launch.content.product_url.as_ref().map(|url| url.to_string()),
        upvote_count: i32::try_from(launch.upvote_count).unwrap_or(i32::MAX),
        comment_count: i32::try_from(launch.comment_count).unwrap_or(i32::MAX),
        view_count: i32::try_from(launch.view_count).unwrap_or(i32::MAX),
        created_at: launch.created_at,
    }
}

fn row_to_comment(
    row: CommentRow,
    author_name: Option<String>,
) -> Result<LaunchComment, LaunchRepositoryError> {
    let content = CommentBody::new(&row.content)
        .map_err(|err| LaunchRepositoryError::query(format!("invalid stored comment: {err}")))?;
    Ok(LaunchComment {
        id: CommentId::from_uuid(row.id),
        launch_id: LaunchId::from_uuid(row.launch_id),
        author_id: UserId::from_uuid(row.author_id),
        // Names that no longer validate are shown as anonymous.
        author_name: author_name.and_then(|name| FullName::new(name).ok()),
        content,
        created_at: row.created_at,
    })
}

fn page_bounds(page: &PageRequest) -> (i64, i64) {
    (i64::from(page.limit), i64::from(page.offset))
}

#[async_trait]
impl LaunchRepository for DieselLaunchRepository {
    async fn list(&self, page: &PageRequest) -> Result<Vec<Launch>, LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = page_bounds(page);
        let rows = launches::table
            .order((launches::created_at.desc(), launches::id.desc()))
            .limit(limit)
            .offset(offset)
            .select(LaunchRow::as_select())
            .load::<LaunchRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_launch).collect()
    }

    async fn list_for_startup(&self, startup_id: &StartupId) -> Result<Vec<Launch>, LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = launches::table
            .filter(launches::startup_id.eq(startup_id.as_uuid()))
            .order(launches::created_at.desc())
            .select(LaunchRow::as_select())
            .load::<LaunchRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_launch).collect()
    }

    async fn find_by_id(&self, id: &LaunchId) -> Result<Option<Launch>, LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = launches::table
            .filter(launches::id.eq(id.as_uuid()))
            .select(LaunchRow::as_select())
            .first::<LaunchRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_launch).transpose()
    }

    async fn record_view(&self, id: &LaunchId) -> Result<Option<Launch>, LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(launches::table.filter(launches::id.eq(id.as_uuid())))
            .set(launches::view_count.eq(launches::view_count + 1))
            .returning(LaunchRow::as_returning())
            .get_result::<LaunchRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_launch).transpose()
    }

    async fn insert(&self, launch: &Launch) -> Result<(), LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(launches::table)
            .values(&launch_to_row(launch))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn toggle_upvote(
        &self,
        id: &LaunchId,
        user_id: &UserId,
    ) -> Result<Option<UpvoteToggle>, LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let launch_id = *id.as_uuid();
        let voter = *user_id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let startup_id = launches::table
                    .filter(launches::id.eq(launch_id))
                    .select(launches::startup_id)
                    .first::<Uuid>(conn)
                    .await
                    .optional()?;
                let Some(startup_id) = startup_id else {
                    return Ok(None);
                };

                let removed = diesel::delete(
                    upvotes::table.filter(
                        upvotes::launch_id
                            .eq(launch_id)
                            .and(upvotes::user_id.eq(voter)),
                    ),
                )
                .execute(conn)
                .await?;
                let delta: i32 = if removed > 0 {
                    -1
                } else {
                    diesel::insert_into(upvotes::table)
                        .values(&NewUpvoteRow {
                            launch_id,
                            user_id: voter,
                        })
                        .execute(conn)
                        .await?;
                    1
                };

                let upvote_count = diesel::update(launches::table.filter(launches::id.eq(launch_id)))
                    .set(launches::upvote_count.eq(launches::upvote_count + delta))
                    .returning(launches::upvote_count)
                    .get_result::<i32>(conn)
                    .await?;
                diesel::update(startups::table.filter(startups::id.eq(startup_id)))
                    .set(startups::total_upvotes.eq(startups::total_upvotes + delta))
                    .execute(conn)
                    .await?;

                Ok(Some(UpvoteToggle {
                    upvoted: delta > 0,
                    upvote_count: counter(upvote_count),
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_comments(
        &self,
        id: &LaunchId,
        page: &PageRequest,
    ) -> Result<Vec<LaunchComment>, LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = page_bounds(page);
        let rows = launch_comments::table
            .left_join(users::table.on(users::id.eq(launch_comments::author_id)))
            .filter(launch_comments::launch_id.eq(id.as_uuid()))
            .order((launch_comments::created_at.asc(), launch_comments::id.asc()))
            .limit(limit)
            .offset(offset)
            .select((CommentRow::as_select(), users::full_name.nullable()))
            .load::<(CommentRow, Option<String>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, name)| row_to_comment(row, name))
            .collect()
    }

    async fn add_comment(&self, comment: &LaunchComment) -> Result<(), LaunchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CommentRow {
            id: *comment.id.as_uuid(),
            launch_id: *comment.launch_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            content: comment.content.as_ref().to_owned(),
            created_at: comment.created_at,
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(launch_comments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(launches::table.filter(launches::id.eq(row.launch_id)))
                    .set(launches::comment_count.eq(launches::comment_count + 1))
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
