//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Profile rows keyed by the identity provider's user id.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Varchar,
        avatar_url -> Nullable<Text>,
        /// One of `startup`, `enterprise`, `admin`.
        user_type -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Startup profiles; at most one per owner.
    startups (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        tagline -> Nullable<Varchar>,
        description -> Nullable<Text>,
        industry -> Varchar,
        stage -> Varchar,
        arr_range -> Nullable<Varchar>,
        team_size -> Nullable<Int4>,
        founded_year -> Nullable<Int4>,
        headquarters -> Nullable<Varchar>,
        website -> Nullable<Text>,
        logo_url -> Nullable<Text>,
        technologies -> Array<Text>,
        features -> Array<Text>,
        credibility_score -> Int2,
        total_upvotes -> Int4,
        total_reviews -> Int4,
        is_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enterprise buyer profiles; at most one per owner.
    enterprises (id) {
        id -> Uuid,
        owner_id -> Uuid,
        company_name -> Varchar,
        industry -> Varchar,
        company_size -> Nullable<Varchar>,
        headquarters -> Nullable<Varchar>,
        website -> Nullable<Text>,
        description -> Nullable<Text>,
        preferred_stages -> Array<Text>,
        preferred_industries -> Array<Text>,
        budget_range -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    launches (id) {
        id -> Uuid,
        startup_id -> Uuid,
        title -> Varchar,
        tagline -> Nullable<Varchar>,
        description -> Nullable<Text>,
        product_url -> Nullable<Text>,
        upvote_count -> Int4,
        comment_count -> Int4,
        view_count -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (launch, user) upvote.
    upvotes (launch_id, user_id) {
        launch_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    launch_comments (id) {
        id -> Uuid,
        launch_id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reviews (id) {
        id -> Uuid,
        startup_id -> Uuid,
        author_id -> Uuid,
        enterprise_id -> Nullable<Uuid>,
        rating -> Int2,
        title -> Varchar,
        content -> Text,
        pros -> Array<Text>,
        cons -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    matches (id) {
        id -> Uuid,
        startup_id -> Uuid,
        enterprise_id -> Uuid,
        match_score -> Int2,
        /// One of `pending`, `interested`, `connected`, `declined`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only history of credibility computations.
    credibility_scores (id) {
        id -> Uuid,
        startup_id -> Uuid,
        reviews_score -> Int2,
        verification_score -> Int2,
        engagement_score -> Int2,
        longevity_score -> Int2,
        overall_score -> Int2,
        computed_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    startups,
    enterprises,
    launches,
    upvotes,
    launch_comments,
    reviews,
    matches,
    credibility_scores,
);
