use anyhow::Result;

use crate::{
    infrastructure::database::DbPoolManager,
    models::{AssociationProfile, Slug},
    repository,
};

pub async fn fetch_active(db: &DbPoolManager, slug: &str) -> Result<Option<Slug>> {
    let slug = sqlx::query_as::<_, Slug>(
        "select id, slug, association_id, is_active, created_at, updated_at
         from slugs where slug = ? and is_active = true",
    )
    .bind(slug.trim().to_lowercase())
    .fetch_optional(db.as_ref())
    .await?;

    Ok(slug)
}

/// Everything the public landing page shows for `slug`.
pub async fn fetch_profile(db: &DbPoolManager, slug: &str) -> Result<Option<AssociationProfile>> {
    let Some(slug) = fetch_active(db, slug).await? else {
        return Ok(None);
    };

    let Some(association) = repository::association::fetch_by_id(db, slug.association_id).await?
    else {
        return Ok(None);
    };

    let total_players = repository::player::count_active(db).await?;

    Ok(Some(AssociationProfile {
        association,
        slug: slug.slug,
        total_players,
    }))
}

pub async fn insert_if_missing(db: &DbPoolManager, slug: &str, association_id: u64) -> Result<()> {
    sqlx::query("insert ignore into slugs (slug, association_id) values (?, ?)")
        .bind(slug.trim().to_lowercase())
        .bind(association_id)
        .execute(db.as_ref())
        .await?;

    Ok(())
}
