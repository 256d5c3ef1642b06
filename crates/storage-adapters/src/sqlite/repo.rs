//! `UserRepo` and `AdRepo` for [`SqliteStore`].

use async_trait::async_trait;
use domains::{Ad, AdRepo, DomainError, ListQuery, ListedAd, Result, User, UserRepo};
use sqlx::Row;

use super::plan::AdQueryPlan;
use super::{map_sqlx, SqliteStore};

#[async_trait]
impl UserRepo for SqliteStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match map_sqlx(e) {
            DomainError::Conflict(_) => {
                DomainError::Conflict(format!("username {:?} is already taken", user.username))
            }
            other => other,
        })?;
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?
        .ok_or_else(|| DomainError::NotFound("user".into(), username.to_string()))?;

        Ok(User {
            id: row.try_get("id").map_err(map_sqlx)?,
            username: row.try_get("username").map_err(map_sqlx)?,
            password_hash: row.try_get("password_hash").map_err(map_sqlx)?,
            created_at: row.try_get("created_at").map_err(map_sqlx)?,
        })
    }
}

#[async_trait]
impl AdRepo for SqliteStore {
    async fn create_ad(&self, ad: &Ad) -> Result<()> {
        sqlx::query(
            "INSERT INTO ads (id, user_id, title, text, image_url, price, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(ad.id)
        .bind(ad.user_id)
        .bind(&ad.title)
        .bind(&ad.text)
        .bind(&ad.image_url)
        .bind(ad.price)
        .bind(ad.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn list_ads(&self, query: &ListQuery) -> Result<Vec<ListedAd>> {
        let plan = AdQueryPlan::compile(query)?;
        let rows = sqlx::query(plan.sql)
            .bind(plan.price_min)
            .bind(plan.price_max)
            .bind(plan.limit)
            .bind(plan.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| -> std::result::Result<ListedAd, sqlx::Error> {
                Ok(ListedAd {
                    id: row.try_get("id")?,
                    owner_id: row.try_get("user_id")?,
                    owner_username: row.try_get("username")?,
                    title: row.try_get("title")?,
                    text: row.try_get("text")?,
                    image_url: row.try_get("image_url")?,
                    price: row.try_get("price")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(map_sqlx)
    }
}
