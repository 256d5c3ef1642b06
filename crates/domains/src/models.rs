//! # Domain Models
//!
//! These structs represent the core entities of the marketplace.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Identity of a registered user, as carried by bearer tokens.
pub type UserId = Uuid;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// PHC-format hash; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A classified ad owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ad {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Username/password pair submitted at registration and login.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(DomainError::validation("username and password are required"));
        }
        Ok(())
    }
}

/// Input for creating an ad.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAd {
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub price: f64,
}

impl NewAd {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        Ok(())
    }

    /// Stamps the input with an id, its owner and the creation time.
    pub fn into_ad(self, owner: UserId) -> Ad {
        Ad {
            id: Uuid::now_v7(),
            user_id: owner,
            title: self.title,
            text: self.text,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            price: self.price,
            created_at: Utc::now(),
        }
    }
}

/// An ad row joined with its owner, as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedAd {
    pub id: Uuid,
    pub owner_id: UserId,
    pub owner_username: String,
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
    pub price: f64,
}

/// Read-only projection of an ad returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdView {
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub username: String,
    /// True only when the requesting identity owns the ad.
    pub owned: bool,
}

impl AdView {
    pub fn from_listed(ad: ListedAd, caller: Option<UserId>) -> Self {
        Self {
            owned: caller == Some(ad.owner_id),
            title: ad.title,
            text: ad.text,
            image_url: ad.image_url,
            price: ad.price,
            username: ad.owner_username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(owner: UserId) -> ListedAd {
        ListedAd {
            id: Uuid::now_v7(),
            owner_id: owner,
            owner_username: "alice".into(),
            title: "Bike".into(),
            text: String::new(),
            image_url: None,
            price: 100.0,
        }
    }

    #[test]
    fn ownership_requires_matching_caller() {
        let owner = Uuid::now_v7();
        assert!(AdView::from_listed(listed(owner), Some(owner)).owned);
        assert!(!AdView::from_listed(listed(owner), Some(Uuid::now_v7())).owned);
        assert!(!AdView::from_listed(listed(owner), None).owned);
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: Uuid::now_v7(),
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn new_ad_rejects_blank_title_and_negative_price() {
        let mut ad = NewAd {
            title: "  ".into(),
            text: String::new(),
            image_url: None,
            price: 10.0,
        };
        assert!(matches!(ad.validate(), Err(DomainError::Validation(_))));

        ad.title = "Bike".into();
        ad.price = -1.0;
        assert!(matches!(ad.validate(), Err(DomainError::Validation(_))));

        ad.price = f64::NAN;
        assert!(ad.validate().is_err());

        ad.price = 0.0;
        assert!(ad.validate().is_ok());
    }

    #[test]
    fn blank_image_url_is_dropped() {
        let owner = Uuid::now_v7();
        let ad = NewAd {
            title: "Bike".into(),
            text: "red".into(),
            image_url: Some(" ".into()),
            price: 100.0,
        }
        .into_ad(owner);
        assert_eq!(ad.user_id, owner);
        assert_eq!(ad.image_url, None);
    }

    #[test]
    fn credentials_require_both_fields() {
        let creds = Credentials { username: "alice".into(), password: String::new() };
        assert!(creds.validate().is_err());
        let creds = Credentials { username: " ".into(), password: "pw".into() };
        assert!(creds.validate().is_err());
        let creds = Credentials { username: "alice".into(), password: "pw1".into() };
        assert!(creds.validate().is_ok());
    }
}
