//! Ad creation and listing.

use std::sync::Arc;

use domains::{Ad, AdRepo, AdView, DomainError, ListQuery, NewAd, RawListParams, Result, UserId};

pub struct AdService {
    ads: Arc<dyn AdRepo>,
    page_size: u32,
}

impl AdService {
    pub fn new(ads: Arc<dyn AdRepo>, page_size: u32) -> Self {
        Self { ads, page_size }
    }

    /// A missing owner means the caller's token names a deleted account.
    pub async fn create(&self, owner: UserId, input: NewAd) -> Result<Ad> {
        input.validate()?;
        let ad = input.into_ad(owner);
        self.ads.create_ad(&ad).await.map_err(|e| match e {
            DomainError::NotFound(..) => {
                tracing::warn!(user_id = %owner, "token subject has no account");
                DomainError::unauthorized("unknown token subject")
            }
            other => other,
        })?;

        tracing::info!(ad_id = %ad.id, user_id = %owner, "ad created");
        Ok(ad)
    }

    /// Validates the raw parameters, runs the query and marks the caller's ads.
    /// Nothing reaches the store if validation fails.
    pub async fn list(&self, raw: &RawListParams, caller: Option<UserId>) -> Result<Vec<AdView>> {
        let query = ListQuery::parse(raw, self.page_size)?;
        let rows = self.ads.list_ads(&query).await?;
        Ok(rows
            .into_iter()
            .map(|row| AdView::from_listed(row, caller))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{ListedAd, MockAdRepo, SortDirection, SortField};
    use uuid::Uuid;

    fn row(owner: UserId, title: &str, price: f64) -> ListedAd {
        ListedAd {
            id: Uuid::now_v7(),
            owner_id: owner,
            owner_username: "alice".into(),
            title: title.into(),
            text: String::new(),
            image_url: None,
            price,
        }
    }

    #[tokio::test]
    async fn create_assigns_owner() {
        let owner = Uuid::now_v7();
        let mut repo = MockAdRepo::new();
        repo.expect_create_ad()
            .withf(move |ad| ad.user_id == owner && ad.title == "Bike")
            .times(1)
            .returning(|_| Ok(()));

        let svc = AdService::new(Arc::new(repo), 10);
        let ad = svc
            .create(
                owner,
                NewAd { title: "Bike".into(), text: String::new(), image_url: None, price: 100.0 },
            )
            .await
            .unwrap();
        assert_eq!(ad.user_id, owner);
        assert_eq!(ad.price, 100.0);
    }

    #[tokio::test]
    async fn invalid_ad_never_reaches_store() {
        let mut repo = MockAdRepo::new();
        repo.expect_create_ad().never();

        let svc = AdService::new(Arc::new(repo), 10);
        let err = svc
            .create(
                Uuid::now_v7(),
                NewAd { title: "Bike".into(), text: String::new(), image_url: None, price: -3.0 },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn owner_without_account_is_unauthorized() {
        let mut repo = MockAdRepo::new();
        repo.expect_create_ad()
            .times(1)
            .returning(|_| Err(DomainError::NotFound("user".into(), "referenced owner".into())));

        let svc = AdService::new(Arc::new(repo), 10);
        let err = svc
            .create(
                Uuid::now_v7(),
                NewAd { title: "Bike".into(), text: String::new(), image_url: None, price: 1.0 },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthorized("unknown token subject".into()));
    }

    #[tokio::test]
    async fn list_passes_validated_query_and_marks_ownership() {
        let me = Uuid::now_v7();
        let someone = Uuid::now_v7();

        let mut repo = MockAdRepo::new();
        repo.expect_list_ads()
            .withf(|q| {
                q.page == 2
                    && q.offset() == 5
                    && q.sort == SortField::Price
                    && q.direction == SortDirection::Desc
                    && q.price.min == Some(50.0)
            })
            .times(1)
            .returning(move |_| Ok(vec![row(me, "Bike", 100.0), row(someone, "Lamp", 60.0)]));

        let svc = AdService::new(Arc::new(repo), 5);
        let raw = RawListParams {
            page: Some("2".into()),
            sort_by: Some("price".into()),
            sort_dir: Some("desc".into()),
            price_min: Some("50".into()),
            price_max: None,
        };
        let views = svc.list(&raw, Some(me)).await.unwrap();
        assert_eq!(views.len(), 2);
        assert!(views[0].owned);
        assert!(!views[1].owned);
    }

    #[tokio::test]
    async fn malformed_params_skip_the_query() {
        let mut repo = MockAdRepo::new();
        repo.expect_list_ads().never();

        let svc = AdService::new(Arc::new(repo), 10);
        let raw = RawListParams { price_max: Some("lots".into()), ..Default::default() };
        let err = svc.list(&raw, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn store_failure_returns_no_partial_results() {
        let mut repo = MockAdRepo::new();
        repo.expect_list_ads()
            .returning(|_| Err(DomainError::internal("disk I/O error")));

        let svc = AdService::new(Arc::new(repo), 10);
        let err = svc.list(&RawListParams::default(), None).await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
