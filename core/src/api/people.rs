//! People record operations: create, list/search/filter, fetch, delete,
//! sub-resource updates, and batch registration.

use serde::Serialize;

use crate::client::ApiClient;
use crate::config::endpoints;
use crate::error::ApiError;
use crate::types::{Envelope, People, PeopleQuery};

/// Default page size applied by [`ApiClient::filter_peoples`].
pub const FILTER_LIMIT: u32 = 50;

/// Default number of hits returned by a semantic search.
pub const DEFAULT_TOP_K: u32 = 5;

/// The server expects new records wrapped under a `people` key.
#[derive(Serialize)]
struct CreatePeopleRequest<'a> {
    people: &'a People,
}

#[derive(Serialize)]
struct UpdateImageRequest<'a> {
    image: &'a str,
}

#[derive(Serialize)]
struct UpdateRemarkRequest<'a> {
    remark: &'a str,
}

impl ApiClient {
    pub async fn create_people(&self, people: &People) -> Result<Envelope<People>, ApiError> {
        self.post(endpoints::PEOPLES, &CreatePeopleRequest { people })
            .await
    }

    pub async fn list_peoples(&self, query: &PeopleQuery) -> Result<Envelope<Vec<People>>, ApiError> {
        self.get(endpoints::PEOPLES, &query.to_params()).await
    }

    /// Semantic search over records, returning at most `top_k` hits.
    pub async fn search_peoples(
        &self,
        search: &str,
        top_k: u32,
    ) -> Result<Envelope<Vec<People>>, ApiError> {
        let query = PeopleQuery {
            search: Some(search.to_string()),
            top_k: Some(top_k),
            ..Default::default()
        };
        self.list_peoples(&query).await
    }

    /// Filtered listing; caps the page size at [`FILTER_LIMIT`] unless the
    /// caller chose one.
    pub async fn filter_peoples(
        &self,
        mut query: PeopleQuery,
    ) -> Result<Envelope<Vec<People>>, ApiError> {
        if query.limit.is_none() {
            query.limit = Some(FILTER_LIMIT);
        }
        self.list_peoples(&query).await
    }

    pub async fn get_people(&self, id: &str) -> Result<Envelope<People>, ApiError> {
        self.get(&endpoints::people_by_id(id), &[]).await
    }

    pub async fn delete_people(&self, id: &str) -> Result<Envelope<serde_json::Value>, ApiError> {
        self.delete(&endpoints::people_by_id(id)).await
    }

    pub async fn update_people_image(
        &self,
        id: &str,
        image: &str,
    ) -> Result<Envelope<People>, ApiError> {
        self.put(&endpoints::people_image(id), &UpdateImageRequest { image })
            .await
    }

    pub async fn update_people_remark(
        &self,
        id: &str,
        remark: &str,
    ) -> Result<Envelope<People>, ApiError> {
        self.put(&endpoints::people_remark(id), &UpdateRemarkRequest { remark })
            .await
    }

    /// Create many records with independent per-item calls.
    ///
    /// One item failing does not abort the rest; the result holds one entry
    /// per input, in order, so callers can report exactly which rows failed
    /// and resubmit them.
    pub async fn create_peoples_batch(
        &self,
        peoples: &[People],
    ) -> Vec<Result<Envelope<People>, ApiError>> {
        let calls = peoples.iter().map(|people| self.create_people(people));
        futures::future::join_all(calls).await
    }
}
