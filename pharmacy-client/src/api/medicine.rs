//! Medicine catalog endpoints

use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use shared::Medicine;

const BASE: &str = "api/v1/pharmacy/medicine";

/// Client for `/api/v1/pharmacy/medicine`
///
/// The catalog is read-only from the client's perspective; filtering and
/// sorting beyond these endpoints happens locally (see [`crate::catalog`]).
#[derive(Debug, Clone)]
pub struct MedicineApi {
    http: HttpClient,
}

impl MedicineApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch the full medicine list
    pub async fn get_all(&self) -> ClientResult<Vec<Medicine>> {
        self.http.get(BASE).await
    }

    /// Fetch a single medicine by id
    pub async fn get_by_id(&self, id: &str) -> ClientResult<Medicine> {
        if id.is_empty() {
            return Err(ClientError::Validation("medicine id is empty".into()));
        }
        self.http.get(&format!("{BASE}/{id}")).await
    }

    /// Server-side free-text search
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Medicine>> {
        self.http.get(&format!("{BASE}/search?query={query}")).await
    }

    /// Server-side category filter
    pub async fn by_category(&self, category: &str) -> ClientResult<Vec<Medicine>> {
        self.http
            .get(&format!("{BASE}/filter?category={category}"))
            .await
    }

    /// Upload a prescription image and get the medicines it mentions
    pub async fn search_by_prescription(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> ClientResult<Vec<Medicine>> {
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.http
            .post_multipart(&format!("{BASE}/upload-prescription"), form)
            .await
    }
}
