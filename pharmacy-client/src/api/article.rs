//! Article (blog) endpoints

use crate::error::ClientResult;
use crate::http::HttpClient;
use shared::models::ArticleCommentRequest;
use shared::{Article, ArticleComment};

const BASE: &str = "api/v1/article/core";

/// Client for `/api/v1/article/core`
#[derive(Debug, Clone)]
pub struct ArticleApi {
    http: HttpClient,
}

impl ArticleApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch all published articles
    pub async fn list(&self) -> ClientResult<Vec<Article>> {
        self.http.get(BASE).await
    }

    /// Fetch a single article by id
    pub async fn get(&self, id: &str) -> ClientResult<Article> {
        self.http.get(&format!("{BASE}/{id}")).await
    }

    /// Like an article
    pub async fn like(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{BASE}/{id}/like")).await
    }

    /// Add a comment to an article
    pub async fn add_comment(&self, article_id: &str, comment: &str) -> ClientResult<ArticleComment> {
        let body = ArticleCommentRequest {
            article_id: article_id.to_string(),
            comment: comment.to_string(),
        };
        self.http
            .post(&format!("{BASE}/{article_id}/comment"), &body)
            .await
    }
}
