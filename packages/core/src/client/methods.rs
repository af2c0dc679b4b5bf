//! Verb helpers over [`ApiClient::fetch_api`].
//!
//! Each helper only fills in the method and, for `post`/`put`/`patch`, the
//! JSON body. Errors come straight from the pipeline.

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::error::ApiError;
use crate::client::pipeline::{new_trace_id, ApiClient, RequestOptions, TRACE_ID_HEADER};
use crate::types::{PaginatedData, PaginationParams};

impl ApiClient {
    pub async fn get<T>(&self, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.fetch_api(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// `data` is serialized to JSON when present; `None` sends no body.
    pub async fn post<T, B>(&self, endpoint: &str, data: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_with_body(Method::POST, endpoint, data).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, data: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_with_body(Method::PUT, endpoint, data).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, data: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_with_body(Method::PATCH, endpoint, data).await
    }

    pub async fn delete<T>(&self, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.fetch_api(endpoint, RequestOptions::new(Method::DELETE)).await
    }

    /// `get` a list endpoint with pagination parameters appended to the
    /// query string.
    pub async fn get_page<T>(
        &self,
        endpoint: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedData<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let query = params.to_query_string();
        let endpoint = if query.is_empty() {
            endpoint.to_string()
        } else if endpoint.contains('?') {
            format!("{}&{}", endpoint, query)
        } else {
            format!("{}?{}", endpoint, query)
        };

        self.get(&endpoint).await
    }

    async fn send_with_body<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let trace_id = new_trace_id();
        let body = match data.map(serde_json::to_string).transpose() {
            Ok(body) => body,
            Err(err) => {
                let err = ApiError::unknown(err.to_string());
                self.log_error(&trace_id, &err);
                return Err(err);
            }
        };

        let mut options = RequestOptions::new(method).with_body(body);
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            options = options.with_header(HeaderName::from_static(TRACE_ID_HEADER), value);
        }

        self.fetch_api(endpoint, options).await
    }
}
