//! Shared wire types: the response envelope, paginated payloads and ids.

use serde::{Deserialize, Serialize};

/// Outcome marker carried by every response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Ok,
    Error,
}

/// Standard response envelope: `{ status, data?, message? }`.
///
/// With `status == Ok` the `data` field is the payload. With
/// `status == Error` the `message` is meant for the end user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Success envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Ok,
            data: Some(data),
            message: None,
        }
    }

    /// Error envelope with a user-facing message and no data.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == EnvelopeStatus::Ok
    }
}

/// One page of a listed resource, embedded as an envelope's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedData<T> {
    /// Build a page, deriving `total_pages` from `total` and `limit`.
    /// A zero `limit` yields zero pages.
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit > 0 { total.div_ceil(limit) } else { 0 };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Query parameters accepted by list endpoints. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl PaginationParams {
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Present fields as `(name, value)` pairs in a fixed order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }

    /// Percent-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Resource identifier, either numeric or textual on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn envelope_decodes_without_optional_fields() {
        let env: Envelope<u32> = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        assert!(env.is_ok());
        assert!(env.data.is_none());
        assert!(env.message.is_none());
    }

    #[test]
    fn error_envelope_serializes_like_the_backend() {
        let env: Envelope<()> = Envelope::error("参数校验失败");
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({ "status": "error", "data": null, "message": "参数校验失败" })
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_value::<Envelope<u32>>(json!({ "status": "pending" }));
        assert!(result.is_err());
    }

    #[test]
    fn paginated_total_pages_rounds_up() {
        let page = PaginatedData::new(vec![1, 2, 3], 21, 1, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page());
    }

    #[test]
    fn paginated_zero_limit_has_no_pages() {
        let page: PaginatedData<u8> = PaginatedData::new(Vec::new(), 5, 1, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page());
    }

    #[test]
    fn query_string_skips_absent_fields_and_encodes_values() {
        let params = PaginationParams {
            page: Some(2),
            limit: None,
            sort: Some("-created_at".to_string()),
            search: Some("a b&c".to_string()),
        };
        assert_eq!(params.to_query_string(), "page=2&sort=-created_at&search=a%20b%26c");
        assert_eq!(PaginationParams::default().to_query_string(), "");
    }

    #[test]
    fn id_is_untagged_on_the_wire() {
        let ids: Vec<Id> = serde_json::from_value(json!([7, "abc"])).unwrap();
        assert_eq!(ids, vec![Id::Number(7), Id::Text("abc".to_string())]);
        assert_eq!(ids[0].to_string(), "7");
    }

    proptest! {
        #[test]
        fn total_pages_covers_every_item(total in 0u64..100_000, limit in 1u64..500) {
            let page: PaginatedData<u8> = PaginatedData::new(Vec::new(), total, 1, limit);
            prop_assert!(page.total_pages * limit >= total);
            prop_assert!(page.total_pages == 0 || (page.total_pages - 1) * limit < total);
        }
    }
}
