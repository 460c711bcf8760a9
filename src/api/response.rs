//! Result representations and the negotiated success response.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::ApiError;
use super::format::Format;
use crate::domain::{ResultRecord, ResultStats};

pub type ApiResult = Result<ApiResponse, ApiError>;

/// Status returned by a successful update ("Content Returned").
pub fn content_returned() -> StatusCode {
    StatusCode::from_u16(209).unwrap_or(StatusCode::OK)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultDto {
    pub id: i32,
    pub value: i32,
    pub user_id: i32,
}

impl From<&ResultRecord> for ResultDto {
    fn from(r: &ResultRecord) -> Self {
        Self {
            id: r.id,
            value: r.value,
            user_id: r.user_id,
        }
    }
}

/// `{"result": {...}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultEnvelope {
    pub result: ResultDto,
}

/// `{"results": [{"result": {...}}, ...]}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsEnvelope {
    pub results: Vec<ResultEnvelope>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsDto {
    pub count: u64,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub avg: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsEnvelope {
    pub stats: StatsDto,
}

// XML shapes: the id travels as an attribute and absent stats are omitted.

#[derive(Serialize)]
struct XmlResult {
    #[serde(rename = "@id")]
    id: i32,
    value: i32,
    #[serde(rename = "userId")]
    user_id: i32,
}

#[derive(Serialize)]
struct XmlResults {
    result: Vec<XmlResult>,
}

#[derive(Serialize)]
struct XmlStats {
    count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avg: Option<f64>,
}

impl From<&ResultRecord> for XmlResult {
    fn from(r: &ResultRecord) -> Self {
        Self {
            id: r.id,
            value: r.value,
            user_id: r.user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Result(ResultRecord),
    Results(Vec<ResultRecord>),
    Stats(ResultStats),
}

impl Payload {
    fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Payload::Result(r) => serde_json::to_string(&ResultEnvelope { result: r.into() }),
            Payload::Results(rs) => serde_json::to_string(&ResultsEnvelope {
                results: rs
                    .iter()
                    .map(|r| ResultEnvelope { result: r.into() })
                    .collect(),
            }),
            Payload::Stats(s) => serde_json::to_string(&StatsEnvelope {
                stats: StatsDto {
                    count: s.count,
                    min: s.min,
                    max: s.max,
                    avg: s.avg,
                },
            }),
        }
    }

    fn to_xml(&self) -> Result<String, String> {
        let rendered = match self {
            Payload::Result(r) => quick_xml::se::to_string_with_root("result", &XmlResult::from(r)),
            Payload::Results(rs) => quick_xml::se::to_string_with_root(
                "results",
                &XmlResults {
                    result: rs.iter().map(XmlResult::from).collect(),
                },
            ),
            Payload::Stats(s) => quick_xml::se::to_string_with_root(
                "stats",
                &XmlStats {
                    count: s.count,
                    min: s.min,
                    max: s.max,
                    avg: s.avg,
                },
            ),
        };
        rendered.map_err(|e| e.to_string())
    }

    pub fn render(&self, format: Format) -> Result<String, String> {
        match format {
            Format::Json => self.to_json().map_err(|e| e.to_string()),
            Format::Xml => self.to_xml(),
        }
    }
}

/// Successful response; the body format is chosen when it is rendered.
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    payload: Option<Payload>,
    headers: HeaderMap,
}

impl ApiResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            payload: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_payload(status: StatusCode, payload: Payload) -> Self {
        Self {
            payload: Some(payload),
            ..Self::new(status)
        }
    }

    pub fn not_modified(etag: &str) -> Self {
        Self::new(StatusCode::NOT_MODIFIED).with_header(header::ETAG, etag)
    }

    /// Adds a header; values that are not valid header text are dropped.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(e) => tracing::warn!("Dropping invalid {} header: {}", name, e),
        }
        self
    }

    /// Private cache validators for conditional reads.
    #[must_use]
    pub fn cacheable(self, etag: &str) -> Self {
        self.with_header(header::CACHE_CONTROL, "private")
            .with_header(header::ETAG, etag)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn render(self, format: Format) -> Response {
        let Some(payload) = self.payload else {
            return (self.status, self.headers).into_response();
        };

        match payload.render(format) {
            Ok(body) => {
                let mut headers = self.headers;
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(format.content_type()),
                );
                (self.status, headers, body).into_response()
            }
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                ApiError::internal().with_format(format).into_response()
            }
        }
    }
}

/// Renders the outcome of a handler in the negotiated format.
pub fn respond(format: Format, outcome: ApiResult) -> Response {
    match outcome {
        Ok(response) => response.render(format),
        Err(error) => error.with_format(format).into_response(),
    }
}
