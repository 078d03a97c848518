//! REST implementation of [`AdminBackend`]

use crate::config::ApiConfig;
use crate::core::error::{AdminResult, ConfigError, DecodeError, HttpError, NetworkError};
use crate::core::query::{ListFilter, Page, PaginationMeta};
use crate::core::service::AdminBackend;
use crate::core::session::Session;
use crate::core::status::OrderStatus;
use crate::entities::{
    AccountStatus, Consumer, ConsumerStats, LoginCredentials, LoginGrant, Order, StatusUpdate,
    StatusUpdateOutcome, User, UserDetails, Zone, ZonePayload,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response envelope used by every admin endpoint: `{ success, data }`
///
/// `data` stays untyped until `success` has been checked; rejections
/// usually carry `null` or no data at all.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Error body (`{ success: false, message }`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Body of a 2xx response
struct RawResponse {
    status: u16,
    bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct OrdersData {
    orders: Vec<Order>,
    pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
struct UsersData {
    users: Vec<User>,
    pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
struct ConsumersData {
    consumers: Vec<Consumer>,
    pagination: PaginationMeta,
}

/// Admin backend reached over HTTP
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a backend from configuration (base URL and timeout)
    pub fn new(config: &ApiConfig) -> AdminResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend with default client settings
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL under `/api/admin`; each segment is percent-encoded
    fn url(&self, segments: &[&str]) -> AdminResult<Url> {
        let invalid = |message: String| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            message,
        };
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("'{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "admin"])
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        session: Option<&Session>,
    ) -> AdminResult<RequestBuilder> {
        let url = self.url(segments)?;
        tracing::debug!(method = %method, path = %url.path(), "admin api request");
        let builder = self.http.request(method, url);
        Ok(match session {
            Some(session) => builder.bearer_auth(session.token().expose_secret()),
            None => builder,
        })
    }

    /// Send and return the raw body of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> AdminResult<RawResponse> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            let message = parsed
                .message
                .or(parsed.error)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "request failed".to_string());
            tracing::debug!(status = status.as_u16(), message = %message, "admin api error");
            return Err(HttpError::new(status.as_u16(), message).into());
        }

        Ok(RawResponse {
            status: status.as_u16(),
            bytes: body.to_vec(),
        })
    }

    /// Send and unwrap the `data` field of the envelope
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> AdminResult<T> {
        let body = self.execute(request).await?;
        let decode_error = |e: serde_json::Error| DecodeError {
            context: context.to_string(),
            message: e.to_string(),
        };
        let envelope: Envelope = serde_json::from_slice(&body.bytes).map_err(decode_error)?;

        if envelope.success == Some(false) {
            return Err(HttpError::new(
                body.status,
                envelope
                    .message
                    .unwrap_or_else(|| format!("{} rejected", context)),
            )
            .into());
        }

        serde_json::from_value(envelope.data).map_err(|e| decode_error(e).into())
    }
}

#[async_trait]
impl AdminBackend for HttpBackend {
    async fn login(&self, credentials: &LoginCredentials) -> AdminResult<Session> {
        let request = self
            .request(Method::POST, &["login"], None)?
            .json(credentials);
        let grant: LoginGrant = self.send(request, "login response").await?;
        tracing::info!(admin = %grant.admin.email, "admin logged in");
        Ok(Session::from(grant))
    }

    async fn list_orders(
        &self,
        session: &Session,
        filter: &ListFilter<OrderStatus>,
    ) -> AdminResult<Page<Order>> {
        let request = self
            .request(Method::GET, &["orders"], Some(session))?
            .query(&filter.query_pairs());
        let data: OrdersData = self.send(request, "order list").await?;
        Ok(Page {
            items: data.orders,
            pagination: data.pagination,
        })
    }

    async fn update_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> AdminResult<StatusUpdateOutcome> {
        let request = self
            .request(Method::PATCH, &["orders", order_id, "status"], Some(session))?
            .json(&StatusUpdate { status });
        self.send(request, "status update").await
    }

    async fn list_zones(&self, session: &Session) -> AdminResult<Vec<Zone>> {
        let request = self.request(Method::GET, &["zones"], Some(session))?;
        self.send(request, "zone list").await
    }

    async fn create_zone(&self, session: &Session, payload: &ZonePayload) -> AdminResult<Zone> {
        let request = self
            .request(Method::POST, &["zones"], Some(session))?
            .json(payload);
        self.send(request, "created zone").await
    }

    async fn update_zone(
        &self,
        session: &Session,
        zone_id: &str,
        payload: &ZonePayload,
    ) -> AdminResult<Zone> {
        let request = self
            .request(Method::PUT, &["zones", zone_id], Some(session))?
            .json(payload);
        self.send(request, "updated zone").await
    }

    async fn delete_zone(&self, session: &Session, zone_id: &str) -> AdminResult<()> {
        let request = self.request(Method::DELETE, &["zones", zone_id], Some(session))?;
        self.execute(request).await?;
        Ok(())
    }

    async fn list_users(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<User>> {
        let request = self
            .request(Method::GET, &["users"], Some(session))?
            .query(&[("page", filter.page), ("limit", filter.limit)]);
        let data: UsersData = self.send(request, "user list").await?;
        Ok(Page {
            items: data.users,
            pagination: data.pagination,
        })
    }

    async fn user_details(&self, session: &Session, user_id: &str) -> AdminResult<UserDetails> {
        let request = self.request(Method::GET, &["users", user_id], Some(session))?;
        self.send(request, "user details").await
    }

    async fn list_consumers(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<Consumer>> {
        let mut query = vec![
            ("page", filter.page.to_string()),
            ("limit", filter.limit.to_string()),
        ];
        if let Some(status) = filter.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = &filter.search {
            query.push(("search", search.clone()));
        }
        let request = self
            .request(Method::GET, &["consumers"], Some(session))?
            .query(&query);
        let data: ConsumersData = self.send(request, "consumer list").await?;
        Ok(Page {
            items: data.consumers,
            pagination: data.pagination,
        })
    }

    async fn consumer_stats(&self, session: &Session) -> AdminResult<ConsumerStats> {
        let request = self.request(Method::GET, &["consumers", "stats"], Some(session))?;
        self.send(request, "consumer stats").await
    }
}
