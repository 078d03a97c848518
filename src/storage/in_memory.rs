//! In-memory implementation of AdminBackend for testing and development
//!
//! Behaves like the real backend where the client can observe it: bearer
//! tokens are checked, pagination metadata is computed the same way, and
//! status updates are validated against the transition table so repeated or
//! out-of-order moves are rejected with a 400.

use crate::core::error::{AdminError, AdminResult, HttpError, NetworkError};
use crate::core::query::{ListFilter, Page};
use crate::core::service::AdminBackend;
use crate::core::session::Session;
use crate::core::status::{OrderStatus, validate_transition};
use crate::entities::{
    AccountStatus, Admin, Consumer, ConsumerStats, LoginCredentials, LoginGrant, Order,
    StatusUpdateOutcome, User, UserDetails, Zone, ZonePayload,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct State {
    admins: HashMap<String, (String, Admin)>,
    tokens: HashSet<String>,
    orders: Vec<Order>,
    zones: Vec<Zone>,
    users: Vec<User>,
    consumers: Vec<Consumer>,
}

/// In-memory admin backend
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share state.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
    offline: Arc<AtomicBool>,
    send_emails: Arc<AtomicBool>,
    requests: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            offline: Arc::new(AtomicBool::new(false)),
            send_emails: Arc::new(AtomicBool::new(true)),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register an admin account
    pub fn with_admin(self, email: &str, password: &str, name: &str) -> AdminResult<Self> {
        let admin = Admin {
            id: new_id(),
            email: email.to_string(),
            name: name.to_string(),
            role: "admin".to_string(),
        };
        self.write()?
            .admins
            .insert(email.to_string(), (password.to_string(), admin));
        Ok(self)
    }

    /// Issue a session directly, bypassing login
    pub fn issue_session(&self) -> AdminResult<Session> {
        let token = new_id();
        self.write()?.tokens.insert(token.clone());
        Ok(Session::from_token(token))
    }

    /// While offline every call fails with a network error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Whether status updates report a sent notification
    pub fn set_send_emails(&self, send: bool) {
        self.send_emails.store(send, Ordering::SeqCst);
    }

    /// Number of calls received so far (including rejected ones)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn insert_order(&self, order: Order) -> AdminResult<()> {
        self.write()?.orders.push(order);
        Ok(())
    }

    pub fn insert_zone(&self, zone: Zone) -> AdminResult<()> {
        self.write()?.zones.push(zone);
        Ok(())
    }

    pub fn insert_user(&self, user: User) -> AdminResult<()> {
        self.write()?.users.push(user);
        Ok(())
    }

    pub fn insert_consumer(&self, consumer: Consumer) -> AdminResult<()> {
        self.write()?.consumers.push(consumer);
        Ok(())
    }

    /// Current server-side copy of an order
    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.state
            .read()
            .ok()?
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
    }

    /// Current server-side zones
    pub fn zones(&self) -> Vec<Zone> {
        self.state
            .read()
            .map(|s| s.zones.clone())
            .unwrap_or_default()
    }

    fn read(&self) -> AdminResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| {
                NetworkError::Transport(format!("Failed to acquire read lock: {}", e)).into()
            })
    }

    fn write(&self) -> AdminResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| {
                NetworkError::Transport(format!("Failed to acquire write lock: {}", e)).into()
            })
    }

    /// Count the call and fail it when offline
    fn enter(&self) -> AdminResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Connect("backend unreachable".to_string()).into());
        }
        Ok(())
    }

    fn authorize(&self, session: &Session) -> AdminResult<()> {
        self.enter()?;
        if self.read()?.tokens.contains(session.token().expose_secret()) {
            Ok(())
        } else {
            Err(HttpError::new(401, "Invalid or expired token").into())
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn not_found(resource: &str) -> AdminError {
    HttpError::new(404, format!("{} not found", resource)).into()
}

fn matches_search(haystacks: &[&str], search: &Option<String>) -> bool {
    match search {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
        }
    }
}

fn within_dates(date: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = date else {
        return false;
    };
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

#[async_trait]
impl AdminBackend for InMemoryBackend {
    async fn login(&self, credentials: &LoginCredentials) -> AdminResult<Session> {
        self.enter()?;
        let mut state = self.write()?;
        let admin = match state.admins.get(&credentials.email) {
            Some((password, admin)) if *password == credentials.password => admin.clone(),
            _ => return Err(HttpError::new(401, "Invalid credentials").into()),
        };
        let token = new_id();
        state.tokens.insert(token.clone());
        Ok(Session::from(LoginGrant { token, admin }))
    }

    async fn list_orders(
        &self,
        session: &Session,
        filter: &ListFilter<OrderStatus>,
    ) -> AdminResult<Page<Order>> {
        self.authorize(session)?;
        let state = self.read()?;
        let matching: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .filter(|o| {
                within_dates(
                    o.created_at.map(|d| d.date_naive()),
                    filter.start_date,
                    filter.end_date,
                )
            })
            .filter(|o| matches_search(&[o.tracking_number.as_str()], &filter.search))
            .cloned()
            .collect();
        Ok(Page::from_slice(matching, filter.page, filter.limit))
    }

    async fn update_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> AdminResult<StatusUpdateOutcome> {
        self.authorize(session)?;
        let mut state = self.write()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| not_found("Order"))?;

        if let Err(e) = validate_transition(order.status, status) {
            return Err(HttpError::new(400, format!("Invalid status transition: {}", e)).into());
        }

        order.status = status;
        order.updated_at = Some(Utc::now());
        Ok(StatusUpdateOutcome {
            order: order.clone(),
            email_sent: self.send_emails.load(Ordering::SeqCst),
        })
    }

    async fn list_zones(&self, session: &Session) -> AdminResult<Vec<Zone>> {
        self.authorize(session)?;
        Ok(self.read()?.zones.clone())
    }

    async fn create_zone(&self, session: &Session, payload: &ZonePayload) -> AdminResult<Zone> {
        self.authorize(session)?;
        if payload.name.trim().is_empty() {
            return Err(HttpError::new(400, "Zone name is required").into());
        }
        let zone = Zone {
            id: new_id(),
            name: payload.name.clone(),
            delivery_price: payload.delivery_price,
            description: Some(payload.description.clone()).filter(|d| !d.is_empty()),
            is_active: true,
        };
        self.write()?.zones.push(zone.clone());
        Ok(zone)
    }

    async fn update_zone(
        &self,
        session: &Session,
        zone_id: &str,
        payload: &ZonePayload,
    ) -> AdminResult<Zone> {
        self.authorize(session)?;
        let mut state = self.write()?;
        let zone = state
            .zones
            .iter_mut()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| not_found("Zone"))?;
        zone.name = payload.name.clone();
        zone.delivery_price = payload.delivery_price;
        zone.description = Some(payload.description.clone()).filter(|d| !d.is_empty());
        Ok(zone.clone())
    }

    async fn delete_zone(&self, session: &Session, zone_id: &str) -> AdminResult<()> {
        self.authorize(session)?;
        let mut state = self.write()?;
        let before = state.zones.len();
        state.zones.retain(|z| z.id != zone_id);
        if state.zones.len() == before {
            return Err(not_found("Zone"));
        }
        Ok(())
    }

    async fn list_users(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<User>> {
        self.authorize(session)?;
        let users = self.read()?.users.clone();
        Ok(Page::from_slice(users, filter.page, filter.limit))
    }

    async fn user_details(&self, session: &Session, user_id: &str) -> AdminResult<UserDetails> {
        self.authorize(session)?;
        let state = self.read()?;
        let user = state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| not_found("User"))?;
        let orders = state
            .orders
            .iter()
            .filter(|o| o.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        Ok(UserDetails { user, orders })
    }

    async fn list_consumers(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<Consumer>> {
        self.authorize(session)?;
        let state = self.read()?;
        let matching: Vec<Consumer> = state
            .consumers
            .iter()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| {
                matches_search(
                    &[
                        c.email.as_str(),
                        c.first_name.as_str(),
                        c.last_name.as_str(),
                        c.phone.as_str(),
                    ],
                    &filter.search,
                )
            })
            .cloned()
            .collect();
        Ok(Page::from_slice(matching, filter.page, filter.limit))
    }

    async fn consumer_stats(&self, session: &Session) -> AdminResult<ConsumerStats> {
        self.authorize(session)?;
        let state = self.read()?;
        let now = Utc::now();
        let today = now.date_naive();
        let since = |days: i64| now - Duration::days(days);

        let mut stats = ConsumerStats::default();
        for consumer in &state.consumers {
            stats.total += 1;
            match consumer.status {
                AccountStatus::Active => stats.active += 1,
                AccountStatus::Inactive => stats.inactive += 1,
            }
            if let Some(created) = consumer.created_at {
                if created.date_naive() == today {
                    stats.new_today += 1;
                }
                if created >= since(7) {
                    stats.new_this_week += 1;
                }
                if created >= since(30) {
                    stats.new_this_month += 1;
                }
            }
        }
        Ok(stats)
    }
}
