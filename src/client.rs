// ABOUTME: Backend RPC adapter owning the lazily-established Odoo session
// ABOUTME: Bounds each round-trip, re-authenticates once on expiry, and wraps search_read/create/write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, info, warn};

use crate::config::OdooConfig;
use crate::domain::{Model, ReadQuery};
use crate::rpc::{JsonRpcChannel, RpcCall, RpcChannel, Session};
use crate::types::{BridgeError, ErrorKind, Record};

/// Rows gathered by [`OdooClient::scan`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan {
    /// Matching rows in query order
    pub records: Vec<Record>,
    /// More rows matched than the scan was allowed to keep
    pub truncated: bool,
}

/// Adapter between tool handlers and the backend's remote-call endpoint
///
/// One session is shared by every in-flight call. Ordinary calls only take a
/// read lock to clone the session handle; the login critical section is
/// serialized by `login_lock` so concurrent expiries trigger one re-login.
pub struct OdooClient {
    channel: Arc<dyn RpcChannel>,
    session: RwLock<Option<Arc<Session>>>,
    login_lock: Mutex<()>,
    logins: AtomicU64,
    timeout: Duration,
    base_url: String,
}

impl OdooClient {
    /// Create an adapter over an arbitrary channel
    pub fn new(channel: Arc<dyn RpcChannel>, timeout: Duration, base_url: impl Into<String>) -> Self {
        Self {
            channel,
            session: RwLock::new(None),
            login_lock: Mutex::new(()),
            logins: AtomicU64::new(0),
            timeout,
            base_url: base_url.into(),
        }
    }

    /// Create an adapter speaking JSON-RPC over HTTP
    pub fn from_config(config: &OdooConfig) -> Result<Self, BridgeError> {
        let channel = JsonRpcChannel::new(config)?;
        Ok(Self::new(Arc::new(channel), config.timeout, config.url.clone()))
    }

    /// Public base URL of the backend (used to build portal links)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a session is currently established
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Number of successful logins since startup
    pub fn login_count(&self) -> u64 {
        self.logins.load(Ordering::Relaxed)
    }

    /// Invoke `model.method(*args, **kwargs)`
    ///
    /// # Errors
    ///
    /// - `BackendTimeout` when the round-trip exceeds the configured bound
    /// - `BackendFault` when the backend rejects the call, or when the
    ///   session expires again right after re-authenticating
    pub async fn call(&self, call: &RpcCall) -> Result<Value, BridgeError> {
        let started = Instant::now();
        let session = self.current_session().await?;

        let result = match self.execute_once(&session, call).await {
            Err(err) if err.is(ErrorKind::SessionExpired) => {
                warn!(
                    model = %call.model,
                    method = %call.method,
                    "Odoo session expired, re-authenticating"
                );
                let fresh = self.login(Some(&session)).await?;
                self.execute_once(&fresh, call).await.map_err(|err| {
                    if err.is(ErrorKind::SessionExpired) {
                        BridgeError::backend_fault(
                            "Session expired again immediately after re-authentication",
                        )
                        .with_detail(err.message)
                    } else {
                        err
                    }
                })
            }
            other => other,
        };

        debug!(
            model = %call.model,
            method = %call.method,
            mutation = call.is_mutation(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Backend call finished"
        );
        result
    }

    /// Run a read query and return the matching records
    pub async fn search_read(&self, query: &ReadQuery) -> Result<Vec<Record>, BridgeError> {
        let mut kwargs = Map::new();
        kwargs.insert("fields".to_owned(), Value::from(query.fields.to_vec()));
        if let Some(order) = query.order {
            kwargs.insert("order".to_owned(), Value::from(order));
        }
        if let Some(limit) = query.limit {
            kwargs.insert("limit".to_owned(), Value::from(limit));
        }
        if let Some(offset) = query.offset {
            kwargs.insert("offset".to_owned(), Value::from(offset));
        }

        let call = RpcCall::new(
            query.model().name(),
            "search_read",
            vec![query.domain.to_value()],
        )
        .with_kwargs(kwargs);

        match self.call(&call).await? {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Object(record) => Ok(record),
                    other => Err(BridgeError::backend_fault(format!(
                        "search_read on {} returned a non-object row: {other}",
                        query.model()
                    ))),
                })
                .collect(),
            other => Err(BridgeError::backend_fault(format!(
                "search_read on {} returned {other} instead of a list",
                query.model()
            ))),
        }
    }

    /// Page through the matches of `query`, `page_size` rows per round-trip
    ///
    /// Any limit or offset on `query` is replaced. At most `max_rows` rows
    /// are kept; [`Scan::truncated`] reports whether more rows matched. The
    /// query's ordering must be total (end it with `id`) for pages to be
    /// disjoint.
    pub async fn scan(
        &self,
        query: &ReadQuery,
        page_size: u32,
        max_rows: usize,
    ) -> Result<Scan, BridgeError> {
        if page_size == 0 {
            return Err(BridgeError::internal("scan page size must be positive"));
        }

        let mut records = Vec::new();
        loop {
            // One row past the ceiling tells whether the scan was cut short
            let wanted = max_rows + 1 - records.len();
            let limit = u32::try_from(wanted).map_or(page_size, |w| w.min(page_size));
            let offset = u32::try_from(records.len()).map_err(|_| {
                BridgeError::internal(format!("scan offset overflow on {}", query.model()))
            })?;
            let page = self
                .search_read(&query.clone().limit(limit).offset(offset))
                .await?;
            let exhausted = page.len() < limit as usize;
            records.extend(page);

            if records.len() > max_rows {
                records.truncate(max_rows);
                warn!(model = %query.model(), max_rows, "Scan hit its row ceiling");
                return Ok(Scan {
                    records,
                    truncated: true,
                });
            }
            if exhausted {
                debug!(model = %query.model(), rows = records.len(), "Scan complete");
                return Ok(Scan {
                    records,
                    truncated: false,
                });
            }
        }
    }

    /// Create one record and return its id
    pub async fn create(&self, model: Model, values: Record) -> Result<i64, BridgeError> {
        let call = RpcCall::new(model.name(), "create", vec![Value::Object(values)]);
        let result = self.call(&call).await?;

        // Odoo returns a bare id for a single dict, a list of ids for a batch
        let id = match &result {
            Value::Array(ids) => ids.first().and_then(Value::as_i64),
            other => other.as_i64(),
        };
        id.ok_or_else(|| {
            BridgeError::backend_fault(format!("create on {model} returned no id: {result}"))
        })
    }

    /// Update fields on existing records
    pub async fn write(&self, model: Model, ids: &[i64], values: Record) -> Result<bool, BridgeError> {
        if ids.is_empty() {
            return Err(BridgeError::invalid_argument("write requires at least one id"));
        }
        let call = RpcCall::new(
            model.name(),
            "write",
            vec![Value::from(ids.to_vec()), Value::Object(values)],
        );
        Ok(self.call(&call).await?.as_bool().unwrap_or(false))
    }

    /// Return the current session, logging in lazily on first use
    async fn current_session(&self) -> Result<Arc<Session>, BridgeError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(Arc::clone(session));
        }
        self.login(None).await
    }

    /// Serialized login
    ///
    /// When `stale` is given, a session that already replaced it is reused
    /// instead of logging in again.
    async fn login(&self, stale: Option<&Arc<Session>>) -> Result<Arc<Session>, BridgeError> {
        let _guard = self.login_lock.lock().await;

        if let Some(current) = self.session.read().await.as_ref() {
            if stale.is_none_or(|old| !Arc::ptr_eq(old, current)) {
                return Ok(Arc::clone(current));
            }
        }

        *self.session.write().await = None;
        let fresh = Arc::new(self.bounded("authenticate", self.channel.authenticate()).await?);
        *self.session.write().await = Some(Arc::clone(&fresh));
        self.logins.fetch_add(1, Ordering::Relaxed);

        info!(uid = fresh.uid, "Odoo session established");
        Ok(fresh)
    }

    async fn execute_once(&self, session: &Session, call: &RpcCall) -> Result<Value, BridgeError> {
        let what = format!("{}.{}", call.model, call.method);
        self.bounded(&what, self.channel.execute(session, call)).await
    }

    /// Apply the per-call timeout to a backend future
    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, BridgeError>>,
    ) -> Result<T, BridgeError> {
        tokio_timeout(self.timeout, fut).await.map_err(|_| {
            warn!(call = what, timeout = ?self.timeout, "Backend call timed out");
            BridgeError::backend_timeout(format!("{what} timed out after {:?}", self.timeout))
        })?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::domain::DomainBuilder;

    /// Channel whose sessions expire until `valid_from_uid` is reached
    struct ExpiringChannel {
        logins: AtomicU64,
        executions: AtomicUsize,
        valid_from_uid: i64,
        delay: Duration,
    }

    impl ExpiringChannel {
        fn new(valid_from_uid: i64) -> Self {
            Self {
                logins: AtomicU64::new(0),
                executions: AtomicUsize::new(0),
                valid_from_uid,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl RpcChannel for ExpiringChannel {
        async fn authenticate(&self) -> Result<Session, BridgeError> {
            let uid = self.logins.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            Ok(Session::new(uid))
        }

        async fn execute(&self, session: &Session, call: &RpcCall) -> Result<Value, BridgeError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if session.uid < self.valid_from_uid {
                return Err(BridgeError::session_expired("Session expired"));
            }
            match call.method.as_str() {
                "create" => Ok(json!(42)),
                "write" => Ok(json!(true)),
                _ => Ok(json!([{"id": 1, "name": "row"}])),
            }
        }
    }

    /// Channel serving `total` rows with ids `1..=total`, honouring limit and offset
    struct PagedChannel {
        total: usize,
        pages: AtomicUsize,
    }

    #[async_trait]
    impl RpcChannel for PagedChannel {
        async fn authenticate(&self) -> Result<Session, BridgeError> {
            Ok(Session::new(1))
        }

        async fn execute(&self, _: &Session, call: &RpcCall) -> Result<Value, BridgeError> {
            self.pages.fetch_add(1, Ordering::SeqCst);
            let kwarg = |name: &str| {
                call.kwargs
                    .get(name)
                    .and_then(Value::as_u64)
                    .map_or(0, |v| v as usize)
            };
            let offset = kwarg("offset");
            let limit = kwarg("limit");
            let rows: Vec<Value> = (offset + 1..=self.total)
                .take(limit)
                .map(|id| json!({"id": id}))
                .collect();
            Ok(Value::Array(rows))
        }
    }

    fn partner_query() -> ReadQuery {
        ReadQuery::new(
            DomainBuilder::new(Model::Partner).build().expect("domain"),
            &["id"],
        )
        .order_by("id")
    }

    #[tokio::test]
    async fn scan_pages_until_exhausted() {
        let channel = Arc::new(PagedChannel {
            total: 2_500,
            pages: AtomicUsize::new(0),
        });
        let client =
            OdooClient::new(Arc::clone(&channel) as Arc<dyn RpcChannel>, Duration::from_secs(5), "https://erp.test");

        let scan = client.scan(&partner_query(), 1_000, 10_000).await.expect("scan");

        assert!(!scan.truncated);
        assert_eq!(scan.records.len(), 2_500);
        assert_eq!(scan.records[2_499].get("id"), Some(&json!(2_500)));
        assert_eq!(channel.pages.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn scan_flags_rows_beyond_ceiling() {
        let channel = Arc::new(PagedChannel {
            total: 30,
            pages: AtomicUsize::new(0),
        });
        let client = OdooClient::new(channel, Duration::from_secs(5), "https://erp.test");

        let capped = client.scan(&partner_query(), 10, 25).await.expect("scan");
        assert!(capped.truncated);
        assert_eq!(capped.records.len(), 25);

        let exact = client.scan(&partner_query(), 10, 30).await.expect("scan");
        assert!(!exact.truncated);
        assert_eq!(exact.records.len(), 30);
    }

    fn client(channel: Arc<ExpiringChannel>) -> OdooClient {
        OdooClient::new(channel, Duration::from_secs(5), "https://erp.test")
    }

    #[tokio::test]
    async fn session_is_established_lazily_and_reused() {
        let channel = Arc::new(ExpiringChannel::new(1));
        let client = client(Arc::clone(&channel));
        assert!(!client.has_session().await);

        for _ in 0..3 {
            client
                .call(&RpcCall::new("res.partner", "search_read", vec![]))
                .await
                .expect("call");
        }

        assert!(client.has_session().await);
        assert_eq!(client.login_count(), 1);
        assert_eq!(channel.executions.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn expired_session_reauthenticates_once_and_retries() {
        let channel = Arc::new(ExpiringChannel::new(2));
        let client = client(Arc::clone(&channel));

        let value = client
            .call(&RpcCall::new("res.partner", "search_read", vec![]))
            .await
            .expect("retried call succeeds");

        assert!(value.is_array());
        assert_eq!(client.login_count(), 2);
        assert_eq!(channel.executions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_consecutive_expiry_escalates_to_backend_fault() {
        let channel = Arc::new(ExpiringChannel::new(i64::MAX));
        let client = client(Arc::clone(&channel));

        let err = client
            .call(&RpcCall::new("res.partner", "search_read", vec![]))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::BackendFault);
        assert_eq!(client.login_count(), 2);
        assert_eq!(channel.executions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_expiries_share_one_relogin() {
        let channel = Arc::new(ExpiringChannel::new(2));
        let client = Arc::new(client(Arc::clone(&channel)));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move {
                    client
                        .call(&RpcCall::new("sale.order", "search_read", vec![]))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("join").expect("call succeeds");
        }

        assert_eq!(client.login_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let mut channel = ExpiringChannel::new(1);
        channel.delay = Duration::from_secs(60);
        let client = OdooClient::new(Arc::new(channel), Duration::from_secs(1), "https://erp.test");

        let err = client
            .call(&RpcCall::new("res.partner", "search_read", vec![]))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::BackendTimeout);
    }

    #[tokio::test]
    async fn search_read_returns_records() {
        let client = client(Arc::new(ExpiringChannel::new(1)));
        let query = ReadQuery::new(
            DomainBuilder::new(Model::Partner)
                .eq("id", 1)
                .build()
                .expect("domain"),
            &["id", "name"],
        );
        let rows = client.search_read(&query).await.expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&json!("row")));
    }

    #[tokio::test]
    async fn create_and_write_unwrap_results() {
        let client = client(Arc::new(ExpiringChannel::new(1)));
        let id = client
            .create(Model::HelpdeskTicket, Record::new())
            .await
            .expect("create");
        assert_eq!(id, 42);
        assert!(client
            .write(Model::HelpdeskTicket, &[id], Record::new())
            .await
            .expect("write"));
    }

    #[tokio::test]
    async fn write_without_ids_is_rejected_locally() {
        let channel = Arc::new(ExpiringChannel::new(1));
        let client = client(Arc::clone(&channel));
        let err = client
            .write(Model::Partner, &[], Record::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(channel.executions.load(Ordering::SeqCst), 0);
    }
}
