// ABOUTME: Integration tests driving the dispatcher, MCP server, and HTTP router end to end
// ABOUTME: Uses a scripted in-memory RpcChannel to observe every backend call a tool makes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use odoolink::rpc::{RpcCall, RpcChannel, Session};
use odoolink::{BridgeError, ErrorKind, OdooClient};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use odoolink_mcp::dispatch::{Dispatcher, ToolCallRequest, ToolCallResponse};
use odoolink_mcp::protocol::JsonRpcRequest;
use odoolink_mcp::server::McpServer;
use odoolink_mcp::state::ServerState;
use odoolink_mcp::tools::{build_tool_registry, ToolName};
use odoolink_mcp::transport::http::router;

/// Guards access to `ODOOLINK_API_KEY` across parallel tests.
/// All HTTP tests read this env var through the auth middleware.
static ENV_MUTEX: Mutex<()> = Mutex::const_new(());

type Responder = Box<dyn Fn(&RpcCall) -> Result<Value, BridgeError> + Send + Sync>;

/// Backend double recording every call and answering through a closure
struct ScriptedChannel {
    responder: Responder,
    calls: StdMutex<Vec<RpcCall>>,
    logins: AtomicUsize,
    expire_next: AtomicUsize,
}

impl ScriptedChannel {
    fn new(responder: impl Fn(&RpcCall) -> Result<Value, BridgeError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: StdMutex::new(Vec::new()),
            logins: AtomicUsize::new(0),
            expire_next: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl RpcChannel for ScriptedChannel {
    async fn authenticate(&self) -> Result<Session, BridgeError> {
        let uid = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Session::new(i64::try_from(uid).unwrap_or(i64::MAX)))
    }

    async fn execute(&self, _session: &Session, call: &RpcCall) -> Result<Value, BridgeError> {
        self.calls.lock().expect("calls lock").push(call.clone());
        let pending = self.expire_next.load(Ordering::SeqCst);
        if pending > 0 {
            self.expire_next.store(pending - 1, Ordering::SeqCst);
            return Err(BridgeError::session_expired("Session expired"));
        }
        (self.responder)(call)
    }
}

/// Value of the first `[field, op, value]` clause on `field`
fn clause_value(call: &RpcCall, field: &str) -> Option<Value> {
    call.args.first()?.as_array()?.iter().find_map(|term| {
        let clause = term.as_array()?;
        (clause.first()?.as_str()? == field).then(|| clause.get(2).cloned())?
    })
}

fn server(channel: Arc<ScriptedChannel>) -> Arc<McpServer> {
    let client = OdooClient::new(channel, Duration::from_secs(5), "https://erp.test");
    let state = Arc::new(ServerState::new(Arc::new(client), "x_studio_marketplace"));
    let registry = build_tool_registry().expect("registry");
    Arc::new(McpServer::new(Dispatcher::new(registry, state)))
}

async fn call_tool(server: &McpServer, tool: &str, arguments: Value) -> ToolCallResponse {
    server
        .dispatcher()
        .dispatch(ToolCallRequest {
            tool: tool.to_owned(),
            arguments,
            request_id: json!("test"),
        })
        .await
}

fn result(response: &ToolCallResponse) -> &Value {
    response
        .result
        .as_ref()
        .unwrap_or_else(|| panic!("expected success, got {:?}", response.error))
}

// ============================================================================
// Dispatcher Semantics
// ============================================================================

#[tokio::test]
async fn get_partner_prefers_id_over_email() {
    let channel = ScriptedChannel::new(|_| Ok(json!([{"id": 7, "name": "Ana"}])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "get_partner",
        json!({"partner_id": 7, "email": "x@y.com"}),
    )
    .await;

    assert_eq!(result(&response)["partner"]["id"], json!(7));
    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "res.partner");
    assert_eq!(calls[0].args[0], json!([["id", "=", 7]]));
}

#[tokio::test]
async fn get_partner_without_identifier_is_invalid() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(&server, "get_partner", json!({"email": "  "})).await;

    assert_eq!(response.error_kind(), Some(ErrorKind::InvalidArgument));
    assert_eq!(channel.call_count(), 0);
}

#[tokio::test]
async fn inverted_date_range_fails_before_backend() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "get_orders_by_date",
        json!({"date_from": "2024-03-10", "date_to": "2024-03-01"}),
    )
    .await;

    assert_eq!(response.error_kind(), Some(ErrorKind::InvalidArgument));
    assert_eq!(channel.call_count(), 0);
    assert_eq!(channel.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_required_argument_makes_no_backend_call() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(&server, "create_partner", json!({"name": "Ana"})).await;

    let error = response.error.as_ref().expect("failure");
    assert_eq!(error.kind, ErrorKind::InvalidArgument);
    assert!(error.message.contains("'phone'"));
    assert_eq!(channel.call_count(), 0);
}

#[tokio::test]
async fn unknown_tool_is_reported() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(&server, "delete_everything", json!({})).await;

    assert_eq!(response.error_kind(), Some(ErrorKind::ToolNotFound));
    assert_eq!(channel.call_count(), 0);
}

#[tokio::test]
async fn category_children_are_direct_only() {
    // 1 ─┬─ 2 ── 4 (grandchild)
    //    └─ 3
    let categories = json!([
        {"id": 1, "name": "All", "parent_id": false},
        {"id": 2, "name": "Kitchen", "parent_id": [1, "All"]},
        {"id": 3, "name": "Garden", "parent_id": [1, "All"]},
        {"id": 4, "name": "Mugs", "parent_id": [2, "All / Kitchen"]},
    ]);
    let channel = ScriptedChannel::new(move |call| {
        let parent = clause_value(call, "parent_id").and_then(|v| v.as_i64());
        let rows: Vec<Value> = categories
            .as_array()
            .into_iter()
            .flatten()
            .filter(|c| c["parent_id"].get(0).and_then(Value::as_i64) == parent)
            .cloned()
            .collect();
        Ok(Value::Array(rows))
    });
    let server = server(channel);

    let response = call_tool(&server, "get_categories_children", json!({"parent_id": 1})).await;

    let payload = result(&response);
    let ids: Vec<i64> = payload["child_categories"]
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|c| c["id"].as_i64())
        .collect();
    assert_eq!(ids, [2, 3]);
    assert_eq!(payload["count"], json!(2));
}

#[tokio::test]
async fn root_category_has_no_parent() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(channel);

    let response = call_tool(&server, "get_category_parent", json!({"child_id": 1})).await;

    assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn all_products_is_idempotent_and_deduplicated() {
    let channel = ScriptedChannel::new(|call| match call.model.as_str() {
        "product.product" => Ok(json!([
            {"id": 10, "name": "Mug", "default_code": "MUG"},
            {"id": 11, "name": "Plate", "default_code": false},
        ])),
        "product.template" => Ok(json!([
            {"id": 5, "name": "Mug", "default_code": "MUG"},
            {"id": 6, "name": "Bowl", "default_code": "BOWL"},
        ])),
        other => Err(BridgeError::backend_fault(format!("unexpected model {other}"))),
    });
    let server = server(Arc::clone(&channel));

    let first = call_tool(&server, "get_all_products", json!({})).await;
    let second = call_tool(&server, "get_all_products", json!({})).await;

    assert_eq!(result(&first), result(&second));
    let ids: Vec<i64> = result(&first)["products"]
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, [10, 11, 6]);
    assert_eq!(channel.call_count(), 4);
}

#[tokio::test]
async fn concurrent_order_reads_do_not_mix_results() {
    let channel = ScriptedChannel::new(|call| {
        let id = clause_value(call, "id")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| BridgeError::backend_fault("no id clause"))?;
        Ok(json!([{
            "id": id,
            "name": format!("S{id:05}"),
            "access_url": format!("/my/orders/{id}"),
            "access_token": false
        }]))
    });
    let server = server(Arc::clone(&channel));

    let mut handles = Vec::new();
    for order_id in 1..=50_i64 {
        let server = Arc::clone(&server);
        handles.push(tokio::spawn(async move {
            let response =
                call_tool(&server, "get_sale_order_by_id", json!({"order_id": order_id})).await;
            (order_id, response)
        }));
    }

    for handle in handles {
        let (order_id, response) = handle.await.expect("task");
        let order = &result(&response)["sale_order"];
        assert_eq!(order["id"], json!(order_id));
        assert_eq!(order["name"], json!(format!("S{order_id:05}")));
        assert_eq!(
            order["link"],
            json!(format!("https://erp.test/my/orders/{order_id}"))
        );
    }
    assert_eq!(channel.call_count(), 50);
    assert_eq!(channel.logins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_session_is_recovered_transparently() {
    let channel = ScriptedChannel::new(|_| Ok(json!([{"id": 3, "name": "Garden"}])));
    let server = server(Arc::clone(&channel));
    call_tool(&server, "get_category_by_id", json!({"category_id": 3})).await;

    channel.expire_next.store(1, Ordering::SeqCst);
    let response = call_tool(&server, "get_category_by_id", json!({"category_id": 3})).await;

    assert_eq!(result(&response)["category"]["id"], json!(3));
    assert_eq!(channel.logins.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn repeated_expiry_escalates_to_backend_fault() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));
    channel.expire_next.store(2, Ordering::SeqCst);

    let response = call_tool(&server, "get_all_categories", json!({})).await;

    assert_eq!(response.error_kind(), Some(ErrorKind::BackendFault));
    assert_eq!(channel.logins.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn create_partner_returns_existing_match() {
    let channel = ScriptedChannel::new(|call| match call.method.as_str() {
        "search_read" => Ok(json!([{"id": 12, "name": "Ana", "phone": "+34600"}])),
        _ => Err(BridgeError::backend_fault("must not create")),
    });
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "create_partner",
        json!({"name": "Ana", "phone": "+34600"}),
    )
    .await;

    assert_eq!(result(&response)["status"], json!("ALREADY"));
    assert_eq!(channel.call_count(), 1);
}

#[tokio::test]
async fn create_partner_creates_then_rereads() {
    let channel = ScriptedChannel::new(|call| match call.method.as_str() {
        "create" => Ok(json!(31)),
        "search_read" => match clause_value(call, "id") {
            Some(id) => Ok(json!([{"id": id, "name": "Ana", "phone": "+34600"}])),
            None => Ok(json!([])),
        },
        other => Err(BridgeError::backend_fault(format!("unexpected {other}"))),
    });
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "create_partner",
        json!({"name": "Ana", "phone": "+34600", "email": "ana@x.com"}),
    )
    .await;

    let payload = result(&response);
    assert_eq!(payload["status"], json!("CREATE"));
    assert_eq!(payload["partner"]["id"], json!(31));
    let methods: Vec<String> = channel.calls().into_iter().map(|c| c.method).collect();
    assert_eq!(methods, ["search_read", "create", "search_read"]);
}

#[tokio::test]
async fn failed_order_line_names_the_created_order() {
    let channel = ScriptedChannel::new(|call| match (call.model.as_str(), call.method.as_str()) {
        ("product.product", "search_read") => Ok(json!([{"id": 9, "name": "Mug", "list_price": 12.5}])),
        ("sale.order", "create") => Ok(json!(501)),
        ("sale.order.line", "create") => {
            Err(BridgeError::backend_fault("Product is archived").with_detail("ValidationError"))
        }
        (model, method) => Err(BridgeError::backend_fault(format!("unexpected {model}.{method}"))),
    });
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "create_sale_order_by_product_id",
        json!({"partner_id": 4, "product_id": 9}),
    )
    .await;

    let error = response.error.as_ref().expect("failure");
    assert_eq!(error.kind, ErrorKind::BackendFault);
    assert!(error.detail.as_deref().is_some_and(|d| d.contains("501")));

    let line = channel
        .calls()
        .into_iter()
        .find(|c| c.model == "sale.order.line")
        .expect("line create attempted");
    assert_eq!(line.args[0]["product_uom_qty"], json!(1));
    assert_eq!(line.args[0]["price_unit"], json!(12.5));
}

#[tokio::test]
async fn top_customers_break_ties_by_partner_id() {
    let channel = ScriptedChannel::new(|_| {
        Ok(json!([
            {"id": 1, "partner_id": [8, "Zoe"], "amount_total": 100.0},
            {"id": 2, "partner_id": [3, "Ben"], "amount_total": 100.0},
            {"id": 3, "partner_id": [5, "Cai"], "amount_total": 40.0},
        ]))
    });
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "get_top_customers",
        json!({"date_from": "2024-01-01", "date_to": "2024-01-31", "limit": 2}),
    )
    .await;

    let payload = result(&response);
    let ids: Vec<i64> = payload["top_customers"]
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|c| c["partner_id"].as_i64())
        .collect();
    assert_eq!(ids, [3, 8]);
    assert_eq!(payload["date_to"], json!("2024-01-31"));
    assert_eq!(
        clause_value(&channel.calls()[0], "state"),
        Some(json!(["sale", "done"]))
    );
}

/// 1499 small orders for partner 1, then one large order for partner 99 at the highest id
fn skewed_orders() -> Vec<Value> {
    (1..=1_500_i64)
        .map(|id| {
            if id == 1_500 {
                json!({"id": id, "partner_id": [99, "Whale"], "amount_total": 1.0e9})
            } else {
                json!({"id": id, "partner_id": [1, "Regular"], "amount_total": 1.0})
            }
        })
        .collect()
}

#[tokio::test]
async fn top_customers_see_orders_beyond_first_page() {
    let channel = ScriptedChannel::new(|call| {
        let mut orders = skewed_orders();
        if call.kwargs.get("order") == Some(&json!("amount_total desc, id")) {
            orders.sort_by(|a, b| {
                let amount = |o: &Value| o["amount_total"].as_f64().unwrap_or(0.0);
                amount(b)
                    .total_cmp(&amount(a))
                    .then_with(|| a["id"].as_i64().cmp(&b["id"].as_i64()))
            });
        }
        let kwarg = |name: &str| call.kwargs.get(name).and_then(Value::as_u64);
        let offset = usize::try_from(kwarg("offset").unwrap_or(0)).expect("offset");
        let limit = kwarg("limit").map_or(orders.len(), |l| usize::try_from(l).expect("limit"));
        Ok(Value::Array(orders.into_iter().skip(offset).take(limit).collect()))
    });
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "get_top_customers",
        json!({"date_from": "2024-01-01", "date_to": "2024-12-31", "limit": 1}),
    )
    .await;

    let payload = result(&response);
    assert_eq!(payload["top_customers"][0]["partner_id"], json!(99));
    assert_eq!(payload["count"], json!(1));
    assert_eq!(payload["truncated"], json!(false));

    let calls = channel.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|call| call.kwargs.get("order") == Some(&json!("amount_total desc, id"))));
    assert_eq!(calls[1].kwargs.get("offset"), Some(&json!(1_000)));
}

#[tokio::test]
async fn top_limit_out_of_range_is_invalid() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(&server, "get_top_selling_products", json!({"limit": 500})).await;

    assert_eq!(response.error_kind(), Some(ErrorKind::InvalidArgument));
    assert_eq!(channel.call_count(), 0);
}

#[tokio::test]
async fn marketplace_lookup_uses_configured_field() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = call_tool(
        &server,
        "get_sale_orders_by_marketplace",
        json!({"marketplace": "Amazon"}),
    )
    .await;

    assert_eq!(result(&response)["count"], json!(0));
    assert_eq!(
        channel.calls()[0].args[0],
        json!([["x_studio_marketplace", "ilike", "Amazon"]])
    );
}

// ============================================================================
// MCP Server
// ============================================================================

fn rpc(raw: Value) -> JsonRpcRequest {
    serde_json::from_value(raw).expect("valid request")
}

#[tokio::test]
async fn tools_list_is_stable_and_offline() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(Arc::clone(&channel));

    let response = server
        .handle_request(rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
        .await
        .expect("response");
    let value = serde_json::to_value(&response).expect("serialize");

    let names: Vec<&str> = value["result"]["tools"]
        .as_array()
        .expect("tools")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    let expected: Vec<&str> = ToolName::ALL.iter().map(|t| t.as_str()).collect();
    assert_eq!(names, expected);
    assert_eq!(channel.call_count(), 0);
    assert_eq!(channel.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tools_call_wraps_envelope_in_structured_content() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(channel);

    let response = server
        .handle_request(rpc(json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/call",
            "params": {"name": "get_helpdesk_tickets", "arguments": {"partner_id": "four"}}
        })))
        .await
        .expect("response");
    let value = serde_json::to_value(&response).expect("serialize");

    let result = &value["result"];
    assert_eq!(result["isError"], json!(true));
    assert_eq!(result["structuredContent"]["requestId"], json!("abc"));
    assert_eq!(
        result["structuredContent"]["error"]["kind"],
        json!("invalid_argument")
    );
    let text: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().expect("text")).expect("json");
    assert_eq!(text, result["structuredContent"]);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let server = server(channel);

    let response = server
        .handle_request(rpc(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})))
        .await;

    assert!(response.is_none());
}

// ============================================================================
// HTTP Router
// ============================================================================

fn post_mcp(body: &Value, accept: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .header("accept", accept)
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("build request")
}

async fn send_and_parse(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_tools_without_backend() {
    let _guard = ENV_MUTEX.lock().await;
    std::env::remove_var("ODOOLINK_API_KEY");
    let channel = ScriptedChannel::new(|_| Ok(json!([])));
    let app = router(server(Arc::clone(&channel)));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("build request");
    let (status, json) = send_and_parse(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], json!("ok"));
    assert_eq!(json["tools"], json!(26));
    assert_eq!(json["has_session"], json!(false));
    assert_eq!(channel.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mcp_post_answers_json() {
    let _guard = ENV_MUTEX.lock().await;
    std::env::remove_var("ODOOLINK_API_KEY");
    let app = router(server(ScriptedChannel::new(|_| Ok(json!([])))));

    let body = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
    let (status, json) = send_and_parse(app, post_mcp(&body, "application/json")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], json!(1));
    assert_eq!(json["result"], json!({}));
}

#[tokio::test]
async fn mcp_post_answers_sse_when_requested() {
    let _guard = ENV_MUTEX.lock().await;
    std::env::remove_var("ODOOLINK_API_KEY");
    let app = router(server(ScriptedChannel::new(|_| Ok(json!([])))));

    let body = json!({"jsonrpc": "2.0", "id": 2, "method": "ping"});
    let response = app
        .oneshot(post_mcp(&body, "application/json, text/event-stream"))
        .await
        .expect("send request");

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/event-stream"));
    let bytes = response.into_body().collect().await.expect("collect").to_bytes();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.starts_with("event: message\n"));
    assert!(text.contains("data: {"));
    assert!(text.contains("\"id\":2"));
}

#[tokio::test]
async fn api_key_is_enforced_when_set() {
    let _guard = ENV_MUTEX.lock().await;
    std::env::set_var("ODOOLINK_API_KEY", "test-auth-key");
    let server = server(ScriptedChannel::new(|_| Ok(json!([]))));
    let body = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});

    let (status, _) = send_and_parse(router(Arc::clone(&server)), post_mcp(&body, "application/json")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut authorized = post_mcp(&body, "application/json");
    authorized.headers_mut().insert(
        "authorization",
        "Bearer test-auth-key".parse().expect("header value"),
    );
    let (status, json) = send_and_parse(router(Arc::clone(&server)), authorized).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], json!({}));

    let mut wrong = post_mcp(&body, "application/json");
    wrong.headers_mut().insert(
        "authorization",
        "Bearer nope".parse().expect("header value"),
    );
    let (status, _) = send_and_parse(router(server), wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    std::env::remove_var("ODOOLINK_API_KEY");
}
