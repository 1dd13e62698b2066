//! demos/mock_backend.rs
//! Stand-in for the employee directory API.
//! Run: cargo run --example mock_backend -- [port]
//!
//! Env: BASE_DELAY_MS, JITTER_MS, FAIL_PCT (search failures), DB_DOWN=1,
//! PERF_QUERIES (default 100).

use hyper::{
    body::Bytes,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use rand::Rng;
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::time::sleep;

#[derive(Clone)]
struct BackendState {
    req_counter:  Arc<AtomicU64>,
    base_delay:   u64,
    jitter_ms:    u64,
    fail_pct:     f64,
    db_down:      bool,
    perf_queries: u32,
    employees:    u64,
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

async fn simulated_query(state: &BackendState) -> f64 {
    let start = Instant::now();
    let delay = state.base_delay + rand::thread_rng().gen_range(0..=state.jitter_ms);
    if delay > 0 {
        sleep(Duration::from_millis(delay)).await;
    }
    (start.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

// ——————————————————————————————————————————
// Request handler
async fn handle(req: Request<Body>, state: BackendState) -> Result<Response<Body>, Infallible> {
    let n = state.req_counter.fetch_add(1, Ordering::SeqCst) + 1;
    let path = req.uri().path().to_owned();
    println!("#{} {} {}", n, req.method(), path);

    let response = match path.as_str() {
        "/" => json_response(
            StatusCode::OK,
            json!({"message": "Employee Directory API is running"}),
        ),
        "/health" => json_response(
            StatusCode::OK,
            json!({"status": "healthy", "service": "backend"}),
        ),
        "/db-test" if state.db_down => json_response(
            StatusCode::OK,
            json!({"status": "error", "message": "Database connection failed: connection refused"}),
        ),
        "/db-test" => json_response(
            StatusCode::OK,
            json!({"status": "connected", "message": "Database connection successful"}),
        ),
        "/db-health" if state.db_down => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"detail": "Database unavailable"}),
        ),
        "/db-health" => json_response(
            StatusCode::OK,
            json!({"status": "healthy", "database": "postgresql", "message": "Database connection successful"}),
        ),
        "/search/john-smith" => {
            let elapsed = simulated_query(&state).await;
            if state.fail_pct > 0.0 && rand::thread_rng().gen_bool(state.fail_pct / 100.0) {
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"detail": "Database error occurred while searching for employees"}),
                )
            } else {
                json_response(
                    StatusCode::OK,
                    json!({"results_count": state.employees, "execution_time_ms": elapsed}),
                )
            }
        }
        "/performance/search" => performance_stream(state),
        _ => json_response(StatusCode::NOT_FOUND, json!({"detail": "Not Found"})),
    };

    Ok(response)
}

fn performance_stream(state: BackendState) -> Response<Body> {
    let (mut sender, body) = Body::channel();

    tokio::spawn(async move {
        let total = state.perf_queries.max(1);
        let mut total_time = 0.0;

        for current in 1..=total {
            let query_time = simulated_query(&state).await;
            total_time += query_time;
            let status = if current < total { "running" } else { "completed" };
            let frame = json!({
                "progress": current,
                "total": total,
                "percentage": ((current as f64 / total as f64) * 1000.0).round() / 10.0,
                "current_query_time": query_time,
                "average_time": total_time / current as f64,
                "total_time": total_time,
                "results_count": state.employees,
                "status": status,
            });
            if sender.send_data(Bytes::from(format!("data: {}\n\n", frame))).await.is_err() {
                return;
            }
            sleep(Duration::from_millis(50)).await;
        }

        let summary = json!({
            "status": "completed",
            "total_execution_time_ms": total_time,
            "average_time_ms": total_time / total as f64,
            "queries_executed": total,
            "results_count": state.employees,
        });
        let _ = sender.send_data(Bytes::from(format!("data: {}\n\n", summary))).await;
    });

    let mut response = Response::new(body);
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("text/plain"),
    );
    response
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ——————————————————————————————————————————
// Main
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port: u16 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "8000".into())
        .parse()?;

    let state = BackendState {
        req_counter: Arc::new(AtomicU64::new(0)),
        base_delay: env_or("BASE_DELAY_MS", 20),
        jitter_ms: env_or("JITTER_MS", 40),
        fail_pct: env_or("FAIL_PCT", 0.0),
        db_down: env_or("DB_DOWN", 0u8) != 0,
        perf_queries: env_or("PERF_QUERIES", 100),
        employees: rand::thread_rng().gen_range(1..=60),
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let make_svc = make_service_fn(move |_conn| {
        let st = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| handle(req, st.clone())))
        }
    });

    println!("Mock employee directory API on http://{}", addr);

    Server::bind(&addr).serve(make_svc).await?;
    Ok(())
}
