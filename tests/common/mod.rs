#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::web::{self, Bytes, Data};
use actix_web::{rt, App, HttpRequest, HttpResponse, HttpServer};
use kubegate::authz::config::ReviewerConfig;
use kubegate::config::CommonConfig;

/// A request as seen by the fake API server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Raw request target, `path[?query]`, exactly as sent on the wire.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn review(allowed: bool) -> Self {
        Self::json(
            201,
            &format!(
                r#"{{"kind":"SubjectAccessReview","apiVersion":"authorization.k8s.io/v1","status":{{"allowed":{allowed}}}}}"#
            ),
        )
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Handler = dyn Fn(&Recorded) -> Reply + Send + Sync;

struct ServerContext {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Fake API server answering every request with the handler's reply. It runs on its own
/// actix system thread and is stopped on drop.
pub struct FakeApiServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: ServerHandle,
}

impl FakeApiServer {
    pub async fn start<H>(handler: H) -> Self
    where
        H: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let handler: Arc<Handler> = Arc::new(handler);
        let requests = Arc::new(Mutex::new(vec![]));

        let (tx, rx) = mpsc::channel();
        let ctx_requests = requests.clone();
        thread::spawn(move || {
            rt::System::new().block_on(async move {
                let ctx = Arc::new(ServerContext {
                    handler,
                    requests: ctx_requests,
                });
                let srv = HttpServer::new(move || {
                    App::new()
                        .app_data(Data::new(ctx.clone()))
                        .default_service(web::route().to(handle))
                })
                .workers(1)
                .disable_signals()
                .bind("127.0.0.1:0")
                .unwrap();

                let addr = srv.addrs()[0];
                let srv = srv.run();
                tx.send((addr, srv.handle())).unwrap();
                srv.await
            })
        });
        let (addr, handle) = rx.recv().unwrap();

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn reviewer_config(&self, token: &str) -> ReviewerConfig {
        let mut cfg = <ReviewerConfig as CommonConfig>::default();
        cfg.server = self.url();
        cfg.token = token.to_string();
        cfg.timeout = "5s".to_string();
        cfg.complete(Path::new(".")).unwrap();
        cfg
    }
}

impl Drop for FakeApiServer {
    fn drop(&mut self) {
        // The stop command is sent right away, the returned future only waits for it.
        _ = self.handle.stop(false);
    }
}

async fn handle(req: HttpRequest, body: Bytes, ctx: Data<Arc<ServerContext>>) -> HttpResponse {
    let target = match req.uri().path_and_query() {
        Some(pq) => pq.as_str().to_string(),
        None => req.path().to_string(),
    };
    let headers = req
        .headers()
        .iter()
        .map(|(key, value)| {
            (
                key.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let recorded = Recorded {
        method: req.method().as_str().to_string(),
        target,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    };

    let reply = (ctx.handler)(&recorded);
    ctx.requests.lock().unwrap().push(recorded);

    if let Some(delay) = reply.delay {
        rt::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap();
    HttpResponse::build(status)
        .content_type("application/json")
        .body(reply.body)
}
