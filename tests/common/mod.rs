//! Blocking mock of the blog API on an ephemeral port.

use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;
use tiny_http::{Response, Server};

/// What the mock saw for one request
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

/// Route handler: (method, path) -> (status, raw body)
pub type Handler = dyn Fn(&str, &str) -> (u16, String) + Send + Sync;

pub struct MockServer {
    server: Arc<Server>,
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    pub fn start(handler: Box<Handler>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let worker_server = Arc::clone(&server);
        let worker_requests = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for mut request in worker_server.incoming_requests() {
                let header = |name: &'static str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv(name))
                        .map(|h| h.value.as_str().to_string())
                };
                let authorization = header("Authorization");
                let content_type = header("Content-Type");

                let mut raw = String::new();
                let _ = request.as_reader().read_to_string(&mut raw);
                let body = serde_json::from_str(&raw).ok();

                let method = request.method().as_str().to_string();
                let path = request.url().to_string();
                worker_requests.lock().unwrap().push(Recorded {
                    method: method.clone(),
                    path: path.clone(),
                    authorization,
                    content_type,
                    body,
                });

                let (status, text) = handler(&method, &path);
                let response = Response::from_string(text).with_status_code(status);
                let _ = request.respond(response);
            }
        });

        Self {
            server,
            base_url: format!("http://{addr}"),
            requests,
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Responses a healthy server gives; every unmatched route answers 200 + success
pub fn happy_route(method: &str, path: &str) -> (u16, String) {
    match (method, path) {
        ("POST", "/api/users/register") => (
            201,
            r#"{"success":true,"data":{"user":{"id":"u1"}}}"#.to_string(),
        ),
        ("POST", "/api/users/login") => {
            (200, r#"{"success":true,"data":{"token":"tok"}}"#.to_string())
        }
        ("POST", "/api/blogs") => (
            201,
            r#"{"success":true,"data":{"blog":{"id":"b1"}}}"#.to_string(),
        ),
        // Create Category and Create Comment expect 201 as well
        ("POST", "/api/categories") => (201, r#"{"success":true}"#.to_string()),
        ("POST", "/api/comments") => (201, r#"{"success":true}"#.to_string()),
        _ => (200, r#"{"success":true}"#.to_string()),
    }
}
