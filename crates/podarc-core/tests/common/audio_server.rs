//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table (body, 404, or redirect per path) and counts
//! every request, so tests can assert that an idempotent second run makes
//! zero network requests.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// What a path serves.
#[derive(Debug, Clone)]
pub enum Route {
    Ok(Vec<u8>),
    NotFound,
    Redirect(String),
}

/// Handle to a running test server.
#[derive(Clone)]
pub struct AudioServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl AudioServer {
    /// Full URL for a path on this server (path must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Total requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. GET only; unknown paths get 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> AudioServer {
    let routes: HashMap<String, Route> = routes
        .into_iter()
        .map(|(path, route)| (path.to_string(), route))
        .collect();
    let routes = Arc::new(routes);

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));

    {
        let routes = Arc::clone(&routes);
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });
    }

    AudioServer {
        base_url: format!("http://127.0.0.1:{port}"),
        hits,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match request_path(request) {
        Some(p) => p,
        None => return,
    };

    hits.fetch_add(1, Ordering::SeqCst);

    match routes.get(path) {
        Some(Route::Ok(body)) => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Redirect(location)) => {
            let response = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = stream.write_all(response.as_bytes());
        }
        Some(Route::NotFound) | None => {
            let _ = stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
}

/// Path of the request line ("GET /x HTTP/1.1" -> "/x").
fn request_path(request: &str) -> Option<&str> {
    let line = request.lines().next()?;
    line.split_whitespace().nth(1)
}
