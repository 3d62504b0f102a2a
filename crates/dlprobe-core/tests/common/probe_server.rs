//! Minimal HTTP/1.1 server for probe integration tests.
//!
//! Serves canned replies by path and records every request's headers so
//! tests can assert on what the probe sent (Range, Cookie, ...). Unknown
//! paths get an empty 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// `Content-Length` matching the body.
    Declared,
    /// No length header; body runs until the connection closes.
    Omitted,
    /// `Transfer-Encoding: chunked`.
    Chunked,
}

#[derive(Debug, Clone)]
pub struct Reply {
    status: &'static str,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    length: Length,
}

impl Reply {
    pub fn new(status: &'static str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            length: Length::Declared,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn length(mut self, length: Length) -> Self {
        self.length = length;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct ProbeServer {
    pub base: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ProbeServer {
    /// Starts a server in a background thread. `routes` receives the base URL
    /// (e.g. "http://127.0.0.1:12345") so replies can point at other paths.
    pub fn start<F>(routes: F) -> Self
    where
        F: FnOnce(&str) -> Vec<(&'static str, Reply)>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let base = format!("http://127.0.0.1:{}", port);
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes(&base)
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || handle(stream, &routes, &recorded));
            }
        });
        Self { base, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Reply>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    let Some(request) = parse_request(&String::from_utf8_lossy(&data)) else {
        return;
    };
    let reply = routes.get(&request.path).cloned();
    recorded.lock().unwrap().push(request);

    let reply = reply.unwrap_or_else(|| Reply::new("404 Not Found"));
    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", reply.status);
    for (k, v) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", k, v));
    }
    match reply.length {
        Length::Declared => head.push_str(&format!("Content-Length: {}\r\n", reply.body.len())),
        Length::Chunked => head.push_str("Transfer-Encoding: chunked\r\n"),
        Length::Omitted => {}
    }
    head.push_str("\r\n");

    // The probe hangs up after the first body byte; write errors are expected.
    let _ = stream.write_all(head.as_bytes());
    match reply.length {
        Length::Chunked => {
            if !reply.body.is_empty() {
                let _ = stream.write_all(format!("{:x}\r\n", reply.body.len()).as_bytes());
                let _ = stream.write_all(&reply.body);
                let _ = stream.write_all(b"\r\n");
            }
            let _ = stream.write_all(b"0\r\n\r\n");
        }
        Length::Declared | Length::Omitted => {
            let _ = stream.write_all(&reply.body);
        }
    }
    let _ = stream.flush();
}

fn parse_request(raw: &str) -> Option<RecordedRequest> {
    let mut lines = raw.split("\r\n");
    let request_line = lines.next()?;
    let path = request_line.split_whitespace().nth(1)?.to_string();
    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    Some(RecordedRequest { path, headers })
}
