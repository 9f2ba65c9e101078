//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each accepted connection consumes the next `Reply` from a script; once the
//! script is used up the last reply repeats. Every connection is counted so
//! tests can assert how many attempts reached the server.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this status and body.
    Status(u16, Vec<u8>),
    /// Read the request, then close without responding.
    Close,
    /// Wait this long before sending 200 with the body.
    Stall(Duration, Vec<u8>),
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Reply::Status(200, body.to_vec())
    }

    pub fn status(code: u16) -> Self {
        Reply::Status(code, format!("status {}", code).into_bytes())
    }
}

pub struct ScriptedServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl ScriptedServer {
    /// Number of connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(script: Vec<Reply>) -> ScriptedServer {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let script = Arc::new(Mutex::new(VecDeque::from(script)));
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            hits_srv.fetch_add(1, Ordering::SeqCst);
            let reply = {
                let mut script = script.lock().unwrap();
                if script.len() > 1 {
                    script.pop_front().unwrap()
                } else {
                    script.front().cloned().unwrap()
                }
            };
            thread::spawn(move || handle(stream, reply));
        }
    });
    ScriptedServer {
        url: format!("http://127.0.0.1:{}/resource", port),
        hits,
    }
}

/// Address of a port that was just released, so connecting to it is refused.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, reply: Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    match reply {
        Reply::Status(code, body) => write_response(&mut stream, code, &body),
        Reply::Close => {}
        Reply::Stall(wait, body) => {
            thread::sleep(wait);
            write_response(&mut stream, 200, &body);
        }
    }
}

fn write_response(stream: &mut TcpStream, code: u16, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        code,
        reason(code),
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        301 => "Moved Permanently",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
