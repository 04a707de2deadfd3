// Shared helpers for tests that talk to a scripted loopback server.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use pinoader::{Config, HttpClient, Resolve};

/// What the server does with one incoming request.
#[allow(dead_code)] // Not every test file uses every variant
pub enum Reply {
    /// Write these bytes back.
    Send(&'static str),
    /// Read the request, then drop the connection without answering.
    Hangup,
}

/// A loopback server that plays a fixed script.
///
/// Each entry of the script is one accepted connection; each `Reply` on it
/// answers one request. The connection is closed after its last reply.
pub struct ScriptedServer {
    pub port: u16,
    accepted: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedServer {
    pub fn start(script: Vec<Vec<Reply>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let port = listener.local_addr().expect("listener address").port();
        let accepted = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_accepted = Arc::clone(&accepted);
        let server_requests = Arc::clone(&requests);
        thread::spawn(move || {
            for replies in script {
                let Ok((mut socket, _)) = listener.accept() else {
                    return;
                };
                server_accepted.fetch_add(1, Ordering::SeqCst);
                for reply in replies {
                    let Some(request) = read_request(&mut socket) else {
                        break;
                    };
                    server_requests
                        .lock()
                        .expect("request log poisoned")
                        .push(request);
                    match reply {
                        Reply::Send(bytes) => {
                            if socket.write_all(bytes.as_bytes()).is_err() {
                                break;
                            }
                        }
                        Reply::Hangup => break,
                    }
                }
            }
        });

        Self {
            port,
            accepted,
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Connections accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Request heads received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Request paths received so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.split(' ').nth(1).map(str::to_string))
            .collect()
    }
}

/// Reads one request head, up to and including the blank line.
fn read_request(socket: &mut impl Read) -> Option<String> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match socket.read(&mut byte) {
            Ok(0) | Err(_) => return None,
            Ok(_) => head.push(byte[0]),
        }
    }
    Some(String::from_utf8_lossy(&head).into_owned())
}

/// Resolver that answers every name with loopback and counts lookups.
pub struct LoopbackResolver {
    pub lookups: Arc<AtomicUsize>,
}

impl Resolve for LoopbackResolver {
    fn lookup_ipv4(&self, _host: &str) -> anyhow::Result<Ipv4Addr> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Ipv4Addr::LOCALHOST)
    }
}

/// A client with short timeouts whose DNS lookups never leave the process.
#[allow(dead_code)]
pub fn test_client() -> (HttpClient, Arc<AtomicUsize>) {
    let lookups = Arc::new(AtomicUsize::new(0));
    let config = Config {
        timeout_seconds: 2,
        ..Default::default()
    };
    let client = HttpClient::with_resolver(
        config,
        Box::new(LoopbackResolver {
            lookups: Arc::clone(&lookups),
        }),
    )
    .expect("client initialization");
    (client, lookups)
}
