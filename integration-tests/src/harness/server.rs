use crate::harness::{CapturedEvent, init_test_tracing};
use devway_core::conf::load_config_str;
use devway_core::server::build_pingora_server;
use reqwest::blocking::{Client, RequestBuilder};
use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a running devway test server.
pub struct TestServer {
    base_url: String,
    port: u16,
    client: Client,
}

impl TestServer {
    /// Start devway with the built-in rule table forwarding to `upstream`.
    pub fn start(upstream: &str) -> Self {
        Self::start_with(upstream, "")
    }

    /// Start devway with the built-in rule table, serving the fixture
    /// frontend for unmatched paths.
    pub fn start_with_static(upstream: &str) -> Self {
        let dir = fixtures_public();
        let extra = format!(
            "[static_files]\ndir = '{}'\nspa_fallback = true\n",
            dir.display()
        );
        Self::start_with(upstream, &extra)
    }

    /// Start devway with `extra` appended to the generated TOML.
    ///
    /// The listen port is allocated dynamically, so servers can run in
    /// parallel within one test binary.
    pub fn start_with(upstream: &str, extra: &str) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let port = free_port();
        let toml = format!(
            "upstream = \"{upstream}\"\n\n[server]\nlisten = \"127.0.0.1:{port}\"\nthreads = 1\n\n{extra}"
        );

        let cfg = load_config_str(&toml, None).expect("failed to load test config");
        let server = build_pingora_server(cfg).expect("failed to build devway server");

        // Run server in background thread
        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{port}");

        // Wait for server to accept connections
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            port,
            client,
        }
    }

    /// Convenience helper for GET requests.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://127.0.0.1:{}{}", self.port, path)
    }

    /// Wait until a captured event matches `pred`, or panic.
    pub fn wait_for_event<F>(&self, pred: F) -> CapturedEvent
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(2);

        loop {
            if let Some(event) = events().lock().unwrap().iter().find(|e| pred(e)) {
                return event.clone();
            }
            if Instant::now() > deadline {
                panic!("expected tracing event was not emitted");
            }
            thread::sleep(Duration::from_millis(20));
        }
    }
}

/// Directory holding the fixture frontend build.
pub fn fixtures_public() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("public")
}

/// Poll until the server responds (or panic).
fn wait_for_server(listen_addr: &str) {
    let addr = listen_addr.strip_prefix("http://").unwrap_or(listen_addr);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", listen_addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
