use anyhow::Result;
use oha_client::{
    commands::{self, download::Resource, manage::Prompt, Context},
    config::ConnectionConfig,
    error::AuthError,
    transport::Transport,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::{fs, thread};
use tempfile::TempDir;

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    target: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

/// Plain-HTTP stand-in for the OHA server, answering one request per
/// connection and recording everything it sees
struct FakeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeServer {
    fn start<F>(respond: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, Vec<u8>) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle(stream, &respond, &seen);
            }
        });
        FakeServer {
            base_url: format!("http://127.0.0.1:{port}/api"),
            requests,
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Requests are recorded before the answer goes out, so the client never
/// observes a response the test cannot see yet
fn handle<F>(stream: TcpStream, respond: &F, seen: &Mutex<Vec<Recorded>>) -> Option<()>
where
    F: Fn(&Recorded) -> (u16, Vec<u8>),
{
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.insert(k.trim().to_lowercase(), v.trim().to_string());
        }
    }
    let len: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; len];
    reader.read_exact(&mut body).ok()?;

    let req = Recorded {
        method,
        target,
        headers,
        body,
    };
    let (status, payload) = respond(&req);
    seen.lock().unwrap().push(req);

    let mut stream = stream;
    let head = format!(
        "HTTP/1.1 {status} OK\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n",
        payload.len()
    );
    stream.write_all(head.as_bytes()).ok()?;
    stream.write_all(&payload).ok()?;
    stream.flush().ok()
}

/// Answers `/login` with a token and hands everything else to `rest`
fn with_login<F>(rest: F) -> impl Fn(&Recorded) -> (u16, Vec<u8>) + Send + Sync + 'static
where
    F: Fn(&Recorded) -> (u16, Vec<u8>) + Send + Sync + 'static,
{
    move |req: &Recorded| {
        if req.target == "/api/login" {
            (200, br#"{"token":"tok-1"}"#.to_vec())
        } else {
            rest(req)
        }
    }
}

fn config() -> ConnectionConfig {
    ConnectionConfig::new("oha.example.com", "8443", "/api", "alice", "correct-horse-battery")
        .unwrap()
}

fn json_body(req: &Recorded) -> Value {
    serde_json::from_slice(&req.body).unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_submit_posts_lines_with_bearer_token() {
    let server = FakeServer::start(with_login(|_| (200, br#"{"inserted":2}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "hashes.txt", b"h1\nh2");

    let mut out: Vec<u8> = Vec::new();
    commands::submit::run(&ctx, &mut out, "0", &file).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);

    assert_eq!(reqs[0].method, "POST");
    assert_eq!(reqs[0].target, "/api/login");
    assert!(!reqs[0].headers.contains_key("authorization"));
    assert_eq!(
        json_body(&reqs[0]),
        json!({"username": "alice", "password": "correct-horse-battery"})
    );

    assert_eq!(reqs[1].method, "POST");
    assert_eq!(reqs[1].target, "/api/found");
    assert_eq!(reqs[1].headers["authorization"], "Bearer tok-1");
    assert_eq!(reqs[1].headers["content-type"], "application/json");
    assert_eq!(
        json_body(&reqs[1]),
        json!({"algorithm": "0", "hash-plain": ["h1", "h2"]})
    );

    assert_eq!(out, b"{\"inserted\":2}\n");
}

#[tokio::test]
async fn test_refused_login_stops_before_the_action() {
    let server = FakeServer::start(|_| (401, br#"{"error":"bad password for alice"}"#.to_vec()));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    let err = commands::status::run(&ctx, &mut out).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AuthError>(),
        Some(AuthError::InvalidCredentials)
    ));
    assert!(!err.to_string().contains("alice"));
    assert_eq!(server.requests().len(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_register_skips_login() {
    let server = FakeServer::start(|_| (200, br#"{"message":"registered"}"#.to_vec()));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    commands::register::run(&ctx, &mut out).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].target, "/api/register");
    assert!(!reqs[0].headers.contains_key("authorization"));
    assert_eq!(json_body(&reqs[0])["username"], "alice");
    assert_eq!(out, b"{\"message\":\"registered\"}\n");
}

#[tokio::test]
async fn test_search_renders_matches() {
    let server = FakeServer::start(with_login(|_| {
        (
            200,
            br#"{"found":[{"algorithm":"md5","hash":"abc","plaintext":"pw1"}]}"#.to_vec(),
        )
    }));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "lookup.txt", b"abc\r\ndef\r\n");

    let mut out: Vec<u8> = Vec::new();
    commands::search::run(&ctx, &mut out, &file).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs[1].target, "/api/search");
    assert_eq!(json_body(&reqs[1]), json!({"data": ["abc", "def"]}));
    assert_eq!(String::from_utf8(out).unwrap(), "md5 | abc:pw1\n");
}

#[tokio::test]
async fn test_search_sentinel_prints_nothing() {
    let server = FakeServer::start(with_login(|_| (200, br#"{"found":"[]"}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "lookup.txt", b"abc\n");

    let mut out: Vec<u8> = Vec::new();
    commands::search::run(&ctx, &mut out, &file).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_created_list_reads_back_unchanged() {
    let store: Arc<Mutex<HashMap<String, Vec<u8>>>> = Arc::default();
    let server_store = Arc::clone(&store);
    let server = FakeServer::start(with_login(move |req| {
        let mut lists = server_store.lock().unwrap();
        match (req.method.as_str(), req.target.as_str()) {
            ("POST", target) if target.starts_with("/api/lists?name=") => {
                let name = target.trim_start_matches("/api/lists?name=").to_string();
                lists.insert(name, req.body.clone());
                (200, br#"{"message":"created"}"#.to_vec())
            }
            ("GET", target) => {
                let name = target.trim_start_matches("/api/lists/");
                (200, lists.get(name).cloned().unwrap_or_default())
            }
            _ => (404, b"{}".to_vec()),
        }
    }));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let content: &[u8] = b"password\r\nletmein\n\xff\xfe raw\n";
    let file = write_file(&dir, "words.txt", content);

    let mut out: Vec<u8> = Vec::new();
    commands::create::run(&ctx, &mut out, "mywords", &file).await.unwrap();
    assert_eq!(store.lock().unwrap()["mywords"], content);

    let mut out: Vec<u8> = Vec::new();
    commands::lists::run(&ctx, &mut out, Some("mywords")).await.unwrap();
    let mut expected = content.to_vec();
    expected.push(b'\n');
    assert_eq!(out, expected);
}

#[tokio::test]
async fn test_update_posts_to_named_list() {
    let server = FakeServer::start(with_login(|_| (200, br#"{"message":"updated"}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "words.txt", b"a\nb\n");

    let mut out: Vec<u8> = Vec::new();
    commands::update::run(&ctx, &mut out, "mywords", &file).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs[1].method, "POST");
    assert_eq!(reqs[1].target, "/api/lists/mywords");
    assert_eq!(reqs[1].body, b"a\nb\n");
}

#[tokio::test]
async fn test_lists_index_rendering() {
    let server = FakeServer::start(with_login(|_| {
        (
            200,
            br#"{"files":[{"name":"a","size":3,"creation_time":"2024-05-01"}]}"#.to_vec(),
        )
    }));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    commands::lists::run(&ctx, &mut out, None).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Private Files Listing:"));
    assert!(text.contains("Name: a | Size: 3 | Created: 2024-05-01"));
    assert_eq!(server.requests()[1].target, "/api/lists");
}

#[tokio::test]
async fn test_lists_index_error_body_is_printed_raw() {
    let server = FakeServer::start(with_login(|_| {
        (403, br#"{"error":"permission denied"}"#.to_vec())
    }));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    commands::lists::run(&ctx, &mut out, None).await.unwrap();
    assert_eq!(out, b"{\"error\":\"permission denied\"}\n");
}

#[tokio::test]
async fn test_submit_sends_latin1_plaintext_lossily() {
    let server = FakeServer::start(with_login(|_| (200, br#"{"inserted":1}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "founds.txt", b"5f4dcc3b:caf\xe9\n");

    let mut out: Vec<u8> = Vec::new();
    commands::submit::run(&ctx, &mut out, "0", &file).await.unwrap();
    assert_eq!(
        json_body(&server.requests()[1]),
        json!({"algorithm": "0", "hash-plain": ["5f4dcc3b:caf\u{fffd}"]})
    );
}

#[tokio::test]
async fn test_unreadable_hash_file_skips_login() {
    let server = FakeServer::start(with_login(|_| (200, b"{}".to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let dir = TempDir::new().unwrap();
    let subdir = dir.path().join("hashes.d");
    fs::create_dir(&subdir).unwrap();
    let path = subdir.to_str().unwrap();

    let mut out: Vec<u8> = Vec::new();
    assert!(commands::search::run(&ctx, &mut out, path).await.is_err());
    assert!(commands::submit::run(&ctx, &mut out, "0", path).await.is_err());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_download_builds_resource_path() {
    let server = FakeServer::start(with_login(|_| (200, b"word1\nword2".to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    commands::download::run(&ctx, &mut out, Resource::Rules, "10", Some("offset=5"))
        .await
        .unwrap();
    let reqs = server.requests();
    assert_eq!(reqs[1].method, "GET");
    assert_eq!(reqs[1].target, "/api/download/rules/10?offset=5");
    assert_eq!(reqs[1].headers["authorization"], "Bearer tok-1");
    assert_eq!(out, b"word1\nword2\n");
}

#[tokio::test]
async fn test_health_pretty_prints_and_rejects_non_json() {
    let server = FakeServer::start(with_login(|_| (200, br#"{"version":"1.2","ok":true}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let mut out: Vec<u8> = Vec::new();
    commands::health::run(&ctx, &mut out).await.unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\n  \"ok\": true,\n  \"version\": \"1.2\"\n}\n"
    );

    let server = FakeServer::start(with_login(|_| (502, b"Bad Gateway".to_vec())));
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    assert!(commands::health::run(&ctx, &mut Vec::<u8>::new()).await.is_err());
}

#[tokio::test]
async fn test_server_error_body_is_printed_verbatim() {
    let server = FakeServer::start(with_login(|_| (500, br#"{"error":"db down"}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());
    let mut out: Vec<u8> = Vec::new();
    commands::status::run(&ctx, &mut out).await.unwrap();
    assert_eq!(out, b"{\"error\":\"db down\"}\n");
}

struct Answers(Vec<&'static str>);

impl Prompt for Answers {
    fn ask(&mut self, _question: &str) -> Result<String> {
        Ok(self.0.remove(0).to_string())
    }
}

#[tokio::test]
async fn test_manage_submits_prompted_flags() {
    let server = FakeServer::start(with_login(|_| (200, br#"{"message":"ok"}"#.to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    let mut answers = Answers(vec!["yes", "n", "n", "Y"]);
    commands::manage::run(&ctx, &mut out, "5", &mut answers)
        .await
        .unwrap();

    let reqs = server.requests();
    assert_eq!(reqs[1].target, "/api/manage");
    assert_eq!(
        json_body(&reqs[1]),
        json!({
            "userID": 5,
            "canLogin": true,
            "canUpload": false,
            "canSearch": false,
            "canManage": true
        })
    );
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_server() {
    let server = FakeServer::start(with_login(|_| (200, b"{}".to_vec())));
    let cfg = config();
    let ctx = Context::with_transport(&cfg, Transport::new(&server.base_url, false).unwrap());

    let mut out: Vec<u8> = Vec::new();
    assert!(commands::download::run(&ctx, &mut out, Resource::Wordlist, "4a", None)
        .await
        .is_err());
    assert!(commands::download::run(&ctx, &mut out, Resource::Masks, "1", Some("a b"))
        .await
        .is_err());
    assert!(commands::search::run(&ctx, &mut out, "list one.txt").await.is_err());
    assert!(commands::lists::run(&ctx, &mut out, Some("../etc")).await.is_err());
    assert!(server.requests().is_empty());
}
