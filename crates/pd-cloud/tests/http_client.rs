//! `ApiClient` against a loopback server that records requests and replies
//! from a script, one connection per request.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use pd_cloud::*;
use pd_core::{JobRef, ProjectRef, RemoteStatus};
use serde_json::json;

#[derive(Debug)]
struct Recorded {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

struct Stub {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl Stub {
    /// Serve one scripted `(status, body)` reply per incoming request.
    fn start(script: impl FnOnce(&str) -> Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let replies = script(&base_url);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let handle = std::thread::spawn(move || {
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().unwrap();
                let request = read_request(&stream);
                recorded.lock().unwrap().push(request);
                let reply = format!(
                    "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).unwrap();
            }
        });

        Self {
            base_url,
            requests,
            handle,
        }
    }

    fn finish(self) -> Vec<Recorded> {
        self.handle.join().unwrap();
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

fn read_request(stream: &TcpStream) -> Recorded {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap().to_string();
    let path = parts.next().unwrap().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').unwrap();
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    let mut body = Vec::new();
    if let Some(length) = headers.get("content-length") {
        body.resize(length.parse().unwrap(), 0);
        reader.read_exact(&mut body).unwrap();
    } else if headers.get("transfer-encoding").map(String::as_str) == Some("chunked") {
        loop {
            let mut size = String::new();
            reader.read_line(&mut size).unwrap();
            let size = usize::from_str_radix(size.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    }

    Recorded {
        method,
        path,
        headers,
        body,
    }
}

fn client_with_key(base_url: &str) -> ApiClient {
    ApiClient::new(ApiClientConfig {
        base_url: base_url.to_string(),
        ..ApiClientConfig::default().with_api_token("secret-key")
    })
    .unwrap()
}

fn project() -> ProjectRef {
    ProjectRef::new("ladybug-tools", "demo").unwrap()
}

#[test]
fn get_job_sends_api_key_and_reads_status() {
    let stub = Stub::start(|_| {
        vec![(
            200,
            json!({
                "id": "j1",
                "status": {
                    "type": "JobStatus",
                    "status": "Pre-Processing",
                    "started_at": "2024-05-01T10:00:00Z"
                }
            })
            .to_string(),
        )]
    });
    let client = client_with_key(&stub.base_url);

    let info = client.get_job(&project().job("j1").unwrap()).unwrap();
    assert_eq!(info.id, "j1");
    assert_eq!(info.status.status, RemoteStatus::PreProcessing);

    let requests = stub.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/projects/ladybug-tools/demo/jobs/j1");
    assert_eq!(requests[0].header("x-pollination-token"), Some("secret-key"));
    assert_eq!(requests[0].header("authorization"), None);
}

#[test]
fn create_job_posts_body_with_bearer_token() {
    let stub = Stub::start(|_| vec![(201, r#"{"id": "job-9"}"#.to_string())]);
    let client = ApiClient::new(ApiClientConfig {
        base_url: stub.base_url.clone(),
        access_token: Some("session".to_string()),
        ..ApiClientConfig::default()
    })
    .unwrap();

    let mut args = JobArguments::new();
    args.integer("cpu-count", 50)
        .artifact("model", ArtifactRef::new("inputs/model.hbjson"));
    let body = CreateJobBody {
        source: client.recipe_source(&pd_core::RecipeRef::daylight_factor()),
        name: "test".to_string(),
        description: None,
        arguments: vec![args.to_wire()],
    };

    let id = client.create_job(&project(), &body).unwrap();
    assert_eq!(id, "job-9");

    let base_url = stub.base_url.clone();
    let requests = stub.finish();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/projects/ladybug-tools/demo/jobs");
    assert_eq!(requests[0].header("authorization"), Some("Bearer session"));
    assert_eq!(requests[0].header("x-pollination-token"), None);
    assert_eq!(requests[0].json(), serde_json::to_value(&body).unwrap());
    assert_eq!(
        requests[0].json()["source"],
        format!(
            "{}/registries/ladybug-tools/recipe/daylight-factor/latest",
            base_url
        )
    );
}

#[test]
fn non_success_status_becomes_http_error() {
    let stub = Stub::start(|_| {
        vec![
            (404, r#"{"detail": "Job not found"}"#.to_string()),
            (401, r#"{"message": "Invalid API token"}"#.to_string()),
        ]
    });
    let client = client_with_key(&stub.base_url);
    let job = JobRef::new("ladybug-tools", "demo", "missing").unwrap();

    let err = client.get_job(&job).unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(
        matches!(err, CloudError::Http { status: 404, ref message } if message == "Job not found")
    );

    let err = client.get_job(&job).unwrap_err();
    assert!(err.is_unauthorized(), "{err}");
    assert!(err.to_string().contains("Invalid API token"));

    assert_eq!(stub.finish().len(), 2);
}

#[test]
fn malformed_success_body_is_invalid_response() {
    let stub = Stub::start(|_| vec![(200, "not json".to_string())]);
    let client = client_with_key(&stub.base_url);

    let err = client.create_job(&project(), &CreateJobBody {
        source: "s".to_string(),
        name: "n".to_string(),
        description: None,
        arguments: vec![vec![]],
    });
    assert!(matches!(err, Err(CloudError::InvalidResponse(_))));
    stub.finish();
}

#[test]
fn upload_posts_presigned_form_to_storage() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.hbjson");
    std::fs::write(&model, r#"{"type": "Model", "identifier": "m"}"#).unwrap();

    let stub = Stub::start(|base| {
        vec![
            (
                200,
                json!({
                    "url": format!("{base}/storage"),
                    "fields": { "key": "uploads/inputs/model.hbjson", "policy": "signed-policy" }
                })
                .to_string(),
            ),
            (200, String::new()),
        ]
    });
    let client = client_with_key(&stub.base_url);

    client
        .upload_artifact(&project(), "inputs/model.hbjson", &model)
        .unwrap();

    let requests = stub.finish();
    assert_eq!(requests.len(), 2);

    let signing = &requests[0];
    assert_eq!(signing.method, "POST");
    assert_eq!(signing.path, "/projects/ladybug-tools/demo/artifacts");
    assert_eq!(signing.header("x-pollination-token"), Some("secret-key"));
    assert_eq!(signing.json(), json!({ "key": "inputs/model.hbjson" }));

    let storage = &requests[1];
    assert_eq!(storage.method, "POST");
    assert_eq!(storage.path, "/storage");
    assert_eq!(storage.header("x-pollination-token"), None);
    assert!(
        storage
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data")
    );
    let form = storage.body_text();
    assert!(form.contains(r#"name="policy""#));
    assert!(form.contains("signed-policy"));
    assert!(form.contains(r#"filename="model.hbjson""#));
    assert!(form.contains(r#"{"type": "Model", "identifier": "m"}"#));
}

#[test]
fn rejected_storage_upload_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.hbjson");
    std::fs::write(&model, "{}").unwrap();

    let stub = Stub::start(|base| {
        vec![
            (200, json!({ "url": format!("{base}/storage") }).to_string()),
            (403, "Request has expired".to_string()),
        ]
    });
    let client = client_with_key(&stub.base_url);

    let err = client
        .upload_artifact(&project(), "model.hbjson", &model)
        .unwrap_err();
    assert!(
        matches!(err, CloudError::Http { status: 403, ref message } if message == "Request has expired")
    );
    stub.finish();
}
