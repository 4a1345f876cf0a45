//! In-memory apiserver for reconcile tests: a service-fn router handed to
//! the kube client, storing objects by request path.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use skiff::kube::client::Body;
use skiff::{Application, ApplicationRuntime, ApplicationSpec, RuntimeSize};

use crate::{Config, Context};

pub(crate) const NAMESPACE: &str = "testns";

#[derive(Default)]
pub(crate) struct MockState {
    pub objects: BTreeMap<String, Value>,
    /// Path → number of PUTs to reject with 409 before accepting.
    pub put_conflicts: BTreeMap<String, usize>,
    /// Request lines ("VERB /path") in arrival order.
    pub log: Vec<String>,
}

impl MockState {
    pub fn seed<T: serde::Serialize>(&mut self, path: impl ToString, object: &T) {
        self.objects
            .insert(path.to_string(), serde_json::to_value(object).unwrap());
    }

    pub fn requests_touching(&self, fragment: &str) -> usize {
        self.log.iter().filter(|line| line.contains(fragment)).count()
    }
}

pub(crate) fn application(name: &str, mutate: impl FnOnce(&mut ApplicationSpec)) -> Application {
    let mut spec = ApplicationSpec {
        replicas: 1,
        runtime: ApplicationRuntime {
            size: RuntimeSize::from("standard"),
            image: "nginx:1.27".to_string(),
        },
        endpoints: Vec::new(),
        launch_command: None,
    };
    mutate(&mut spec);
    let mut app = Application::new(name, spec);
    app.metadata.namespace = Some(NAMESPACE.to_string());
    app.metadata.uid = Some(format!("uid-{name}"));
    app.metadata.resource_version = Some("1".to_string());
    app.metadata.generation = Some(1);
    app
}

pub(crate) fn app_path(name: &str) -> String {
    format!("/apis/skiff.dev/v1alpha1/namespaces/{NAMESPACE}/applications/{name}")
}

pub(crate) fn deployment_path(name: &str) -> String {
    format!("/apis/apps/v1/namespaces/{NAMESPACE}/deployments/{name}")
}

pub(crate) fn service_path(name: &str) -> String {
    format!("/api/v1/namespaces/{NAMESPACE}/services/{name}")
}

pub(crate) fn ingress_path(name: &str) -> String {
    format!("/apis/networking.k8s.io/v1/namespaces/{NAMESPACE}/ingresses/{name}")
}

pub(crate) fn mock_context() -> (Context, Arc<Mutex<MockState>>) {
    let state = Arc::new(Mutex::new(MockState::default()));
    let client = skiff::Client::new("skiff-test", mock_kube(state.clone()));
    let config = Config {
        namespace: Some(NAMESPACE.to_string()),
        name: "skiff-test".to_string(),
    };
    (Context::new(client, config), state)
}

fn mock_kube(state: Arc<Mutex<MockState>>) -> skiff::kube::Client {
    let service = tower::service_fn(move |req: Request<Body>| {
        let state = state.clone();
        async move {
            let (parts, body) = req.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(Into::<tower::BoxError>::into)?
                .to_bytes();
            Ok::<_, tower::BoxError>(handle(&state, &parts.method, parts.uri.path(), &bytes))
        }
    });
    skiff::kube::Client::new(service, NAMESPACE)
}

fn handle(state: &Mutex<MockState>, method: &Method, path: &str, body: &[u8]) -> Response<Body> {
    let mut state = state.lock().unwrap();
    state.log.push(format!("{method} {path}"));
    if method == Method::GET {
        match state.objects.get(path) {
            Some(object) => json_response(StatusCode::OK, &object.clone()),
            None => status_failure(StatusCode::NOT_FOUND, "NotFound"),
        }
    } else if method == Method::POST {
        let mut object: Value = serde_json::from_slice(body).unwrap();
        let name = object["metadata"]["name"].as_str().unwrap().to_string();
        object["metadata"]["uid"] = json!(format!("uid-{name}"));
        object["metadata"]["resourceVersion"] = json!("1");
        state.objects.insert(format!("{path}/{name}"), object.clone());
        json_response(StatusCode::CREATED, &object)
    } else if method == Method::PUT {
        if let Some(remaining) = state.put_conflicts.get_mut(path) {
            if *remaining > 0 {
                *remaining -= 1;
                return status_failure(StatusCode::CONFLICT, "Conflict");
            }
        }
        // Status writes land on the object itself; the subresource route
        // carries the whole object anyway.
        let object_path = path.strip_suffix("/status").unwrap_or(path).to_string();
        let object: Value = serde_json::from_slice(body).unwrap();
        state.objects.insert(object_path, object.clone());
        json_response(StatusCode::OK, &object)
    } else if method == Method::DELETE {
        match state.objects.remove(path) {
            Some(object) => json_response(StatusCode::OK, &object),
            None => status_failure(StatusCode::NOT_FOUND, "NotFound"),
        }
    } else {
        status_failure(StatusCode::METHOD_NOT_ALLOWED, "MethodNotAllowed")
    }
}

fn json_response(code: StatusCode, value: &Value) -> Response<Body> {
    Response::builder()
        .status(code)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(value).unwrap()))
        .unwrap()
}

fn status_failure(code: StatusCode, reason: &str) -> Response<Body> {
    let status = json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": reason,
        "reason": reason,
        "code": code.as_u16(),
    });
    json_response(code, &status)
}
