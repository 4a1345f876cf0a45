use std::io::stdout;

use k8s_openapi::List;
use kube::CustomResourceExt;
use skiff::Application;

fn main() {
    serde_json::to_writer_pretty(
        stdout(),
        &List {
            items: vec![Application::crd()],
            ..Default::default()
        },
    )
    .unwrap()
}
