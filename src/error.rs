use std::path::PathBuf;

use thiserror::Error;

use crate::kubemodel::ResourceKind;

#[derive(Error, Debug)]
pub enum Error {
	#[error("failed to load kubeconfig: {0}")]
	Kubeconfig(#[from] kube::config::KubeconfigError),
	#[error("failed to infer cluster config: {0}")]
	InferConfig(#[from] kube::config::InferConfigError),
	#[error("failed to connect to api server: {0}")]
	Connect(#[source] kube::Error),
	#[error("failed to list {kind}{}: {source}", in_namespace(.namespace))]
	List {
		kind: ResourceKind,
		namespace: Option<String>,
		#[source]
		source: kube::Error,
	},
	#[error("failed to decode {kind}: {source}")]
	Decode {
		kind: ResourceKind,
		#[source]
		source: serde_json::Error,
	},
	#[error("{kind} object has no metadata.name")]
	MissingName { kind: ResourceKind },
	#[error("{kind} {name} is namespaced, but no namespace given")]
	MissingNamespace { kind: ResourceKind, name: String },
	#[error("failed to render {kind} {name}: {source}")]
	Serialize {
		kind: ResourceKind,
		name: String,
		#[source]
		source: serde_yaml_with_quirks::Error,
	},
	#[error("failed to write {}: {source}", .path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to report progress: {0}")]
	Progress(#[source] std::io::Error),
	#[error("invalid system name pattern: {0}")]
	InvalidPattern(#[from] regex::Error),
	#[error("invalid field path {input:?}: {message}")]
	InvalidPath { input: String, message: String },
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

fn in_namespace(namespace: &Option<String>) -> String {
	namespace
		.as_ref()
		.map(|ns| format!(" in {}", ns))
		.unwrap_or_default()
}
