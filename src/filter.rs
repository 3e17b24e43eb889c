//! Decides which namespaces and objects take part in the export.

use regex::Regex;
use serde_json::Value;

use crate::{
	config::ExportConfig,
	kubemodel::{Filter, ResourceKind},
};

const SERVICE_ACCOUNT_TOKEN: &str = "kubernetes.io/service-account-token";
const DEFAULT_SERVICE_ACCOUNT: &str = "default";

pub fn is_eligible(config: &ExportConfig, namespace: &str) -> bool {
	!config.excluded_namespaces.contains(namespace)
}

pub fn is_system_managed(pattern: &Regex, name: &str) -> bool {
	pattern.is_match(name)
}

pub fn object_name(object: &Value) -> Option<&str> {
	object.pointer("/metadata/name").and_then(Value::as_str)
}

/// Apply the kind's filter to one live object
pub fn is_exportable(config: &ExportConfig, kind: ResourceKind, object: &Value) -> bool {
	let name = object_name(object).unwrap_or_default();
	match kind.spec().filter {
		Filter::None => true,
		Filter::SystemManaged => !is_system_managed(&config.system_pattern, name),
		Filter::DefaultServiceAccount => name != DEFAULT_SERVICE_ACCOUNT,
		Filter::ServiceAccountToken => {
			object.get("type").and_then(Value::as_str) != Some(SERVICE_ACCOUNT_TOKEN)
		}
	}
}
