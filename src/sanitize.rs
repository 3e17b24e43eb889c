//! Turns live objects into portable manifests.
//!
//! Every kind loses the identity fields in [`UNIVERSAL`], then the fields
//! listed in its [`KindSpec::strip`](crate::kubemodel::KindSpec) table, then
//! any user-supplied paths. Finally `apiVersion`/`kind` are stamped with the
//! canonical values, whatever version the source cluster served.

use fieldpath::{path, FieldpathExt, Path};
use serde_json::Value;

use crate::kubemodel::ResourceKind;

/// Cluster-assigned identity and controller noise, never replayed
pub const UNIVERSAL: &[&Path] = &[
	path!(."metadata"."resourceVersion"),
	path!(."metadata"."selfLink"),
	path!(."metadata"."uid"),
	path!(."metadata"."creationTimestamp"),
	path!(."metadata"."annotations"),
	path!(."metadata"."managedFields"),
	path!(."metadata"."generation"),
	path!(."metadata"."ownerReferences"),
];

#[derive(Debug, Default)]
pub struct Sanitizer {
	extra: Vec<fieldpath::PathBuf>,
}

impl Sanitizer {
	pub fn new(extra: Vec<fieldpath::PathBuf>) -> Self {
		Self { extra }
	}

	pub fn sanitize(&self, kind: ResourceKind, mut object: Value) -> Value {
		let spec = kind.spec();
		for path in UNIVERSAL.iter().chain(spec.strip) {
			clear(kind, &mut object, path);
		}
		for path in &self.extra {
			clear(kind, &mut object, path);
		}
		if let Some(obj) = object.as_object_mut() {
			obj.insert("apiVersion".to_owned(), Value::from(spec.api_version));
			obj.insert("kind".to_owned(), Value::from(spec.kind));
		}
		object
	}
}

fn clear(kind: ResourceKind, object: &mut Value, path: &Path) {
	if object.clear_path(path).is_some() {
		log::trace!("{}: removed {}", kind, fieldpath::PathBuf::from(path));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::kubemodel::{CLUSTER_KINDS, NAMESPACED_KINDS};
	use serde_json::json;

	fn live(api_version: &str, kind: &str, extra: Value) -> Value {
		let mut object = json!({
			"apiVersion": api_version,
			"kind": kind,
			"metadata": {
				"name": "obj",
				"namespace": "team-a",
				"uid": "8f0e5c1a-2a43-4c55-9d3b-5f3f7e3f1d22",
				"resourceVersion": "482913",
				"selfLink": "/api/v1/namespaces/team-a/things/obj",
				"creationTimestamp": "2024-03-01T10:00:00Z",
				"generation": 4,
				"annotations": {
					"kubectl.kubernetes.io/last-applied-configuration": "{}",
				},
				"managedFields": [{ "manager": "kubectl", "operation": "Apply" }],
				"labels": { "app": "api" },
			},
		});
		if let (Some(obj), Value::Object(extra)) = (object.as_object_mut(), extra) {
			obj.extend(extra);
		}
		object
	}

	fn assert_identity_removed(object: &Value) {
		for path in UNIVERSAL {
			assert!(!object.has_path(path), "{} left in {object}", fieldpath::PathBuf::from(*path));
		}
	}

	#[test]
	fn universal_rule_applies_to_every_kind() {
		let sanitizer = Sanitizer::default();
		let kinds = CLUSTER_KINDS
			.iter()
			.chain(NAMESPACED_KINDS)
			.chain(std::iter::once(&ResourceKind::Namespace));
		for &kind in kinds {
			let out = sanitizer.sanitize(kind, live("v0", "Whatever", json!({})));
			assert_identity_removed(&out);
			assert_eq!(out["apiVersion"], kind.spec().api_version);
			assert_eq!(out["kind"], kind.spec().kind);
			assert_eq!(out["metadata"]["name"], "obj");
			assert_eq!(out["metadata"]["labels"]["app"], "api");
		}
	}

	#[test]
	fn persistent_volume_loses_claim_and_status() {
		let raw = live(
			"v1",
			"PersistentVolume",
			json!({
				"spec": {
					"capacity": { "storage": "10Gi" },
					"claimRef": { "name": "data", "namespace": "team-a", "uid": "abc" },
					"hostPath": { "path": "/mnt/pv-001" },
				},
				"status": { "phase": "Bound" },
			}),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::PersistentVolume, raw);
		assert!(!out.has_path(path!(."spec"."claimRef")));
		assert!(!out.has_path(path!(."status")));
		assert_eq!(out["spec"]["capacity"]["storage"], "10Gi");
	}

	#[test]
	fn claim_loses_volume_binding() {
		let raw = live(
			"v1",
			"PersistentVolumeClaim",
			json!({
				"spec": { "volumeName": "pv-001", "storageClassName": "fast" },
				"status": { "phase": "Bound" },
			}),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::PersistentVolumeClaim, raw);
		assert_eq!(out["spec"], json!({ "storageClassName": "fast" }));
		assert!(out.get("status").is_none());
	}

	#[test]
	fn service_loses_cluster_ip() {
		let raw = live(
			"v1",
			"Service",
			json!({
				"spec": {
					"clusterIP": "10.96.12.7",
					"clusterIPs": ["10.96.12.7"],
					"ports": [{ "port": 80 }],
				},
				"status": { "loadBalancer": {} },
			}),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::Service, raw);
		assert_eq!(out["spec"], json!({ "ports": [{ "port": 80 }] }));
		assert!(out.get("status").is_none());
	}

	#[test]
	fn namespace_keeps_only_metadata() {
		let raw = live(
			"v1",
			"Namespace",
			json!({
				"spec": { "finalizers": ["kubernetes"] },
				"status": { "phase": "Active" },
			}),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::Namespace, raw);
		let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
		assert_eq!(keys, ["apiVersion", "kind", "metadata"]);
	}

	#[test]
	fn service_account_loses_secrets() {
		let raw = live(
			"v1",
			"ServiceAccount",
			json!({ "secrets": [{ "name": "builder-token-x7f2k" }] }),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::ServiceAccount, raw);
		assert!(out.get("secrets").is_none());
	}

	#[test]
	fn legacy_api_version_is_normalized() {
		let raw = live(
			"extensions/v1beta1",
			"Deployment",
			json!({ "spec": { "replicas": 2 }, "status": { "replicas": 2 } }),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::Deployment, raw);
		assert_eq!(out["apiVersion"], "apps/v1");
		assert_eq!(out["spec"]["replicas"], 2);
		assert!(out.get("status").is_none());
	}

	#[test]
	fn configured_paths_are_stripped_too() {
		let extra = vec![fieldpath::parse(".metadata.labels.app").unwrap()];
		let out = Sanitizer::new(extra).sanitize(
			ResourceKind::ConfigMap,
			live("v1", "ConfigMap", json!({ "data": { "k": "v" } })),
		);
		assert_eq!(out["metadata"]["labels"], json!({}));
		assert_eq!(out["data"]["k"], "v");
	}

	#[test]
	fn ingress_loses_status() {
		let raw = live(
			"extensions/v1beta1",
			"Ingress",
			json!({
				"spec": { "rules": [{ "host": "api.example.com" }] },
				"status": { "loadBalancer": { "ingress": [{ "ip": "203.0.113.10" }] } },
			}),
		);
		let out = Sanitizer::default().sanitize(ResourceKind::Ingress, raw);
		assert!(out.get("status").is_none());
		assert_eq!(out["apiVersion"], "networking.k8s.io/v1");
		assert_eq!(out["spec"]["rules"][0]["host"], "api.example.com");
	}

	#[test]
	fn sanitizing_twice_changes_nothing() {
		let sanitizer = Sanitizer::default();
		let once = sanitizer.sanitize(
			ResourceKind::StatefulSet,
			live(
				"apps/v1",
				"StatefulSet",
				json!({ "spec": { "replicas": 3 }, "status": { "readyReplicas": 3 } }),
			),
		);
		assert!(once.get("status").is_none());
		assert_eq!(once["spec"]["replicas"], 3);
		let twice = sanitizer.sanitize(ResourceKind::StatefulSet, once.clone());
		assert_eq!(once, twice);
	}
}
