//! Output tree convention:
//!
//! ```text
//! <root>/pv/<name>.yaml
//! <root>/namespace/<ns>/namespace.yaml
//! <root>/namespace/<ns>/<kind dir>/<name>.yaml
//! ```

use std::path::{Path, PathBuf};

use crate::{
	error::{Error, Result},
	kubemodel::{ResourceKind, Scope},
};

const NAMESPACES_DIR: &str = "namespace";
const NAMESPACE_MANIFEST: &str = "namespace.yaml";

/// Compute where a sanitized object is written. Pure, does not touch the filesystem.
///
/// `namespace` is ignored for cluster-scoped kinds and required for namespaced ones.
pub fn plan_path(
	root: &Path,
	kind: ResourceKind,
	namespace: Option<&str>,
	name: &str,
) -> Result<PathBuf> {
	let spec = kind.spec();
	let file = format!("{}.yaml", name);
	Ok(match (kind, spec.scope) {
		(ResourceKind::Namespace, _) => root
			.join(NAMESPACES_DIR)
			.join(name)
			.join(NAMESPACE_MANIFEST),
		(_, Scope::Cluster) => root.join(spec.dir).join(file),
		(_, Scope::Namespaced) => {
			let namespace = namespace.ok_or_else(|| Error::MissingNamespace {
				kind,
				name: name.to_owned(),
			})?;
			root.join(NAMESPACES_DIR)
				.join(namespace)
				.join(spec.dir)
				.join(file)
		}
	})
}
