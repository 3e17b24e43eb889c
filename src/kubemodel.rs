//! Resource kinds known to the exporter, and everything that is decided
//! per kind: scope, output directory, canonical type and field-strip table.

use std::fmt::{self, Display};

use fieldpath::{path, Path};
use k8s_openapi::{
	api::{
		apps::v1::{Deployment, StatefulSet},
		core::v1::{
			ConfigMap, Namespace, PersistentVolume, PersistentVolumeClaim, Secret, Service,
			ServiceAccount,
		},
		networking::v1::Ingress,
		rbac::v1::{Role, RoleBinding},
	},
	Resource,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ResourceKind {
	Namespace,
	PersistentVolume,
	PersistentVolumeClaim,
	Deployment,
	Service,
	Ingress,
	StatefulSet,
	ServiceAccount,
	Role,
	RoleBinding,
	ConfigMap,
	Secret,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scope {
	Cluster,
	Namespaced,
}

/// Which live objects of a kind are left out of the export
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Filter {
	None,
	/// Names matching the configured system pattern (`system:*`, `kubeadm:*`)
	SystemManaged,
	/// The `default` account the platform creates in every namespace
	DefaultServiceAccount,
	/// Secrets of type `kubernetes.io/service-account-token`
	ServiceAccountToken,
}

/// Static description of one resource kind
#[derive(Debug)]
pub struct KindSpec {
	pub api_version: &'static str,
	pub kind: &'static str,
	pub scope: Scope,
	/// Directory name under the export root (or under the namespace directory)
	pub dir: &'static str,
	/// Fields removed on top of the universal identity fields
	pub strip: &'static [&'static Path],
	pub filter: Filter,
}

macro_rules! kind_spec {
	($ty:ty, $scope:ident, $dir:literal, [$($strip:expr),* $(,)?], $filter:ident) => {
		KindSpec {
			api_version: <$ty as Resource>::API_VERSION,
			kind: <$ty as Resource>::KIND,
			scope: Scope::$scope,
			dir: $dir,
			strip: &[$($strip),*],
			filter: Filter::$filter,
		}
	};
}

static NAMESPACE: KindSpec = kind_spec!(
	Namespace,
	Cluster,
	"namespace",
	[path!(."spec"), path!(."status")],
	None
);
static PERSISTENT_VOLUME: KindSpec = kind_spec!(
	PersistentVolume,
	Cluster,
	"pv",
	[path!(."spec"."claimRef"), path!(."status")],
	None
);
static PERSISTENT_VOLUME_CLAIM: KindSpec = kind_spec!(
	PersistentVolumeClaim,
	Namespaced,
	"pvc",
	[path!(."spec"."volumeName"), path!(."status")],
	None
);
static DEPLOYMENT: KindSpec = kind_spec!(Deployment, Namespaced, "deploy", [path!(."status")], None);
static SERVICE: KindSpec = kind_spec!(
	Service,
	Namespaced,
	"svc",
	[
		path!(."spec"."clusterIP"),
		path!(."spec"."clusterIPs"),
		path!(."status"),
	],
	None
);
static INGRESS: KindSpec = kind_spec!(Ingress, Namespaced, "ingress", [path!(."status")], None);
static STATEFUL_SET: KindSpec = kind_spec!(
	StatefulSet,
	Namespaced,
	"statefulset",
	[path!(."status")],
	None
);
static SERVICE_ACCOUNT: KindSpec = kind_spec!(
	ServiceAccount,
	Namespaced,
	"sa",
	[path!(."secrets")],
	DefaultServiceAccount
);
static ROLE: KindSpec = kind_spec!(Role, Namespaced, "role", [], SystemManaged);
static ROLE_BINDING: KindSpec = kind_spec!(RoleBinding, Namespaced, "rolebinding", [], SystemManaged);
static CONFIG_MAP: KindSpec = kind_spec!(ConfigMap, Namespaced, "cm", [], None);
static SECRET: KindSpec = kind_spec!(Secret, Namespaced, "secret", [], ServiceAccountToken);

/// Cluster-scoped kinds exported once per run, in order
pub const CLUSTER_KINDS: &[ResourceKind] = &[ResourceKind::PersistentVolume];

/// Kinds exported for every eligible namespace, in order
pub const NAMESPACED_KINDS: &[ResourceKind] = &[
	ResourceKind::PersistentVolumeClaim,
	ResourceKind::Deployment,
	ResourceKind::Service,
	ResourceKind::Ingress,
	ResourceKind::StatefulSet,
	ResourceKind::ServiceAccount,
	ResourceKind::Role,
	ResourceKind::RoleBinding,
	ResourceKind::ConfigMap,
	ResourceKind::Secret,
];

impl ResourceKind {
	pub fn spec(self) -> &'static KindSpec {
		match self {
			Self::Namespace => &NAMESPACE,
			Self::PersistentVolume => &PERSISTENT_VOLUME,
			Self::PersistentVolumeClaim => &PERSISTENT_VOLUME_CLAIM,
			Self::Deployment => &DEPLOYMENT,
			Self::Service => &SERVICE,
			Self::Ingress => &INGRESS,
			Self::StatefulSet => &STATEFUL_SET,
			Self::ServiceAccount => &SERVICE_ACCOUNT,
			Self::Role => &ROLE,
			Self::RoleBinding => &ROLE_BINDING,
			Self::ConfigMap => &CONFIG_MAP,
			Self::Secret => &SECRET,
		}
	}
}

impl Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let spec = self.spec();
		write!(f, "{} {}", spec.api_version, spec.kind)
	}
}
