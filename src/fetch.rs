use std::path::PathBuf;

use k8s_openapi::api::{
	apps::v1::{Deployment, StatefulSet},
	core::v1::{
		ConfigMap, Namespace, PersistentVolume, PersistentVolumeClaim, Secret, Service,
		ServiceAccount,
	},
	networking::v1::Ingress,
	rbac::v1::{Role, RoleBinding},
};
use kube::{
	api::{Api, DynamicObject, ListParams},
	config::{KubeConfigOptions, Kubeconfig},
	discovery::ApiResource,
	Client, Config,
};
use serde_json::Value;

use crate::{
	error::{Error, Result},
	kubemodel::ResourceKind,
};

/// Source of live objects
#[allow(async_fn_in_trait)]
pub trait ResourceFetcher {
	/// List all objects of `kind`, cluster-wide when `namespace` is `None`
	async fn list(&self, kind: ResourceKind, namespace: Option<&str>) -> Result<Vec<Value>>;
}

/// Where cluster credentials come from
#[derive(Debug, Default, Clone)]
pub struct ConnectOptions {
	pub kubeconfig: Option<PathBuf>,
	pub context: Option<String>,
}

pub struct KubeFetcher {
	client: Client,
}

impl KubeFetcher {
	/// Build client and make sure api server is reachable with given credentials
	pub async fn connect(opts: &ConnectOptions) -> Result<Self> {
		let config = load_config(opts).await?;
		log::info!("Connecting to {}", config.cluster_url);

		let client = Client::try_from(config).map_err(Error::Connect)?;
		let version = client.apiserver_version().await.map_err(Error::Connect)?;
		log::debug!("Server version {}", version.git_version);

		Ok(Self { client })
	}

	fn api(&self, kind: ResourceKind, namespace: Option<&str>) -> Api<DynamicObject> {
		let ar = api_resource(kind);
		match namespace {
			Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
			None => Api::all_with(self.client.clone(), &ar),
		}
	}
}

/// Resolve client config. An explicit path is read as a single file, otherwise
/// kube's own lookup runs, which merges every file listed in `KUBECONFIG`.
async fn load_config(opts: &ConnectOptions) -> Result<Config> {
	let kube_opts = KubeConfigOptions {
		context: opts.context.clone(),
		..Default::default()
	};
	Ok(match (&opts.kubeconfig, &opts.context) {
		(Some(path), _) => {
			log::debug!("Loading kubeconfig from {}", path.display());
			let kubeconfig = Kubeconfig::read_from(path)?;
			Config::from_custom_kubeconfig(kubeconfig, &kube_opts).await?
		}
		(None, Some(_)) => Config::from_kubeconfig(&kube_opts).await?,
		(None, None) => Config::infer().await?,
	})
}

fn api_resource(kind: ResourceKind) -> ApiResource {
	match kind {
		ResourceKind::Namespace => ApiResource::erase::<Namespace>(&()),
		ResourceKind::PersistentVolume => ApiResource::erase::<PersistentVolume>(&()),
		ResourceKind::PersistentVolumeClaim => ApiResource::erase::<PersistentVolumeClaim>(&()),
		ResourceKind::Deployment => ApiResource::erase::<Deployment>(&()),
		ResourceKind::Service => ApiResource::erase::<Service>(&()),
		ResourceKind::Ingress => ApiResource::erase::<Ingress>(&()),
		ResourceKind::StatefulSet => ApiResource::erase::<StatefulSet>(&()),
		ResourceKind::ServiceAccount => ApiResource::erase::<ServiceAccount>(&()),
		ResourceKind::Role => ApiResource::erase::<Role>(&()),
		ResourceKind::RoleBinding => ApiResource::erase::<RoleBinding>(&()),
		ResourceKind::ConfigMap => ApiResource::erase::<ConfigMap>(&()),
		ResourceKind::Secret => ApiResource::erase::<Secret>(&()),
	}
}

impl ResourceFetcher for KubeFetcher {
	async fn list(&self, kind: ResourceKind, namespace: Option<&str>) -> Result<Vec<Value>> {
		let list = self
			.api(kind, namespace)
			.list(&ListParams::default())
			.await
			.map_err(|source| Error::List {
				kind,
				namespace: namespace.map(str::to_owned),
				source,
			})?;
		log::debug!(
			"Listed {} {} in {}",
			list.items.len(),
			kind,
			namespace.unwrap_or("<cluster>")
		);
		list.items
			.into_iter()
			.map(|item| serde_json::to_value(item).map_err(|source| Error::Decode { kind, source }))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	const CLUSTERS: &str = "\
apiVersion: v1
kind: Config
clusters:
- name: local
  cluster:
    server: https://127.0.0.1:6443
- name: staging
  cluster:
    server: https://10.20.0.1:6443
contexts:
- name: local
  context:
    cluster: local
    user: admin
- name: staging
  context:
    cluster: staging
    user: admin
current-context: local
";

	const USERS: &str = "\
apiVersion: v1
kind: Config
users:
- name: admin
  user:
    token: 0123456789abcdef
";

	fn endpoint(config: &Config) -> (String, Option<u16>) {
		let url = &config.cluster_url;
		(url.host().unwrap_or_default().to_owned(), url.port_u16())
	}

	// Only test touching KUBECONFIG, every case lives here to avoid env races
	#[tokio::test]
	async fn kubeconfig_sources() {
		let tmp = tempfile::tempdir().unwrap();
		let clusters = tmp.path().join("clusters.yaml");
		let users = tmp.path().join("users.yaml");
		fs::write(&clusters, CLUSTERS).unwrap();
		fs::write(&users, USERS).unwrap();
		let joined = std::env::join_paths([&clusters, &users]).unwrap();
		std::env::set_var("KUBECONFIG", &joined);

		// list of files in KUBECONFIG is merged
		let config = load_config(&ConnectOptions::default()).await.unwrap();
		assert_eq!(endpoint(&config), ("127.0.0.1".to_owned(), Some(6443)));

		let config = load_config(&ConnectOptions {
			kubeconfig: None,
			context: Some("staging".to_owned()),
		})
		.await
		.unwrap();
		assert_eq!(endpoint(&config), ("10.20.0.1".to_owned(), Some(6443)));

		// explicit path is a single file, the joined list is not a path
		let err = load_config(&ConnectOptions {
			kubeconfig: Some(joined.clone().into()),
			context: None,
		})
		.await
		.unwrap_err();
		assert!(matches!(err, Error::Kubeconfig(_)));

		std::env::remove_var("KUBECONFIG");
	}

	#[test]
	fn api_resources_follow_kind_table() {
		let kinds = [
			ResourceKind::Namespace,
			ResourceKind::PersistentVolume,
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
		for kind in kinds {
			let ar = api_resource(kind);
			assert_eq!(ar.api_version, kind.spec().api_version);
			assert_eq!(ar.kind, kind.spec().kind);
		}
		assert_eq!(api_resource(ResourceKind::Deployment).plural, "deployments");
		assert_eq!(api_resource(ResourceKind::Ingress).group, "networking.k8s.io");
	}
}
