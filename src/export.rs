//! Export pipeline: cluster-scoped kinds, namespace discovery, then every
//! namespaced kind of every eligible namespace, strictly in that order.
//! The first error aborts the run.

use std::io::Write;

use serde_json::Value;

use crate::{
	config::ExportConfig,
	error::{Error, Result},
	fetch::ResourceFetcher,
	filter::{is_eligible, is_exportable, object_name},
	kubemodel::{ResourceKind, CLUSTER_KINDS, NAMESPACED_KINDS},
	layout::plan_path,
	sanitize::Sanitizer,
	writer::Writer,
};

const GROUP_PREFIX: &str = "      |----";
const OBJECT_PREFIX: &str = "      |      |----";

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ExportSummary {
	pub namespaces: usize,
	pub written: usize,
	pub filtered: usize,
}

pub struct Exporter<F, W> {
	fetcher: F,
	writer: W,
	sanitizer: Sanitizer,
	config: ExportConfig,
	summary: ExportSummary,
}

impl<F: ResourceFetcher, W: Writer> Exporter<F, W> {
	pub fn new(fetcher: F, writer: W, config: ExportConfig) -> Self {
		Self {
			fetcher,
			writer,
			sanitizer: Sanitizer::new(config.extra_strip.clone()),
			config,
			summary: ExportSummary::default(),
		}
	}

	/// Run the whole pipeline once, writing the progress tree to `progress`
	pub async fn run(&mut self, progress: &mut impl Write) -> Result<ExportSummary> {
		for &kind in CLUSTER_KINDS {
			self.export_kind(kind, None, progress).await?;
		}

		let namespaces = self.export_namespaces().await?;
		for namespace in &namespaces {
			writeln!(progress, "{}", namespace).map_err(Error::Progress)?;
			for &kind in NAMESPACED_KINDS {
				self.export_kind(kind, Some(namespace.as_str()), progress).await?;
			}
		}

		Ok(self.summary)
	}

	/// Export manifests of eligible namespaces, returning their names in order
	async fn export_namespaces(&mut self) -> Result<Vec<String>> {
		let kind = ResourceKind::Namespace;
		let mut eligible = Vec::new();
		for object in sorted(self.fetcher.list(kind, None).await?) {
			let name = object_name(&object)
				.ok_or(Error::MissingName { kind })?
				.to_owned();
			if !is_eligible(&self.config, &name) {
				log::debug!("Skipping platform namespace {}", name);
				continue;
			}
			self.export_object(kind, None, &name, object)?;
			eligible.push(name);
		}
		self.summary.namespaces = eligible.len();
		Ok(eligible)
	}

	async fn export_kind(
		&mut self,
		kind: ResourceKind,
		namespace: Option<&str>,
		progress: &mut impl Write,
	) -> Result<()> {
		let mut objects = Vec::new();
		for object in sorted(self.fetcher.list(kind, namespace).await?) {
			if is_exportable(&self.config, kind, &object) {
				objects.push(object);
			} else {
				log::debug!(
					"Skipping {} {}",
					kind,
					object_name(&object).unwrap_or_default()
				);
				self.summary.filtered += 1;
			}
		}
		// empty groups leave no trace in output tree
		if objects.is_empty() {
			return Ok(());
		}

		writeln!(progress, "{}{}", GROUP_PREFIX, kind.spec().dir).map_err(Error::Progress)?;
		for object in objects {
			let name = object_name(&object)
				.ok_or(Error::MissingName { kind })?
				.to_owned();
			writeln!(progress, "{}{}", OBJECT_PREFIX, name).map_err(Error::Progress)?;
			self.export_object(kind, namespace, &name, object)?;
		}
		Ok(())
	}

	fn export_object(
		&mut self,
		kind: ResourceKind,
		namespace: Option<&str>,
		name: &str,
		object: Value,
	) -> Result<()> {
		let sanitized = self.sanitizer.sanitize(kind, object);
		let path = plan_path(&self.config.root, kind, namespace, name)?;
		let rendered =
			serde_yaml_with_quirks::to_string(&sanitized).map_err(|source| Error::Serialize {
				kind,
				name: name.to_owned(),
				source,
			})?;
		if let Some(dir) = path.parent() {
			self.writer.ensure_dir(dir)?;
		}
		self.writer.write_file(&path, rendered.as_bytes())?;
		self.summary.written += 1;
		Ok(())
	}
}

fn sorted(mut objects: Vec<Value>) -> Vec<Value> {
	objects.sort_by(|a, b| object_name(a).cmp(&object_name(b)));
	objects
}
