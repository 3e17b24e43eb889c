use std::{collections::BTreeSet, path::PathBuf};

use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_ROOT: &str = "export";
/// Namespaces owned by the platform rather than by users
pub const PLATFORM_NAMESPACES: &[&str] = &["default", "kube-system", "kube-public"];
/// RBAC objects provisioned by the control plane or kubeadm
pub const DEFAULT_SYSTEM_PATTERN: &str = "^(system|kubeadm):";

/// Immutable settings of one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
	pub root: PathBuf,
	pub excluded_namespaces: BTreeSet<String>,
	pub system_pattern: Regex,
	/// Removed from every object after the per-kind table
	pub extra_strip: Vec<fieldpath::PathBuf>,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			root: PathBuf::from(DEFAULT_ROOT),
			excluded_namespaces: PLATFORM_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
			system_pattern: Regex::new(DEFAULT_SYSTEM_PATTERN).expect("default pattern is valid"),
			extra_strip: Vec::new(),
		}
	}
}

impl ExportConfig {
	pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.root = root.into();
		self
	}

	pub fn exclude_namespaces(mut self, namespaces: impl IntoIterator<Item = String>) -> Self {
		self.excluded_namespaces.extend(namespaces);
		self
	}

	pub fn with_system_pattern(mut self, pattern: &str) -> Result<Self> {
		self.system_pattern = Regex::new(pattern)?;
		Ok(self)
	}

	/// Parse and append extra removal paths
	pub fn with_extra_strip<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Result<Self> {
		for input in paths {
			let path = fieldpath::parse(input).map_err(|e| Error::InvalidPath {
				input: input.to_owned(),
				message: e.to_string(),
			})?;
			self.extra_strip.push(path);
		}
		Ok(self)
	}
}
