mod config;
mod error;
mod export;
mod fetch;
mod filter;
mod kubemodel;
mod layout;
mod sanitize;
mod writer;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use config::{ExportConfig, DEFAULT_ROOT, DEFAULT_SYSTEM_PATTERN};
use export::Exporter;
use fetch::{ConnectOptions, KubeFetcher};
use writer::FsWriter;

/// Snapshot cluster resources into a re-applicable YAML tree
#[derive(Parser)]
#[command(version)]
struct Opts {
	/// Path to kubeconfig file. Without it `KUBECONFIG` and `~/.kube/config` are used
	#[arg(long)]
	kubeconfig: Option<PathBuf>,
	/// Kubeconfig context to use instead of the current one
	#[arg(long)]
	context: Option<String>,
	/// Export root directory
	#[arg(short, long, default_value = DEFAULT_ROOT)]
	output: PathBuf,
	/// Additional namespace to skip, on top of default, kube-system and kube-public
	#[arg(long = "exclude-namespace", value_name = "NAMESPACE")]
	exclude_namespaces: Vec<String>,
	/// Role and RoleBinding names matching this regex are not exported
	#[arg(long, default_value = DEFAULT_SYSTEM_PATTERN)]
	system_pattern: String,
	/// Extra field to remove from every object, e.g. `.metadata.labels."pod-template-hash"`
	#[arg(long, value_name = "PATH")]
	strip: Vec<String>,
}

impl Opts {
	fn export_config(&self) -> error::Result<ExportConfig> {
		ExportConfig::default()
			.with_root(&self.output)
			.exclude_namespaces(self.exclude_namespaces.iter().cloned())
			.with_system_pattern(&self.system_pattern)?
			.with_extra_strip(self.strip.iter().map(String::as_str))
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let opts = Opts::parse();
	let config = opts.export_config()?;

	let fetcher = KubeFetcher::connect(&ConnectOptions {
		kubeconfig: opts.kubeconfig.clone(),
		context: opts.context.clone(),
	})
	.await?;

	let root = config.root.clone();
	let mut exporter = Exporter::new(fetcher, FsWriter, config);
	let summary = exporter
		.run(&mut std::io::stdout())
		.await
		.with_context(|| format!("export to {} failed", root.display()))?;

	log::info!(
		"Exported {} objects from {} namespaces into {} ({} skipped)",
		summary.written,
		summary.namespaces,
		root.display(),
		summary.filtered,
	);
	Ok(())
}
