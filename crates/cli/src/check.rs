use std::fmt;

use anyhow::Context;
use coffer_registry::{MenuFile, MenuRegistry};

/// One line of the `check` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSummary {
	pub id: String,
	pub alias: Option<String>,
	pub slots: u8,
	pub items: usize,
	pub frames: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
	pub menus: Vec<MenuSummary>,
}

impl fmt::Display for CheckReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for menu in &self.menus {
			write!(f, "{} ({} slots, {} items", menu.id, menu.slots, menu.items)?;
			if let Some(alias) = &menu.alias {
				write!(f, ", alias {alias}")?;
			}
			if menu.frames >= 2 {
				write!(f, ", {} frames", menu.frames)?;
			}
			writeln!(f, ")")?;
		}
		writeln!(f, "{} menus ok", self.menus.len())
	}
}

/// Parses, builds and registers every menu in `text`.
pub fn check_menus(text: &str) -> anyhow::Result<CheckReport> {
	let file = MenuFile::from_toml_str(text)?;
	let menus = file.into_menus()?;

	let registry = MenuRegistry::new();
	registry.reload(menus).context("menu ids and aliases must be unique")?;

	let menus = registry
		.ids()
		.into_iter()
		.filter_map(|id| registry.lookup_by_id(&id))
		.map(|menu| MenuSummary {
			id: menu.id().to_string(),
			alias: menu.alias().map(str::to_string),
			slots: menu.size().slots(),
			items: menu.slots().count(),
			frames: menu.animation().map_or(0, |spec| spec.frames().len()),
		})
		.collect();
	tracing::debug!("check.done");
	Ok(CheckReport { menus })
}
