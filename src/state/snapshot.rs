use anyhow::{Context, bail};
use bracket_core::{DefaultBracketModel, LayoutConfig, LocatorKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEMO_ENTRIES: [&str; 8] = [
    "Duke", "Vermont", "Gonzaga", "Montana", "Houston", "Yale", "Purdue", "Akron",
];

/// On-disk bracket description.
///
/// ```json
/// {
///   "name": "Spring Open",
///   "strategy": "elimination",
///   "layout": { "cell_width": 18, "routing_mode": "above" },
///   "entries": ["Duke", "Vermont", "Gonzaga", "Montana"]
/// }
/// ```
///
/// Exactly one of `entries` (first-round seeds of an elimination bracket) or
/// `columns` (explicit per-column slots, `null` for an empty slot) is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BracketSnapshot {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
    #[serde(default)]
    pub strategy: Option<LocatorKind>,
    #[serde(default)]
    pub entries: Option<Vec<String>>,
    #[serde(default)]
    pub columns: Option<Vec<Vec<Option<String>>>>,
}

fn default_name() -> String {
    "Bracket".to_string()
}

/// A snapshot turned into a model, ready to hand to the UI.
#[derive(Debug, Clone)]
pub struct LoadedBracket {
    pub name: String,
    pub model: DefaultBracketModel<String>,
    pub layout: Option<LayoutConfig>,
    pub strategy: Option<LocatorKind>,
    pub source: Option<PathBuf>,
}

impl BracketSnapshot {
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid bracket snapshot")
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("{}: read failed", path.display()))?;
        Self::parse(&content).with_context(|| path.display().to_string())
    }

    /// Built-in eight-entry bracket used when no snapshot is configured.
    pub fn demo() -> Self {
        Self {
            name: "Demo Bracket".to_string(),
            layout: None,
            strategy: None,
            entries: Some(DEMO_ENTRIES.iter().map(ToString::to_string).collect()),
            columns: None,
        }
    }

    pub fn into_bracket(self, source: Option<PathBuf>) -> anyhow::Result<LoadedBracket> {
        let model = match (self.entries, self.columns) {
            (Some(entries), None) => DefaultBracketModel::from_entries(entries)?,
            (None, Some(columns)) => {
                if columns.is_empty() {
                    bail!("snapshot `columns` is empty");
                }
                DefaultBracketModel::from_columns(columns)
            }
            (Some(_), Some(_)) => bail!("snapshot has both `entries` and `columns`"),
            (None, None) => bail!("snapshot needs `entries` or `columns`"),
        };

        Ok(LoadedBracket {
            name: self.name,
            model,
            layout: self.layout,
            strategy: self.strategy,
            source,
        })
    }
}
