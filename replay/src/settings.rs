use std::{fs, path::Path};

use anyhow::Context;
use clap::ValueEnum;
use megamine_core::{BoardConfig, CellCount, Coord};
use serde::Deserialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    pub(crate) fn config(self) -> BoardConfig {
        match self {
            Self::Beginner => BoardConfig::beginner(),
            Self::Intermediate => BoardConfig::intermediate(),
            Self::Expert => BoardConfig::expert(),
        }
    }
}

/// Board fields that may each be given on their own; unset ones fall through to the next source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct BoardSettings {
    pub preset: Option<Preset>,
    pub width: Option<Coord>,
    pub height: Option<Coord>,
    pub mines: Option<CellCount>,
}

impl BoardSettings {
    /// Fields set in `self` win over `base`. A preset replaces `base` before they apply.
    fn over(self, base: BoardConfig) -> BoardConfig {
        let base = self.preset.map_or(base, Preset::config);
        BoardConfig::new_unchecked(
            self.width.unwrap_or(base.width),
            self.height.unwrap_or(base.height),
            self.mines.unwrap_or(base.mines),
        )
    }
}

/// Contents of the optional TOML settings file.
///
/// ```toml
/// seed = 42
///
/// [board]
/// width = 16
/// height = 16
/// mines = 40
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub board: BoardSettings,
    pub seed: Option<u64>,
}

impl Settings {
    pub(crate) fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Layers command line values over the file over the default board, then validates the result.
    pub(crate) fn board_config(&self, cli: BoardSettings) -> anyhow::Result<BoardConfig> {
        let config = cli.over(self.board.over(BoardConfig::default()));
        Ok(config.validate()?)
    }
}
