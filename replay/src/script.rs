use std::{fs, path::Path};

use anyhow::Context;
use chrono::{DateTime, Utc};
use megamine_core::*;
use serde::Deserialize;

/// Where the pointer is, either in screen pixels or as the centre of a board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Pointer {
    Cell { cell: Coord2 },
    Screen { x: i32, y: i32 },
}

impl Pointer {
    pub(crate) fn resolve(self, layout: &Layout) -> ScreenPos {
        match self {
            Self::Cell { cell } => {
                let (x, y) = layout.cell_origin(cell);
                (x + CELL_SIZE / 2, y + CELL_SIZE / 2)
            }
            Self::Screen { x, y } => (x, y),
        }
    }
}

/// One raw pointer sample: `{"at_ms": 120, "cell": [3, 4], "buttons": "PRIMARY"}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct Sample {
    /// Milliseconds since the Unix epoch.
    pub at_ms: i64,
    #[serde(flatten)]
    pub pointer: Pointer,
    #[serde(default)]
    pub buttons: MouseButtons,
}

impl Sample {
    pub(crate) fn time(&self) -> anyhow::Result<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.at_ms)
            .with_context(|| format!("Timestamp {} out of range", self.at_ms))
    }
}

pub(crate) fn parse(text: &str) -> anyhow::Result<Vec<Sample>> {
    Ok(serde_json::from_str(text)?)
}

pub(crate) fn load(path: &Path) -> anyhow::Result<Vec<Sample>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read script {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid script {}", path.display()))
}

/// Feeds every sample through a fresh input normalizer into `game`, one tick each.
///
/// Returns the time of the last sample, if any.
pub(crate) fn play(game: &mut Match, samples: &[Sample]) -> anyhow::Result<Option<DateTime<Utc>>> {
    let mut input = InputNormalizer::new();
    let mut last = None;
    for (index, sample) in samples.iter().enumerate() {
        let now = sample.time()?;
        let pos = sample.pointer.resolve(game.layout());
        let event = input.sample(pos, sample.buttons);
        game.tick(&event, now)
            .with_context(|| format!("Sample {} failed", index))?;
        log::trace!("sample {}: {:?} -> {:?}", index, event, game.phase());
        last = Some(now);
    }
    Ok(last)
}
