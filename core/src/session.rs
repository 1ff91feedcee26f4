use chrono::{DateTime, Utc};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Highest value the clock shows.
pub const CLOCK_MAX_SECS: i32 = 999;

/// Valid transitions:
/// - Ready -> Active (first reveal or marker change)
/// - Ready -> Won (first reveal clears the board)
/// - Active -> Won
/// - Active -> Lost
/// - Won/Lost -> Ready (reset)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl MatchPhase {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Board input is only accepted before the match ends.
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Ready | Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceExpression {
    Smile,
    Pressed,
    Oops,
    Dead,
    Sunglasses,
}

/// Restart button above the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pressed: bool,
}

impl Face {
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Tracks a primary-button click on `rect`, returns `true` when it completes and a reset is due.
    pub fn handle_cursor(&mut self, event: &CursorEvent, rect: Rect) -> bool {
        let over = rect.contains(event.pos());
        if event.primary.is_held() {
            if over {
                self.pressed = true;
            }
            false
        } else if event.primary.just_released() && self.pressed {
            self.pressed = false;
            over
        } else {
            false
        }
    }

    pub fn expression(&self, phase: MatchPhase, xray: XrayMode) -> FaceExpression {
        use FaceExpression::*;
        match phase {
            _ if self.pressed => Pressed,
            MatchPhase::Lost => Dead,
            MatchPhase::Won => Sunglasses,
            _ if xray.is_peeking() => Oops,
            _ => Smile,
        }
    }
}

/// One match from the first click to its end, plus everything shown around the board.
///
/// Owns exactly one [`BoardEngine`], which is replaced wholesale on reset.
#[derive(Clone, Debug)]
pub struct Match {
    config: BoardConfig,
    layout: Layout,
    engine: BoardEngine,
    phase: MatchPhase,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    counter: SegmentDisplay,
    clock: SegmentDisplay,
    face: Face,
    seeds: SmallRng,
}

impl Match {
    /// Starts a session whose every board is derived from `seed`.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self> {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let engine = BoardEngine::random(config, seeds.random())?;
        Ok(Self::with_seeds(engine, seeds))
    }

    /// Plays on a prepared board; later resets generate random boards of the same size.
    pub fn from_engine(engine: BoardEngine, seed: u64) -> Self {
        Self::with_seeds(engine, SmallRng::seed_from_u64(seed))
    }

    fn with_seeds(engine: BoardEngine, seeds: SmallRng) -> Self {
        let (width, height) = engine.size();
        let config = BoardConfig::new_unchecked(width, height, engine.total_mines());
        Self {
            config,
            layout: Layout::for_board(config.size()),
            counter: SegmentDisplay::new(i32::from(config.mines)),
            clock: SegmentDisplay::new(0),
            engine,
            phase: MatchPhase::Ready,
            started_at: None,
            ended_at: None,
            face: Face::default(),
            seeds,
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Re-centres the board on a resized screen.
    pub fn set_screen(&mut self, screen: (i32, i32)) {
        self.layout = Layout::new(screen, self.config.size());
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Remaining-mine display.
    pub fn counter(&self) -> SegmentDisplay {
        self.counter
    }

    /// Elapsed-seconds display.
    pub fn clock(&self) -> SegmentDisplay {
        self.clock
    }

    pub fn face(&self) -> FaceExpression {
        self.face.expression(self.phase, self.engine.xray_mode())
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        self.engine.cell_view(coords, self.phase)
    }

    /// Whole seconds since the first move, 0 before it, frozen once the match ends.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.started_at {
            Some(started_at) => (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0),
            None => 0,
        }
    }

    /// Processes the cursor event sampled for this tick.
    pub fn tick(&mut self, event: &CursorEvent, now: DateTime<Utc>) -> Result<()> {
        if self.phase == MatchPhase::Active {
            let secs = self.elapsed_secs(now).min(i64::from(CLOCK_MAX_SECS)) as i32;
            self.clock.try_set(secs);
        }

        if self.face.handle_cursor(event, self.layout.face) {
            log::debug!("Face clicked, resetting");
            return self.reset();
        }

        if !self.phase.accepts_input() {
            return Ok(());
        }

        let target = self.layout.cell_at(event.pos());
        let response = self.engine.handle_cursor(target, event, self.phase)?;
        self.apply(response, now);
        Ok(())
    }

    fn apply(&mut self, response: BoardResponse, now: DateTime<Utc>) {
        let started = self.phase.is_ready() && response.has_update();
        if started {
            log::debug!("Match started at {:?}", now);
            self.started_at = Some(now);
            self.phase = MatchPhase::Active;
        }
        if started || response.mark.has_update() {
            self.refresh_counter();
        }

        match response.reveal {
            RevealOutcome::HitMine => self.finish(MatchPhase::Lost, now),
            RevealOutcome::Won => {
                self.finish(MatchPhase::Won, now);
                self.counter.set(0);
            }
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }
    }

    fn refresh_counter(&mut self) {
        self.counter.set(self.engine.mines_left() as i32);
    }

    fn finish(&mut self, phase: MatchPhase, now: DateTime<Utc>) {
        self.phase = phase;
        self.ended_at = Some(now);
        self.engine.disable_xray();
        self.clock
            .try_set(self.elapsed_secs(now).min(i64::from(CLOCK_MAX_SECS)) as i32);
        log::debug!("Match ended {:?} after {}s", phase, self.elapsed_secs(now));
    }

    /// Replaces the board with a fresh random one and returns to `Ready`.
    pub fn reset(&mut self) -> Result<()> {
        self.engine = BoardEngine::random(self.config, self.seeds.random())?;
        self.phase = MatchPhase::Ready;
        self.started_at = None;
        self.ended_at = None;
        self.clock.set(0);
        self.counter.set(i32::from(self.config.mines));
        self.face = Face::default();
        Ok(())
    }
}
