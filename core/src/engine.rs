use alloc::vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Peek ("x-ray") state: how closed cells under a held button are previewed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum XrayMode {
    #[default]
    Off,
    /// The anchor cell alone.
    Narrow,
    /// The anchor and its neighbors, previewing a chord.
    Wide,
    /// Peek requests are ignored until the mode is explicitly set back to `Off`.
    Disabled,
}

impl XrayMode {
    pub const fn is_peeking(self) -> bool {
        matches!(self, Self::Narrow | Self::Wide)
    }
}

/// What a cursor event did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardResponse {
    pub reveal: RevealOutcome,
    pub mark: MarkOutcome,
}

impl BoardResponse {
    pub const NONE: Self = Self {
        reveal: RevealOutcome::NoChange,
        mark: MarkOutcome::NoChange,
    };

    pub const fn has_update(self) -> bool {
        self.reveal.has_update() || self.mark.has_update()
    }
}

/// Grid plus the counters and peek state needed to play on it.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardEngine {
    grid: Grid,
    cells_remaining: Saturating<CellCount>,
    flags_placed: Saturating<CellCount>,
    xray_mode: XrayMode,
    xray_anchor: Coord2,
    detonated: Option<Coord2>,
}

impl BoardEngine {
    pub fn new(config: BoardConfig, generator: impl MineGenerator) -> Result<Self> {
        let mut grid = Grid::new(config)?;
        generator.generate(&mut grid, config.mines)?;
        log::debug!(
            "New {}x{} board with {} mines",
            config.width,
            config.height,
            grid.mine_count()
        );
        Ok(Self {
            cells_remaining: Saturating(grid.safe_cell_count()),
            grid,
            flags_placed: Saturating(0),
            xray_mode: XrayMode::Off,
            xray_anchor: (0, 0),
            detonated: None,
        })
    }

    pub fn random(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomMineGenerator::new(seed))
    }

    pub fn with_mines(config: BoardConfig, mines: impl IntoIterator<Item = Coord2>) -> Result<Self> {
        Self::new(config, FixedMineGenerator::new(mines))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.grid.mine_count()
    }

    /// Non-mine cells that are still closed.
    pub fn cells_remaining(&self) -> CellCount {
        self.cells_remaining.0
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed.0
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.grid.mine_count() as isize) - (self.flags_placed.0 as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords]
    }

    /// The first mine opened by the player, if any.
    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn xray_mode(&self) -> XrayMode {
        self.xray_mode
    }

    pub fn xray_anchor(&self) -> Coord2 {
        self.xray_anchor
    }

    /// Opens a closed, unmarked cell, flooding through zero-count regions.
    ///
    /// While the match is still `Ready` a mine under the cell is first moved away, so the opening reveal is
    /// always safe.
    pub fn reveal(&mut self, coords: Coord2, phase: MatchPhase) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.open_cell(coords, phase)
    }

    fn open_cell(&mut self, coords: Coord2, phase: MatchPhase) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let cell = self.grid[coords];
        if !cell.is_revealable() {
            return Ok(NoChange);
        }

        if cell.is_mine() {
            if !phase.is_ready() {
                self.grid.cell_mut(coords).open();
                self.detonated.get_or_insert(coords);
                log::debug!("Mine hit at {:?}", coords);
                return Ok(HitMine);
            }
            let target = self.grid.relocate_mine(coords)?;
            log::debug!("First reveal on a mine, moved it from {:?} to {:?}", coords, target);
        }

        self.grid.cell_mut(coords).open();
        self.cells_remaining -= 1;
        if self.grid[coords].adjacent_mines() == 0 {
            self.flood_open(coords);
        }

        if self.cells_remaining.0 == 0 && self.detonated.is_none() {
            log::debug!("All safe cells open");
            Ok(Won)
        } else {
            Ok(Revealed)
        }
    }

    /// Opens everything reachable from `origin` through zero-count cells, plus the numbered cells bordering them.
    ///
    /// The `OPEN` flag doubles as the visited set, so each cell is opened at most once.
    fn flood_open(&mut self, origin: Coord2) {
        let mut pending = vec![origin];
        while let Some(center) = pending.pop() {
            for pos in self.grid.iter_neighbors(center) {
                let cell = self.grid[pos];
                if !cell.is_revealable() {
                    continue;
                }
                self.grid.cell_mut(pos).open();
                self.cells_remaining -= 1;
                log::trace!("Flood opened {:?}, count {}", pos, cell.adjacent_mines());
                if cell.adjacent_mines() == 0 {
                    pending.push(pos);
                }
            }
        }
    }

    /// Rotates the marker of a closed cell: none, flag, guess, none.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        let cell = self.grid[coords];
        if cell.is_open() {
            return Ok(MarkOutcome::NoChange);
        }

        let next = match cell.marker() {
            Marker::None => {
                self.flags_placed += 1;
                Marker::Flag
            }
            Marker::Flag => {
                self.flags_placed -= 1;
                Marker::Guess
            }
            Marker::Guess => Marker::None,
        };
        self.grid.cell_mut(coords).set_marker(next);
        Ok(MarkOutcome::Changed)
    }

    /// Whether `coords` is open and has exactly as many flagged neighbors as adjacent mines.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        let cell = self.grid[coords];
        cell.is_open() && self.grid.count_neighbors(coords, Cell::is_flagged) == cell.adjacent_mines()
    }

    /// Reveals every neighbor that is neither flagged nor open, if the cell at `coords` is satisfied.
    ///
    /// `None` means the chord did not apply; `Some` carries the merged outcome of the swept reveals.
    pub fn chord(&mut self, coords: Coord2, phase: MatchPhase) -> Result<Option<RevealOutcome>> {
        let coords = self.grid.validate_coords(coords)?;
        if !self.can_chord_at(coords) {
            return Ok(None);
        }

        let mut outcome = RevealOutcome::NoChange;
        for pos in self.grid.iter_neighbors(coords) {
            let neighbor = self.grid[pos];
            if neighbor.is_flagged() || neighbor.is_open() {
                continue;
            }
            outcome = outcome | self.open_cell(pos, phase)?;
        }
        log::trace!("Chord at {:?}: {:?}", coords, outcome);
        Ok(Some(outcome))
    }

    pub fn xray_narrow(&mut self, coords: Coord2) {
        self.peek(XrayMode::Narrow, coords);
    }

    pub fn xray_wide(&mut self, coords: Coord2) {
        self.peek(XrayMode::Wide, coords);
    }

    fn peek(&mut self, mode: XrayMode, coords: Coord2) {
        if self.xray_mode == XrayMode::Disabled {
            return;
        }
        self.xray_mode = mode;
        self.xray_anchor = coords;
    }

    pub fn stop_xray(&mut self) {
        self.xray_mode = XrayMode::Off;
    }

    pub fn disable_xray(&mut self) {
        self.xray_mode = XrayMode::Disabled;
    }

    /// Cells the current peek covers, whether or not they are drawn differently.
    ///
    /// A renderer that caches cell images redraws this region before and after a peek change.
    pub fn peek_region(&self) -> impl Iterator<Item = Coord2> + use<> {
        let count = match self.xray_mode {
            XrayMode::Off | XrayMode::Disabled => 0,
            XrayMode::Narrow => 1,
            XrayMode::Wide => 9,
        };
        self.grid.iter_neighborhood(self.xray_anchor).take(count)
    }

    /// Whether the cell is currently drawn as opened because of a peek.
    pub fn is_peeked(&self, coords: Coord2) -> bool {
        let covered = match self.xray_mode {
            XrayMode::Narrow => coords == self.xray_anchor,
            XrayMode::Wide => is_within_one(coords, self.xray_anchor),
            XrayMode::Off | XrayMode::Disabled => false,
        };
        covered && self.grid[coords].is_revealable()
    }

    /// Visual state of a cell, peek included. Panics on coordinates outside the board.
    pub fn cell_view(&self, coords: Coord2, phase: MatchPhase) -> CellView {
        if self.is_peeked(coords) {
            CellView::Opened(0)
        } else {
            self.grid[coords].view(phase == MatchPhase::Lost)
        }
    }

    /// Every cell with its visual state, row by row.
    pub fn views(&self, phase: MatchPhase) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        self.grid
            .iter_coords()
            .map(move |coords| (coords, self.cell_view(coords, phase)))
    }

    /// Interprets one cursor event over `target` (`None` when the pointer is off the board).
    pub fn handle_cursor(
        &mut self,
        target: Option<Coord2>,
        event: &CursorEvent,
        phase: MatchPhase,
    ) -> Result<BoardResponse> {
        let mut response = BoardResponse::NONE;
        let Some(coords) = target else {
            self.stop_xray();
            return Ok(response);
        };
        let coords = self.grid.validate_coords(coords)?;
        let (primary, secondary) = (event.primary, event.secondary);

        if primary.is_held() && secondary.is_held() {
            match self.chord(coords, phase)? {
                Some(outcome) => response.reveal = outcome,
                None => self.xray_wide(coords),
            }
        } else if (primary.is_held() && secondary.just_released())
            || (secondary.is_held() && primary.just_released())
        {
            // one half of a chord gesture let go, the other button must not act on its own
            self.disable_xray();
        } else if primary.is_held() {
            self.xray_narrow(coords);
        } else if secondary.just_pressed() {
            response.mark = self.toggle_flag(coords)?;
        } else if primary.just_released() && !secondary.just_released() {
            response.reveal = self.try_reveal(coords, phase)?;
        } else {
            self.stop_xray();
        }
        Ok(response)
    }

    /// Primary-button release: reveals unless peeking was disabled by an aborted chord.
    fn try_reveal(&mut self, coords: Coord2, phase: MatchPhase) -> Result<RevealOutcome> {
        if self.xray_mode == XrayMode::Disabled {
            return Ok(RevealOutcome::NoChange);
        }
        self.stop_xray();
        self.open_cell(coords, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use ButtonState::*;
    use MatchPhase::*;

    fn bottom_row() -> impl Iterator<Item = Coord2> {
        (0..9).map(|x| (x, 8))
    }

    /// 9x9 board with the bottom row mined plus one extra mine.
    fn engine_with(extra: Coord2) -> BoardEngine {
        BoardEngine::with_mines(BoardConfig::beginner(), bottom_row().chain([extra])).unwrap()
    }

    fn open_count(engine: &BoardEngine) -> usize {
        engine
            .grid()
            .iter_coords()
            .filter(|&pos| engine.cell_at(pos).is_open())
            .count()
    }

    fn event(primary: ButtonState, secondary: ButtonState) -> CursorEvent {
        CursorEvent::new((0, 0), primary, secondary)
    }

    #[test]
    fn remaining_plus_mines_is_total_after_generation() {
        for seed in 0..8 {
            let engine = BoardEngine::random(BoardConfig::expert(), seed).unwrap();
            assert_eq!(engine.cells_remaining() + engine.total_mines(), 30 * 16);
            assert!(engine.grid().is_consistent());
        }
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        let mut engine = engine_with((8, 6));

        assert_eq!(engine.reveal((0, 0), Active).unwrap(), RevealOutcome::Revealed);

        // rows 0-5 fully, rows 6-7 up to x = 7; (8, 7) only touches numbered cells
        assert_eq!(open_count(&engine), 70);
        assert_eq!(engine.cells_remaining(), 1);
        assert!(engine.cell_at((7, 7)).is_open());
        assert!(engine.cell_at((8, 5)).is_open());
        assert!(!engine.cell_at((8, 7)).is_open());

        assert_eq!(engine.reveal((8, 7), Active).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.cells_remaining(), 0);
    }

    #[test]
    fn flood_fill_is_independent_of_starting_cell() {
        let mut from_corner = engine_with((8, 6));
        let mut from_middle = engine_with((8, 6));
        from_corner.reveal((0, 0), Active).unwrap();
        from_middle.reveal((4, 3), Active).unwrap();
        assert_eq!(from_corner, from_middle);
    }

    #[test]
    fn each_newly_opened_cell_costs_exactly_one() {
        let mut engine = engine_with((4, 4));
        let before = engine.cells_remaining();
        engine.reveal((3, 4), Active).unwrap();
        assert_eq!(engine.cells_remaining(), before - 1);
        assert_eq!(engine.reveal((3, 4), Active).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.cells_remaining(), before - 1);
    }

    #[test]
    fn first_reveal_on_mine_relocates_it() {
        let mut engine = engine_with((0, 0));

        let outcome = engine.reveal((0, 0), Ready).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(engine.cell_at((0, 0)).is_open());
        assert!(!engine.cell_at((0, 0)).is_mine());
        assert!(engine.cell_at((1, 0)).is_mine());
        assert_eq!(engine.total_mines(), 10);
        assert_eq!(engine.cell_at((0, 0)).adjacent_mines(), 1);
        assert_eq!(engine.cells_remaining(), 70);
        assert_eq!(engine.detonated(), None);
        assert!(engine.grid().is_consistent());
    }

    #[test]
    fn active_reveal_on_mine_detonates() {
        let mut engine = engine_with((0, 0));
        let remaining = engine.cells_remaining();

        assert_eq!(engine.reveal((0, 0), Active).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.detonated(), Some((0, 0)));
        assert_eq!(engine.cells_remaining(), remaining);
        assert_eq!(engine.cell_view((0, 0), Lost), CellView::OpenedExploded);
        for pos in bottom_row() {
            assert_eq!(engine.cell_view(pos, Lost), CellView::OpenedAndMined);
            assert_eq!(engine.cell_view(pos, Active), CellView::Unopened);
        }
    }

    #[test]
    fn marked_cells_are_not_revealed() {
        let mut engine = engine_with((4, 4));
        engine.toggle_flag((0, 0)).unwrap();
        assert_eq!(engine.reveal((0, 0), Active).unwrap(), RevealOutcome::NoChange);
        engine.toggle_flag((0, 0)).unwrap();
        assert_eq!(engine.reveal((0, 0), Active).unwrap(), RevealOutcome::NoChange);
        assert!(!engine.cell_at((0, 0)).is_open());
    }

    #[test]
    fn flood_fill_stops_at_marked_cells() {
        let mut engine = engine_with((8, 6));
        engine.toggle_flag((5, 0)).unwrap();
        engine.reveal((0, 0), Active).unwrap();
        assert!(!engine.cell_at((5, 0)).is_open());
        assert_eq!(open_count(&engine), 69);
    }

    #[test]
    fn flag_cycle_updates_counter_on_flag_edges_only() {
        let mut engine = engine_with((4, 4));
        let cycle = [
            (Marker::Flag, 1),
            (Marker::Guess, 0),
            (Marker::None, 0),
            (Marker::Flag, 1),
        ];
        for (marker, flags) in cycle {
            assert_eq!(engine.toggle_flag((2, 2)).unwrap(), MarkOutcome::Changed);
            assert_eq!(engine.cell_at((2, 2)).marker(), marker);
            assert_eq!(engine.flags_placed(), flags);
        }
        assert_eq!(engine.mines_left(), 9);
    }

    #[test]
    fn open_cells_cannot_be_flagged() {
        let mut engine = engine_with((4, 4));
        engine.reveal((3, 3), Active).unwrap();
        assert_eq!(engine.toggle_flag((3, 3)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine.flags_placed(), 0);
    }

    #[test]
    fn chord_opens_unflagged_neighbors_when_satisfied() {
        let mut engine = engine_with((4, 4));
        engine.reveal((3, 3), Active).unwrap();
        assert_eq!(engine.cell_at((3, 3)).adjacent_mines(), 1);

        assert_eq!(engine.chord((3, 3), Active).unwrap(), None);

        engine.toggle_flag((4, 4)).unwrap();
        let outcome = engine.chord((3, 3), Active).unwrap();

        // every safe cell borders the zero region, so the sweep clears the board
        assert_eq!(outcome, Some(RevealOutcome::Won));
        let neighbors: Vec<_> = engine.grid().iter_neighbors((3, 3)).collect();
        for pos in neighbors {
            let cell = engine.cell_at(pos);
            assert_eq!(cell.is_open(), pos != (4, 4), "{:?}", pos);
        }
        assert!(engine.cell_at((4, 4)).is_flagged());
    }

    #[test]
    fn chord_needs_an_open_cell() {
        let mut engine = engine_with((4, 4));
        assert_eq!(engine.chord((3, 3), Active).unwrap(), None);
        assert_eq!(engine.cells_remaining(), 71);
    }

    #[test]
    fn chord_with_wrong_flag_detonates() {
        let mut engine = engine_with((4, 4));
        engine.reveal((3, 3), Active).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(
            engine.chord((3, 3), Active).unwrap(),
            Some(RevealOutcome::HitMine)
        );
        assert_eq!(engine.detonated(), Some((4, 4)));
        assert_eq!(engine.cell_view((2, 2), Lost), CellView::WrongFlag);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut engine = engine_with((4, 4));
        assert_eq!(engine.reveal((9, 0), Active), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 9)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn narrow_peek_previews_anchor_only() {
        let mut engine = engine_with((4, 4));
        engine.xray_narrow((2, 2));

        assert_eq!(engine.cell_view((2, 2), Active), CellView::Opened(0));
        assert_eq!(engine.cell_view((2, 3), Active), CellView::Unopened);
        assert_eq!(engine.peek_region().collect::<Vec<_>>(), [(2, 2)]);
        assert!(!engine.cell_at((2, 2)).is_open());
    }

    #[test]
    fn wide_peek_skips_marked_cells() {
        let mut engine = engine_with((4, 4));
        engine.toggle_flag((3, 3)).unwrap();
        engine.xray_wide((2, 2));

        assert!(engine.is_peeked((1, 1)));
        assert!(engine.is_peeked((2, 2)));
        assert!(!engine.is_peeked((3, 3)));
        assert_eq!(engine.cell_view((3, 3), Active), CellView::Flagged);
        assert_eq!(engine.peek_region().count(), 9);

        engine.stop_xray();
        assert!(!engine.is_peeked((2, 2)));
        assert_eq!(engine.peek_region().count(), 0);
    }

    #[test]
    fn disabled_peek_ignores_requests_until_stopped() {
        let mut engine = engine_with((4, 4));
        engine.disable_xray();
        engine.xray_narrow((1, 1));
        engine.xray_wide((1, 1));
        assert_eq!(engine.xray_mode(), XrayMode::Disabled);

        engine.stop_xray();
        engine.xray_narrow((1, 1));
        assert_eq!(engine.xray_mode(), XrayMode::Narrow);
    }

    #[test]
    fn cursor_off_board_stops_peek() {
        let mut engine = engine_with((4, 4));
        engine.xray_narrow((1, 1));
        let response = engine
            .handle_cursor(None, &event(Down, Up), Active)
            .unwrap();
        assert_eq!(response, BoardResponse::NONE);
        assert_eq!(engine.xray_mode(), XrayMode::Off);
    }

    #[test]
    fn primary_press_then_release_reveals() {
        let mut engine = engine_with((4, 4));

        engine
            .handle_cursor(Some((3, 3)), &event(JustPressed, Up), Ready)
            .unwrap();
        assert_eq!(engine.xray_mode(), XrayMode::Narrow);
        assert_eq!(engine.xray_anchor(), (3, 3));

        let response = engine
            .handle_cursor(Some((3, 3)), &event(JustReleased, Up), Ready)
            .unwrap();
        assert_eq!(response.reveal, RevealOutcome::Revealed);
        assert_eq!(engine.xray_mode(), XrayMode::Off);
        assert!(engine.cell_at((3, 3)).is_open());
    }

    #[test]
    fn secondary_press_cycles_flag() {
        let mut engine = engine_with((4, 4));
        let response = engine
            .handle_cursor(Some((5, 5)), &event(Up, JustPressed), Active)
            .unwrap();
        assert_eq!(response.mark, MarkOutcome::Changed);
        assert!(engine.cell_at((5, 5)).is_flagged());

        // holding the button does not cycle again
        let response = engine
            .handle_cursor(Some((5, 5)), &event(Up, Down), Active)
            .unwrap();
        assert_eq!(response, BoardResponse::NONE);
        assert!(engine.cell_at((5, 5)).is_flagged());
    }

    #[test]
    fn both_buttons_on_unsatisfied_cell_show_wide_peek() {
        let mut engine = engine_with((4, 4));
        let response = engine
            .handle_cursor(Some((2, 2)), &event(Down, JustPressed), Active)
            .unwrap();
        assert_eq!(response, BoardResponse::NONE);
        assert_eq!(engine.xray_mode(), XrayMode::Wide);
    }

    #[test]
    fn both_buttons_on_satisfied_cell_chord() {
        let mut engine = engine_with((4, 4));
        engine.reveal((3, 3), Active).unwrap();
        engine.toggle_flag((4, 4)).unwrap();

        let response = engine
            .handle_cursor(Some((3, 3)), &event(Down, Down), Active)
            .unwrap();
        assert_eq!(response.reveal, RevealOutcome::Won);
        assert!(engine.cell_at((2, 2)).is_open());
    }

    #[test]
    fn releasing_half_a_chord_disables_peek_and_reveal() {
        let mut engine = engine_with((4, 4));
        engine
            .handle_cursor(Some((2, 2)), &event(Down, Down), Active)
            .unwrap();
        assert_eq!(engine.xray_mode(), XrayMode::Wide);

        engine
            .handle_cursor(Some((2, 2)), &event(Down, JustReleased), Active)
            .unwrap();
        assert_eq!(engine.xray_mode(), XrayMode::Disabled);

        // still holding primary: no narrow peek
        engine
            .handle_cursor(Some((2, 2)), &event(Down, Up), Active)
            .unwrap();
        assert_eq!(engine.xray_mode(), XrayMode::Disabled);

        // releasing primary does not open the cell
        let response = engine
            .handle_cursor(Some((2, 2)), &event(JustReleased, Up), Active)
            .unwrap();
        assert_eq!(response, BoardResponse::NONE);
        assert!(!engine.cell_at((2, 2)).is_open());

        engine
            .handle_cursor(Some((2, 2)), &event(Up, Up), Active)
            .unwrap();
        assert_eq!(engine.xray_mode(), XrayMode::Off);
    }

    #[test]
    fn releasing_both_buttons_together_does_nothing() {
        let mut engine = engine_with((4, 4));
        let response = engine
            .handle_cursor(Some((2, 2)), &event(JustReleased, JustReleased), Active)
            .unwrap();
        assert_eq!(response, BoardResponse::NONE);
        assert!(!engine.cell_at((2, 2)).is_open());
    }
}
