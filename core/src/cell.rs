use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// State bits of a single cell. `FLAG` and `GUESS` never coexist, and neither changes once `OPEN` is set.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CellFlags: u8 {
        const MINE  = 1;
        const OPEN  = 1 << 1;
        const FLAG  = 1 << 2;
        const GUESS = 1 << 3;
    }
}

impl CellFlags {
    /// Bits that stop a cell from being opened by a reveal or a flood fill.
    pub const BLOCKS_REVEAL: Self = Self::OPEN.union(Self::FLAG).union(Self::GUESS);
}

/// Player marker on a closed cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    None,
    Flag,
    Guess,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    flags: CellFlags,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn flags(self) -> CellFlags {
        self.flags
    }

    /// Number of mines among the 8 neighbors.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_mine(self) -> bool {
        self.flags.contains(CellFlags::MINE)
    }

    pub const fn is_open(self) -> bool {
        self.flags.contains(CellFlags::OPEN)
    }

    pub const fn is_flagged(self) -> bool {
        self.flags.contains(CellFlags::FLAG)
    }

    pub const fn is_guessed(self) -> bool {
        self.flags.contains(CellFlags::GUESS)
    }

    /// Closed and carrying neither a flag nor a guess.
    pub const fn is_revealable(self) -> bool {
        !self.flags.intersects(CellFlags::BLOCKS_REVEAL)
    }

    pub const fn marker(self) -> Marker {
        if self.is_flagged() {
            Marker::Flag
        } else if self.is_guessed() {
            Marker::Guess
        } else {
            Marker::None
        }
    }

    pub(crate) fn open(&mut self) {
        self.flags.insert(CellFlags::OPEN);
    }

    pub(crate) fn set_mine(&mut self, mine: bool) {
        self.flags.set(CellFlags::MINE, mine);
    }

    pub(crate) fn set_marker(&mut self, marker: Marker) {
        self.flags.remove(CellFlags::FLAG | CellFlags::GUESS);
        match marker {
            Marker::None => {}
            Marker::Flag => self.flags.insert(CellFlags::FLAG),
            Marker::Guess => self.flags.insert(CellFlags::GUESS),
        }
    }

    pub(crate) fn add_adjacent_mine(&mut self) {
        self.adjacent_mines += 1;
    }

    pub(crate) fn remove_adjacent_mine(&mut self) {
        self.adjacent_mines -= 1;
    }

    /// What a renderer should draw for this cell, ignoring any peek in progress.
    ///
    /// Mines and wrong flags are only told apart from ordinary closed cells once the match is `lost`.
    pub const fn view(self, lost: bool) -> CellView {
        use CellView::*;

        if self.is_open() {
            if self.is_mine() {
                OpenedExploded
            } else {
                Opened(self.adjacent_mines)
            }
        } else if self.is_guessed() {
            Guessed
        } else if self.is_flagged() {
            if lost && !self.is_mine() {
                WrongFlag
            } else {
                Flagged
            }
        } else if lost && self.is_mine() {
            OpenedAndMined
        } else {
            Unopened
        }
    }
}

/// Visual state of a cell as handed to the rendering collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Unopened,
    Opened(u8),
    Flagged,
    Guessed,
    OpenedAndMined,
    OpenedExploded,
    WrongFlag,
}

impl CellView {
    /// Whether the cell shows a mine, exploded or not.
    pub const fn shows_mine(self) -> bool {
        matches!(self, Self::OpenedAndMined | Self::OpenedExploded)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Unopened
    }
}
