use serde::{Deserialize, Serialize};

use crate::*;

/// Side of a board cell in pixels.
pub const CELL_SIZE: i32 = 16;

/// Side of the face button in pixels.
pub const FACE_SIZE: i32 = 24;

/// Size of one seven-segment digit in pixels.
pub const DIGIT_SIZE: (i32, i32) = (13, 23);

/// Digits per counter.
pub const DIGIT_COUNT: i32 = 3;

// margins around a board when the screen is sized to fit it
const FIT_SIDE_MARGIN: i32 = 10;
const FIT_HEADER: i32 = 52;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn contains(&self, (x, y): ScreenPos) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Where the board and its header widgets sit on the screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub screen: (i32, i32),
    pub board: Rect,
    pub face: Rect,
    pub counter: Rect,
    pub clock: Rect,
}

impl Layout {
    pub fn new(screen: (i32, i32), (cols, rows): Coord2) -> Self {
        let (screen_w, screen_h) = screen;
        let board_w = CELL_SIZE * i32::from(cols);
        let board_h = CELL_SIZE * i32::from(rows);

        // equal margin left, right and below the board
        let margin = (screen_w - board_w) / 2;
        let board = Rect::new(margin, screen_h - board_h - margin, board_w, board_h);

        let face = Rect::new(
            (screen_w - FACE_SIZE) / 2,
            (board.y - FACE_SIZE) / 2,
            FACE_SIZE,
            FACE_SIZE,
        );

        let (digit_w, digit_h) = DIGIT_SIZE;
        let display_w = digit_w * DIGIT_COUNT;
        let counter = Rect::new(face.y, face.y, display_w, digit_h);
        let clock = Rect::new(screen_w - face.y - display_w, face.y, display_w, digit_h);

        Self {
            screen,
            board,
            face,
            counter,
            clock,
        }
    }

    /// Layout on a screen just large enough for the board, 500x318 for the classic 30x16 board.
    pub fn for_board(size: Coord2) -> Self {
        let screen = (
            CELL_SIZE * i32::from(size.0) + 2 * FIT_SIDE_MARGIN,
            CELL_SIZE * i32::from(size.1) + FIT_HEADER + FIT_SIDE_MARGIN,
        );
        Self::new(screen, size)
    }

    /// Cell under the screen position, or `None` when it is off the board.
    pub fn cell_at(&self, pos: ScreenPos) -> Option<Coord2> {
        if !self.board.contains(pos) {
            return None;
        }
        let x = (pos.0 - self.board.x) / CELL_SIZE;
        let y = (pos.1 - self.board.y) / CELL_SIZE;
        Some((Coord::try_from(x).ok()?, Coord::try_from(y).ok()?))
    }

    /// Top-left pixel of a cell, e.g. to aim a scripted pointer at it.
    pub fn cell_origin(&self, (x, y): Coord2) -> ScreenPos {
        (
            self.board.x + CELL_SIZE * i32::from(x),
            self.board.y + CELL_SIZE * i32::from(y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_board_matches_classic_screen() {
        let layout = Layout::for_board((30, 16));
        assert_eq!(layout.screen, (500, 318));
        assert_eq!(layout.board, Rect::new(10, 52, 480, 256));
        assert_eq!(layout.face, Rect::new(238, 14, 24, 24));
        assert_eq!(layout.counter, Rect::new(14, 14, 39, 23));
        assert_eq!(layout.clock, Rect::new(447, 14, 39, 23));
    }

    #[test]
    fn pixels_map_to_cells() {
        let layout = Layout::for_board((30, 16));
        assert_eq!(layout.cell_at((10, 52)), Some((0, 0)));
        assert_eq!(layout.cell_at((25, 67)), Some((0, 0)));
        assert_eq!(layout.cell_at((26, 68)), Some((1, 1)));
        assert_eq!(layout.cell_at((489, 307)), Some((29, 15)));
    }

    #[test]
    fn off_board_pixels_have_no_cell() {
        let layout = Layout::for_board((30, 16));
        assert_eq!(layout.cell_at((9, 60)), None);
        assert_eq!(layout.cell_at((100, 51)), None);
        assert_eq!(layout.cell_at((490, 60)), None);
        assert_eq!(layout.cell_at((100, 308)), None);
        assert_eq!(layout.cell_at((-5, -5)), None);
    }

    #[test]
    fn cell_origin_round_trips() {
        let layout = Layout::for_board((9, 9));
        assert_eq!(layout.cell_at(layout.cell_origin((8, 3))), Some((8, 3)));
    }
}
