use megamine_core::*;
use serde::Serialize;

pub(crate) fn cell_char(view: CellView) -> char {
    match view {
        CellView::Unopened => '#',
        CellView::Opened(0) => '.',
        CellView::Opened(n) => char::from(b'0' + n.min(8)),
        CellView::Flagged => 'F',
        CellView::Guessed => '?',
        CellView::OpenedAndMined => '*',
        CellView::OpenedExploded => 'X',
        CellView::WrongFlag => 'x',
    }
}

pub(crate) fn face_str(face: FaceExpression) -> &'static str {
    match face {
        FaceExpression::Smile => ":)",
        FaceExpression::Pressed => ":|",
        FaceExpression::Oops => ":o",
        FaceExpression::Dead => "x(",
        FaceExpression::Sunglasses => "B)",
    }
}

pub(crate) fn display_str(display: SegmentDisplay) -> String {
    display
        .digits()
        .iter()
        .map(|digit| match *digit {
            Digit::Num(n) => char::from(b'0' + n),
            Digit::Hyphen => '-',
        })
        .collect()
}

/// One string per board row, top to bottom.
pub(crate) fn board_rows(game: &Match) -> Vec<String> {
    let (width, _) = game.engine().size();
    let mut rows = Vec::new();
    let mut row = String::with_capacity(usize::from(width));
    for ((x, _), view) in game.engine().views(game.phase()) {
        row.push(cell_char(view));
        if x + 1 == width {
            rows.push(std::mem::take(&mut row));
        }
    }
    rows
}

pub(crate) fn text(game: &Match) -> String {
    let mut out = format!(
        "[{}] {} [{}]\n",
        display_str(game.counter()),
        face_str(game.face()),
        display_str(game.clock())
    );
    for row in board_rows(game) {
        out.push_str(&row);
        out.push('\n');
    }
    out.push_str(&format!("{:?}\n", game.phase()));
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Summary {
    pub config: BoardConfig,
    pub phase: MatchPhase,
    pub face: FaceExpression,
    pub counter: i32,
    pub clock: i32,
    pub cells_remaining: CellCount,
    pub flags_placed: CellCount,
    pub detonated: Option<Coord2>,
    pub board: Vec<String>,
}

impl Summary {
    pub(crate) fn of(game: &Match) -> Self {
        let engine = game.engine();
        Self {
            config: game.config(),
            phase: game.phase(),
            face: game.face(),
            counter: game.counter().get(),
            clock: game.clock().get(),
            cells_remaining: engine.cells_remaining(),
            flags_placed: engine.flags_placed(),
            detonated: engine.detonated(),
            board: board_rows(game),
        }
    }
}
