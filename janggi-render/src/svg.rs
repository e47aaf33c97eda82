//! SVG drawing of a position.
//!
//! Pieces sit on the intersections of a 9x10 grid; row 10 is drawn at the
//! top so Blue appears on the upper side as in the text diagram.

use janggi_core::{is_in_check, Cell, Piece, PieceKind, Position, Side};

// ============================================================================
// Constants
// ============================================================================

const CELL_SIZE: f32 = 64.0;
const BOARD_PADDING: f32 = 40.0;
const BOARD_RADIUS: f32 = 12.0;
const IMAGE_PADDING: f32 = 16.0;
const PIECE_RADIUS: f32 = 26.0;
const GENERAL_RADIUS: f32 = 30.0;

// Colors
const BG_COLOR: &str = "#1a1a1a";
const BOARD_BG: &str = "#e3c08d";
const LINE_COLOR: &str = "#5a3e1b";
const LABEL_COLOR: &str = "#888";
const RED_GRADIENT_START: &str = "#e74c3c";
const RED_GRADIENT_END: &str = "#c0392b";
const BLUE_GRADIENT_START: &str = "#3498db";
const BLUE_GRADIENT_END: &str = "#2980b9";
const HIGHLIGHT_LAST_MOVE: &str = "#f39c12";
const HIGHLIGHT_CHECK: &str = "#ff2d55";

/// Options for rendering
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Move to outline, if any.
    pub last_move: Option<(Cell, Cell)>,
    /// Scale factor (1.0 = 64px per grid step)
    pub scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { last_move: None, scale: 1.0 }
    }
}

/// Glyph drawn on a piece. Generals carry their side's dynasty name.
fn glyph(piece: Piece) -> &'static str {
    match (piece.kind, piece.side) {
        (PieceKind::General, Side::Red) => "漢",
        (PieceKind::General, Side::Blue) => "楚",
        (PieceKind::Guard, _) => "士",
        (PieceKind::Horse, _) => "馬",
        (PieceKind::Elephant, _) => "象",
        (PieceKind::Chariot, _) => "車",
        (PieceKind::Cannon, _) => "包",
        (PieceKind::Soldier, Side::Red) => "兵",
        (PieceKind::Soldier, Side::Blue) => "卒",
    }
}

/// Pixel position of grid point (file, row), both 0-based.
fn grid_point(file: u8, row: u8) -> (f32, f32) {
    let origin = IMAGE_PADDING + BOARD_PADDING;
    let x = origin + f32::from(file) * CELL_SIZE;
    let y = origin + (9.0 - f32::from(row)) * CELL_SIZE;
    (x, y)
}

fn point(cell: Cell) -> (f32, f32) {
    grid_point(cell.file(), cell.row())
}

fn line(svg: &mut String, (x1, y1): (f32, f32), (x2, y2): (f32, f32)) {
    svg.push_str(&format!(
        r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        x1, y1, x2, y2, LINE_COLOR
    ));
    svg.push('\n');
}

/// Generate SVG for a position
pub fn render_svg(position: &Position, opts: &RenderOptions) -> String {
    let scale = if opts.scale > 0.0 { opts.scale } else { 1.0 };

    let board_inner_w = 8.0 * CELL_SIZE;
    let board_inner_h = 9.0 * CELL_SIZE;
    let board_outer_w = board_inner_w + 2.0 * BOARD_PADDING;
    let board_outer_h = board_inner_h + 2.0 * BOARD_PADDING;
    let width = board_outer_w + 2.0 * IMAGE_PADDING;
    let height = board_outer_h + 2.0 * IMAGE_PADDING;

    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width * scale,
        height * scale,
        width,
        height
    ));
    svg.push('\n');

    svg.push_str("  <defs>\n");
    for (id, start, end) in [
        ("red-grad", RED_GRADIENT_START, RED_GRADIENT_END),
        ("blue-grad", BLUE_GRADIENT_START, BLUE_GRADIENT_END),
    ] {
        svg.push_str(&format!(
            r#"    <linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{}"/>
      <stop offset="100%" style="stop-color:{}"/>
    </linearGradient>
"#,
            id, start, end
        ));
    }
    svg.push_str("  </defs>\n");

    svg.push_str(&format!(
        r#"  <rect width="{}" height="{}" fill="{}"/>"#,
        width, height, BG_COLOR
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
        IMAGE_PADDING, IMAGE_PADDING, board_outer_w, board_outer_h, BOARD_RADIUS, BOARD_BG
    ));
    svg.push('\n');

    // Grid
    for row in 0..10 {
        line(&mut svg, grid_point(0, row), grid_point(8, row));
    }
    for file in 0..9 {
        line(&mut svg, grid_point(file, 0), grid_point(file, 9));
    }

    // Palace diagonals
    for (low, high) in [(0, 2), (7, 9)] {
        line(&mut svg, grid_point(3, low), grid_point(5, high));
        line(&mut svg, grid_point(5, low), grid_point(3, high));
    }

    // Coordinate labels
    for file in 0..9u8 {
        let (x, y) = grid_point(file, 0);
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-family=\"system-ui, sans-serif\" font-size=\"14\" fill=\"{}\" text-anchor=\"middle\">{}</text>\n",
            x, y + BOARD_PADDING - 8.0, LABEL_COLOR, (b'a' + file) as char
        ));
    }
    for row in 0..10u8 {
        let (x, y) = grid_point(0, row);
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-family=\"system-ui, sans-serif\" font-size=\"14\" fill=\"{}\" text-anchor=\"middle\">{}</text>\n",
            x - BOARD_PADDING + 12.0, y + 5.0, LABEL_COLOR, row + 1
        ));
    }

    // Last move: from/to outlines
    if let Some((from, to)) = opts.last_move {
        for cell in [from, to] {
            let (cx, cy) = point(cell);
            let half = CELL_SIZE / 2.0 - 2.0;
            svg.push_str(&format!(
                r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="6" fill="none" stroke="{}" stroke-width="3"/>"#,
                cx - half, cy - half, 2.0 * half, 2.0 * half, HIGHLIGHT_LAST_MOVE
            ));
            svg.push('\n');
        }
    }

    let board = position.board();
    let checked: Vec<Cell> = Side::BOTH
        .into_iter()
        .filter(|&side| is_in_check(position, side))
        .filter_map(|side| board.general_cell(side))
        .collect();

    // Pieces
    for cell in Cell::all() {
        let Some(piece) = board.occupant(cell) else {
            continue;
        };
        let (cx, cy) = point(cell);
        let r = if piece.kind == PieceKind::General { GENERAL_RADIUS } else { PIECE_RADIUS };
        let grad = match piece.side {
            Side::Red => "url(#red-grad)",
            Side::Blue => "url(#blue-grad)",
        };

        if checked.contains(&cell) {
            svg.push_str(&format!(
                r#"  <circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="4"/>"#,
                cx, cy, r + 5.0, HIGHLIGHT_CHECK
            ));
            svg.push('\n');
        }
        svg.push_str(&format!(
            r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="rgba(0,0,0,0.3)" stroke-width="2"/>"#,
            cx, cy, r, grad
        ));
        svg.push('\n');
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-family=\"serif\" font-size=\"{}\" fill=\"#fff\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
            cx, cy, r, glyph(piece)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
