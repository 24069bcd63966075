//! 2D plan rendering to an SVG document.
//!
//! Rooms become rectangles filled with their type color, labeled at center.
//! Walls and door openings draw on top of the fills so shared boundaries and
//! connections stay visible. All coordinates scale uniformly from meters to
//! pixels.

use log::debug;
use svg::{
    Document,
    node::element::{Line, Rectangle, Text},
};

use crate::{config::ExportConfig, resolve::Layout};

/// Fill opacity for room rectangles, walls drawn at full strength.
const ROOM_FILL_OPACITY: f32 = 0.7;

/// Stroke color for wall segments.
const WALL_STROKE: &str = "#333333";

/// Stroke color for door openings, matching the document background.
const OPENING_STROKE: &str = "#f0f0f0";

const LABEL_FONT_SIZE: u32 = 12;

/// Renders a layout as a standalone SVG document.
///
/// Output is a pure function of the layout and config: rendering the same
/// layout twice yields byte-identical markup.
pub fn render_plan(layout: &Layout, config: &ExportConfig) -> String {
    let scale = config.svg_scale();
    let bounds = layout.bounding_box();

    // The resolver leaves an even margin at the top-left, so mirroring it on
    // the far side centers the plan.
    let width = (bounds.max_x() + bounds.min_x()) * scale;
    let height = (bounds.max_y() + bounds.min_y()) * scale;

    let mut doc = Document::new()
        .set("viewBox", format!("0 0 {width} {height}"))
        .set("width", width)
        .set("height", height)
        .set("style", "background-color: #f0f0f0;");

    for room in layout.rooms() {
        let rect = room.bounds();
        doc = doc.add(
            Rectangle::new()
                .set("x", rect.min_x() * scale)
                .set("y", rect.min_y() * scale)
                .set("width", rect.width() * scale)
                .set("height", rect.height() * scale)
                .set("fill", room.room_type().fill_color().to_string())
                .set("fill-opacity", ROOM_FILL_OPACITY)
                .set("stroke", "black")
                .set("stroke-width", 2),
        );
    }

    for room in layout.rooms() {
        let center = room.center();
        doc = doc.add(
            Text::new(room.name())
                .set("x", center.x() * scale)
                .set("y", center.y() * scale)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "middle")
                .set("font-family", "Arial")
                .set("font-size", LABEL_FONT_SIZE)
                .set("fill", "black"),
        );
    }

    let wall_width = config.wall_thickness() * scale;
    for wall in layout.walls() {
        let segment = wall.segment();
        doc = doc.add(
            Line::new()
                .set("x1", segment.start().x() * scale)
                .set("y1", segment.start().y() * scale)
                .set("x2", segment.end().x() * scale)
                .set("y2", segment.end().y() * scale)
                .set("stroke", WALL_STROKE)
                .set("stroke-width", wall_width)
                .set("stroke-linecap", "square"),
        );
    }

    // Openings paint over their wall in the background color, reading as a
    // gap in the plan.
    for opening in layout.openings() {
        let segment = opening.segment();
        doc = doc.add(
            Line::new()
                .set("x1", segment.start().x() * scale)
                .set("y1", segment.start().y() * scale)
                .set("x2", segment.end().x() * scale)
                .set("y2", segment.end().y() * scale)
                .set("stroke", OPENING_STROKE)
                .set("stroke-width", wall_width)
                .set("stroke-linecap", "butt"),
        );
    }

    debug!(
        rooms = layout.rooms().len(),
        walls = layout.walls().len();
        "SVG plan rendered"
    );
    doc.to_string()
}
