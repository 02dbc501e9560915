use crate::geometry::{Point, Rect};
use crate::surface::{DrawTarget, Font, Paint, Stroke};
use std::fmt::Write;

/// Draw target that serializes a frame to a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgTarget {
    svg: String,
    open: bool,
}

impl SvgTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document drawn so far. Complete once `end` has been called.
    pub fn as_str(&self) -> &str {
        &self.svg
    }

    pub fn into_string(self) -> String {
        self.svg
    }
}

impl DrawTarget for SvgTarget {
    fn begin(&mut self, width: f64, height: f64, background: &str, transform: [f64; 6]) {
        self.svg.clear();
        let _ = writeln!(
            self.svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        );
        let _ = writeln!(
            self.svg,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}" />"#,
            width,
            height,
            escape_xml(background)
        );
        let [a, b, c, d, e, f] = transform;
        let _ = writeln!(
            self.svg,
            r#"<g transform="matrix({} {} {} {} {} {})">"#,
            a, b, c, d, e, f
        );
        self.open = true;
    }

    fn rect(&mut self, rect: Rect, paint: &Paint) {
        let _ = writeln!(
            self.svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            rect.left,
            rect.top,
            rect.width,
            rect.height,
            escape_xml(&paint.fill),
            escape_xml(&paint.stroke),
            paint.stroke_width
        );
    }

    fn text(&mut self, at: Point, text: &str, font: &Font) {
        let _ = writeln!(
            self.svg,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" dominant-baseline="central">{}</text>"#,
            at.x,
            at.y,
            escape_xml(&font.family),
            font.size,
            escape_xml(&font.color),
            escape_xml(text)
        );
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        let points = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="{}" />"#,
            points,
            escape_xml(&stroke.color),
            stroke.width,
            escape_xml(&stroke.line_join)
        );
    }

    fn end(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            let _ = writeln!(self.svg, "</g>");
        }
        let _ = writeln!(self.svg, "</svg>");
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityNode;
    use crate::options::{CanvasOptions, RowStyle};
    use crate::surface::Canvas;

    fn canvas(table: &str, rows: &[&str]) -> Canvas {
        let mut canvas = Canvas::new(Some("erd"), &CanvasOptions::default()).unwrap();
        let id = canvas.scene.node_id(0);
        let mut node = EntityNode::new(id, table, None, Point::new(10.0, 10.0));
        node.add_header(table, &RowStyle::header());
        node.add_rows(rows.iter().copied(), &RowStyle::default());
        canvas.scene.add_node(node);
        canvas
    }

    #[test]
    fn test_render_basic() {
        let mut target = SvgTarget::new();
        canvas("users", &["id", "name"]).draw(&mut target);
        let svg = target.into_string();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("users"));
        assert!(svg.contains("#316896"));
        assert!(svg.contains(r#"transform="matrix(1 0 0 1 0 0)""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_unicode() {
        let mut target = SvgTarget::new();
        canvas("ユーザー", &["名前"]).draw(&mut target);
        let svg = target.into_string();

        assert!(svg.contains("ユーザー"));
        assert!(svg.contains("名前"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_polyline_points() {
        let mut target = SvgTarget::new();
        target.polyline(
            &[Point::new(0.0, 1.0), Point::new(2.5, 1.0)],
            &Stroke {
                color: "black".into(),
                width: 2.0,
                line_join: "round".into(),
            },
        );
        assert!(target.as_str().contains(r#"points="0,1 2.5,1""#));
        assert!(target.as_str().contains(r#"stroke-linejoin="round""#));
    }
}
