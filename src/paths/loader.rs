use std::path::Path;

use kurbo::{BezPath, PathEl};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{FloaterError, FloaterResult};
use crate::paths::sized::SizedPath;

/// Slack allowed when checking normalized coordinates against the unit
/// square, absorbing float dust from the division.
const UNIT_EPS: f64 = 1e-6;

/// An ordered sequence of 2-D waypoints in [0,1]x[0,1] space, derived once
/// from an SVG source and independent of viewport size.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedPath {
    points: Vec<Point>,
}

impl NormalizedPath {
    /// Build a normalized path from unit-square points.
    pub fn from_points(points: Vec<Point>) -> FloaterResult<Self> {
        for p in &points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(FloaterError::validation("waypoint is not finite"));
            }
            if p.x < 0.0 || p.x > 1.0 || p.y < 0.0 || p.y > 1.0 {
                return Err(FloaterError::validation(
                    "waypoint lies outside the unit square",
                ));
            }
        }
        Ok(Self { points })
    }

    /// Waypoints in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Scale every waypoint by exactly `(width, height)` and build the
    /// interpolating curve over the result.
    pub fn resize(&self, viewport: Viewport) -> SizedPath {
        let w = f64::from(viewport.width);
        let h = f64::from(viewport.height);
        let scaled = self
            .points
            .iter()
            .map(|p| Point::new(p.x * w, p.y * h))
            .collect();
        SizedPath::from_waypoints(scaled)
    }
}

/// Read an SVG file from disk and parse its vector paths.
pub fn load_vector_paths(path: &Path) -> FloaterResult<Vec<NormalizedPath>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| FloaterError::svg(format!("failed to read svg '{}': {e}", path.display())))?;
    parse_vector_paths(&text)
}

/// Parse an SVG document into normalized waypoint sequences.
///
/// The document must carry a `viewBox` on its root element; every `path`
/// element's `d` attribute must be a single subpath of cubic curve segments
/// following an absolute move. Waypoints are the successive curve endpoints
/// (the subpath start is not emitted, and each path's trailing two segments
/// are excluded), normalized by the view-box dimensions.
pub fn parse_vector_paths(svg_text: &str) -> FloaterResult<Vec<NormalizedPath>> {
    let doc = extract_document(svg_text)?;
    let (vb_w, vb_h) = parse_view_box(&doc.view_box)?;
    doc.path_data
        .iter()
        .map(|d| normalize_path(d, vb_w, vb_h))
        .collect()
}

struct SvgDocument {
    view_box: String,
    path_data: Vec<String>,
}

fn extract_document(svg_text: &str) -> FloaterResult<SvgDocument> {
    let mut reader = Reader::from_str(svg_text);
    let mut view_box: Option<String> = None;
    let mut path_data = Vec::new();

    loop {
        let ev = reader
            .read_event()
            .map_err(|e| FloaterError::svg(format!("malformed svg document: {e}")))?;
        match ev {
            Event::Start(el) | Event::Empty(el) => {
                let name = el.name();
                if name.local_name().as_ref() == b"svg" && view_box.is_none() {
                    view_box = attr_value(&el, b"viewBox")?;
                } else if name.local_name().as_ref() == b"path"
                    && let Some(d) = attr_value(&el, b"d")?
                {
                    path_data.push(d);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let view_box = view_box.ok_or_else(|| FloaterError::svg("svg document has no viewBox"))?;
    Ok(SvgDocument {
        view_box,
        path_data,
    })
}

fn attr_value(el: &BytesStart<'_>, key: &[u8]) -> FloaterResult<Option<String>> {
    for attr in el.attributes() {
        let attr = attr.map_err(|e| FloaterError::svg(format!("malformed svg attribute: {e}")))?;
        if attr.key.local_name().as_ref() == key {
            let v = attr
                .unescape_value()
                .map_err(|e| FloaterError::svg(format!("malformed svg attribute value: {e}")))?;
            return Ok(Some(v.into_owned()));
        }
    }
    Ok(None)
}

fn parse_view_box(raw: &str) -> FloaterResult<(f64, f64)> {
    let parts = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|e| FloaterError::svg(format!("unparsable viewBox entry '{s}': {e}")))
        })
        .collect::<FloaterResult<Vec<f64>>>()?;
    if parts.len() != 4 {
        return Err(FloaterError::svg(format!(
            "viewBox must have 4 entries, got {}",
            parts.len()
        )));
    }
    let (w, h) = (parts[2], parts[3]);
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return Err(FloaterError::svg("viewBox dimensions must be positive"));
    }
    Ok((w, h))
}

fn normalize_path(d: &str, vb_w: f64, vb_h: f64) -> FloaterResult<NormalizedPath> {
    let bez = BezPath::from_svg(d.trim())
        .map_err(|e| FloaterError::svg(format!("invalid path data: {e}")))?;

    let mut els = bez.elements().iter();
    match els.next() {
        Some(PathEl::MoveTo(_)) => {}
        _ => return Err(FloaterError::svg("path data must begin with a move command")),
    }

    let mut endpoints: Vec<Point> = Vec::new();
    for el in els {
        match *el {
            PathEl::CurveTo(_, _, p) => endpoints.push(p),
            PathEl::ClosePath => {}
            PathEl::MoveTo(_) => {
                return Err(FloaterError::svg("path data must contain a single subpath"));
            }
            PathEl::LineTo(_) | PathEl::QuadTo(_, _) => {
                return Err(FloaterError::svg(
                    "path data must consist of cubic curve segments",
                ));
            }
        }
    }

    // The source assets close each figure back onto its start; the trailing
    // two segments are that closing stroke, not part of the travel path.
    endpoints.truncate(endpoints.len().saturating_sub(2));

    let mut points = Vec::with_capacity(endpoints.len());
    for p in endpoints {
        let x = p.x / vb_w;
        let y = p.y / vb_h;
        if !(x.is_finite() && y.is_finite()) {
            return Err(FloaterError::svg("path coordinate is not finite"));
        }
        if x < -UNIT_EPS || x > 1.0 + UNIT_EPS || y < -UNIT_EPS || y > 1.0 + UNIT_EPS {
            return Err(FloaterError::svg(format!(
                "path coordinate ({}, {}) lies outside the view box",
                p.x, p.y
            )));
        }
        points.push(Point::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)));
    }
    Ok(NormalizedPath { points })
}
