//! Extruded text geometry.
//!
//! Every stroke of every glyph becomes one box: long axis along the stroke,
//! square caps, extruded along Z. The finished mesh is recentred on its
//! bounding box so a glyph's transform sits at its visual centre.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};
use bevy::prelude::*;
use thiserror::Error;

use super::font::GlyphFont;

/// Size and extrusion profile of rendered text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    /// Em size in world units
    pub size: f32,
    /// Extrusion depth along Z
    pub depth: f32,
    /// Extra depth added to each face of the extrusion
    pub bevel_thickness: f32,
    /// Extra width added to each side of a stroke
    pub bevel_size: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum GlyphError {
    #[error("font has no glyph for {0:?}")]
    MissingGlyph(char),
}

/// One swept stroke in text space (before recentring)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeBox {
    pub center: Vec2,
    /// Unit vector along the stroke
    pub direction: Vec2,
    pub length: f32,
    pub width: f32,
    pub depth: f32,
}

impl StrokeBox {
    fn corners(&self) -> [Vec3; 8] {
        let along = self.direction * (self.length * 0.5);
        let across = self.direction.perp() * (self.width * 0.5);
        let half_depth = self.depth * 0.5;

        let mut corners = [Vec3::ZERO; 8];
        let mut i = 0;
        for sz in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sx in [-1.0, 1.0] {
                    let p = self.center + along * sx + across * sy;
                    corners[i] = Vec3::new(p.x, p.y, half_depth * sz);
                    i += 1;
                }
            }
        }
        corners
    }
}

/// Corner indices of each box face (counter-clockwise seen from outside)
/// paired with the face normal in stroke-local axes (along, across, z).
const FACES: [([usize; 4], [f32; 3]); 6] = [
    ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
    ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
    ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
];

impl GlyphFont {
    /// Lay out `text` as stroke boxes, pen starting at the origin
    pub fn layout(&self, text: &str, style: &GlyphStyle) -> Result<Vec<StrokeBox>, GlyphError> {
        let width = self.stroke * style.size + 2.0 * style.bevel_size;
        let depth = style.depth + 2.0 * style.bevel_thickness;

        let mut boxes = Vec::new();
        let mut pen_x = 0.0;
        for ch in text.chars() {
            let glyph = self.glyph(ch).ok_or(GlyphError::MissingGlyph(ch))?;

            for [from, to] in &glyph.strokes {
                let from = Vec2::new(pen_x, 0.0) + *from * style.size;
                let to = Vec2::new(pen_x, 0.0) + *to * style.size;
                let span = to - from;

                boxes.push(StrokeBox {
                    center: (from + to) * 0.5,
                    direction: span.try_normalize().unwrap_or(Vec2::X),
                    length: span.length() + width,
                    width,
                    depth,
                });
            }

            pen_x += glyph.advance * style.size;
        }

        Ok(boxes)
    }

    /// Build a centred, extruded mesh for `text`
    pub fn text_mesh(&self, text: &str, style: &GlyphStyle) -> Result<Mesh, GlyphError> {
        let boxes = self.layout(text, style)?;
        Ok(extrude(&boxes))
    }
}

/// Mesh with no geometry, used when a glyph cannot be built
pub fn empty_mesh() -> Mesh {
    extrude(&[])
}

fn extrude(boxes: &[StrokeBox]) -> Mesh {
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(boxes.len() * 24);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(boxes.len() * 24);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(boxes.len() * 24);
    let mut indices: Vec<u32> = Vec::with_capacity(boxes.len() * 36);

    let center = bounds_center(boxes);

    for stroke in boxes {
        let corners = stroke.corners();
        let across = stroke.direction.perp();

        for (face, [na, nc, nz]) in FACES {
            let normal = (stroke.direction * na + across * nc).extend(nz);
            let base = positions.len() as u32;

            for (k, &corner) in face.iter().enumerate() {
                positions.push((corners[corner] - center).to_array());
                normals.push(normal.to_array());
                uvs.push(match k {
                    0 => [0.0, 0.0],
                    1 => [1.0, 0.0],
                    2 => [1.0, 1.0],
                    _ => [0.0, 1.0],
                });
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_indices(Indices::U32(indices));
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh
}

fn bounds_center(boxes: &[StrokeBox]) -> Vec3 {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for corner in boxes.iter().flat_map(StrokeBox::corners) {
        min = min.min(corner);
        max = max.max(corner);
    }

    if boxes.is_empty() {
        Vec3::ZERO
    } else {
        (min + max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::mesh::VertexAttributeValues;

    const FONT: &str = r#"{
        "name": "test", "stroke": 0.2,
        "glyphs": {
            "1": { "advance": 0.5, "strokes": [[0.25, 0.0, 0.25, 1.0]] },
            "-": { "advance": 0.5, "strokes": [[0.0, 0.5, 0.5, 0.5]] },
            ".": { "advance": 0.3, "strokes": [[0.1, 0.1, 0.1, 0.1]] }
        }
    }"#;

    fn style() -> GlyphStyle {
        GlyphStyle {
            size: 2.0,
            depth: 0.5,
            bevel_thickness: 0.0,
            bevel_size: 0.0,
        }
    }

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(values)) => values.clone(),
            other => panic!("unexpected position attribute: {other:?}"),
        }
    }

    #[test]
    fn test_layout_scales_and_advances() {
        let font = GlyphFont::from_json_str(FONT).unwrap();
        let boxes = font.layout("1-", &style()).unwrap();
        assert_eq!(boxes.len(), 2);

        // vertical stroke: 2 units long plus square caps
        assert_eq!(boxes[0].center, Vec2::new(0.5, 1.0));
        assert!((boxes[0].length - 2.4).abs() < 1e-5);
        assert!((boxes[0].width - 0.4).abs() < 1e-5);
        assert_eq!(boxes[0].depth, 0.5);

        // second glyph starts one advance (0.5 em = 1 unit) to the right
        assert_eq!(boxes[1].center, Vec2::new(1.5, 1.0));
        assert_eq!(boxes[1].direction, Vec2::X);
    }

    #[test]
    fn test_dot_stroke_is_square() {
        let font = GlyphFont::from_json_str(FONT).unwrap();
        let boxes = font.layout(".", &style()).unwrap();
        assert_eq!(boxes[0].direction, Vec2::X);
        assert!((boxes[0].length - boxes[0].width).abs() < 1e-6);
    }

    #[test]
    fn test_bevel_grows_stroke() {
        let font = GlyphFont::from_json_str(FONT).unwrap();
        let bevelled = GlyphStyle {
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            ..style()
        };
        let boxes = font.layout("1", &bevelled).unwrap();
        assert!((boxes[0].width - 0.44).abs() < 1e-5);
        assert!((boxes[0].depth - 0.56).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_is_centred() {
        let font = GlyphFont::from_json_str(FONT).unwrap();
        let mesh = font.text_mesh("1-", &style()).unwrap();
        let positions = positions(&mesh);
        assert_eq!(positions.len(), 2 * 24);

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &positions {
            min = min.min(Vec3::from_array(*p));
            max = max.max(Vec3::from_array(*p));
        }
        let center = (min + max) * 0.5;
        assert!(center.length() < 1e-5, "mesh centre is {center:?}");
        assert!((max.z - min.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_missing_glyph() {
        let font = GlyphFont::from_json_str(FONT).unwrap();
        assert_eq!(
            font.text_mesh("1x", &style()).unwrap_err(),
            GlyphError::MissingGlyph('x')
        );
    }

    #[test]
    fn test_empty_mesh_has_no_vertices() {
        assert!(positions(&empty_mesh()).is_empty());
    }
}
