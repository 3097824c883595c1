use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::heightfield::Heightfield;
use crate::transform::{rotate_x, rotate_y, transform_point};

// Non-indexed triangle list ready for upload.
// `positions` and `scalar_attr` are xyz triples, one per vertex;
// the scalar attribute is the vertex elevation repeated on all three channels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    positions: Vec<f32>,
    scalar_attr: Vec<f32>,
    triangle_count: u32,
}

impl Mesh {
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn scalar_attr(&self) -> &[f32] {
        &self.scalar_attr
    }

    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    pub fn vertex_count(&self) -> u32 {
        self.triangle_count * 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count == 0
    }

    fn push_vertex(&mut self, x: f32, elevation: f32, z: f32) {
        self.positions.extend_from_slice(&[x, elevation, z]);
        self.scalar_attr
            .extend_from_slice(&[elevation, elevation, elevation]);
    }
}

impl Mesh {
    // Closed cube spanning [-1, 1] on every axis, shown until the first
    // image loads. One face at z = +1 is rotated about Y for the sides and
    // about X for the bottom and top. The scalar attribute maps y from
    // [-1, 1] onto [0, 1] so the cube picks up the elevation ramp.
    pub fn unit_box() -> Mesh {
        let face = [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];
        let rotations = [
            rotate_y(0.0),
            rotate_y(FRAC_PI_2),
            rotate_y(2.0 * FRAC_PI_2),
            rotate_y(3.0 * FRAC_PI_2),
            rotate_x(FRAC_PI_2),
            rotate_x(-FRAC_PI_2),
        ];

        let mut mesh = Mesh {
            positions: Vec::with_capacity(rotations.len() * 18),
            scalar_attr: Vec::with_capacity(rotations.len() * 18),
            triangle_count: 0,
        };
        for rotation in &rotations {
            for corner in face {
                // snap away the float noise from the rotation
                let p = transform_point(rotation, corner).round();
                mesh.positions.extend_from_slice(&[p.x, p.y, p.z]);
                let shade = (p.y + 1.0) * 0.5;
                mesh.scalar_attr.extend_from_slice(&[shade, shade, shade]);
            }
            mesh.triangle_count += 2;
        }
        mesh
    }
}

// Map a grid index onto model space [-1, 1)
fn grid_to_model(index: u32, dimension: u32) -> f32 {
    (index as f32 / dimension as f32 - 0.5) * 2.0
}

// Two triangles per grid cell, always split along the TR-BL diagonal:
//   A = (TL, BL, TR), B = (TR, BL, BR)
// Elevation goes straight into Y; any vertical exaggeration is applied
// by the model transform, not baked in here.
pub fn tessellate(heightfield: &Heightfield) -> Mesh {
    let width = heightfield.width();
    let height = heightfield.height();
    let cells = width.saturating_sub(1) as usize * height.saturating_sub(1) as usize;

    let mut mesh = Mesh {
        positions: Vec::with_capacity(cells * 18),
        scalar_attr: Vec::with_capacity(cells * 18),
        triangle_count: 0,
    };

    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let tl = heightfield.get(x, y);
            let tr = heightfield.get(x + 1, y);
            let bl = heightfield.get(x, y + 1);
            let br = heightfield.get(x + 1, y + 1);

            let x_left = grid_to_model(x, width);
            let x_right = grid_to_model(x + 1, width);
            let z_top = grid_to_model(y, height);
            let z_bottom = grid_to_model(y + 1, height);

            // triangle A
            mesh.push_vertex(x_left, tl, z_top);
            mesh.push_vertex(x_left, bl, z_bottom);
            mesh.push_vertex(x_right, tr, z_top);

            // triangle B
            mesh.push_vertex(x_right, tr, z_top);
            mesh.push_vertex(x_left, bl, z_bottom);
            mesh.push_vertex(x_right, br, z_bottom);

            mesh.triangle_count += 2;
        }
    }

    mesh
}
