// Stateless 4x4 transform builders. Column-vector convention:
// a point is transformed as `m * p`, so in `a * b` the `b` transform
// applies first.
use glam::{Mat4, Vec3, Vec4};

// World -> view matrix for a camera at `eye` looking at `target`.
// `up_hint` must not be parallel to the viewing direction; if it is,
// the basis is undefined (NaN), not a panic.
pub fn look_at(eye: Vec3, target: Vec3, up_hint: Vec3) -> Mat4 {
    let forward = (target - eye).normalize();
    let right = forward.cross(up_hint).normalize();
    let up = right.cross(forward);

    Mat4::from_cols(
        Vec4::new(right.x, up.x, -forward.x, 0.0),
        Vec4::new(right.y, up.y, -forward.y, 0.0),
        Vec4::new(right.z, up.z, -forward.z, 0.0),
        Vec4::new(-right.dot(eye), -up.dot(eye), forward.dot(eye), 1.0),
    )
}

// OpenGL clip space (z in [-1, 1]).
// Needs near > 0, far > near, aspect > 0; otherwise the result is degenerate.
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far)
}

pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
}

pub fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

pub fn rotate_x(radians: f32) -> Mat4 {
    Mat4::from_rotation_x(radians)
}

pub fn rotate_y(radians: f32) -> Mat4 {
    Mat4::from_rotation_y(radians)
}

pub fn rotate_z(radians: f32) -> Mat4 {
    Mat4::from_rotation_z(radians)
}

// Right-multiply in list order: compose(&[a, b, c]) == a * b * c,
// so `c` acts first in the local frame and `a` acts last.
pub fn compose(transforms: &[Mat4]) -> Mat4 {
    transforms.iter().fold(Mat4::IDENTITY, |acc, m| acc * *m)
}

pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    m.transform_point3(p)
}
