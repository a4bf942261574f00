// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A camera circling the origin.

use nodeview_core::renderer::CameraState;

type Vec3 = [f32; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: Vec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Right-handed view matrix, column-major.
fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> [[f32; 4]; 4] {
    let f = normalize(sub(target, eye));
    let s = normalize(cross(f, up));
    let u = cross(s, f);
    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-dot(eye, s), -dot(eye, u), dot(eye, f), 1.0],
    ]
}

/// Right-handed perspective with a 0..1 depth range, column-major.
fn perspective_rh_zo(fov_y: f32, aspect: f32, near: f32, far: f32) -> [[f32; 4]; 4] {
    let f = 1.0 / (fov_y / 2.0).tan();
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far / (near - far), -1.0],
        [0.0, 0.0, (near * far) / (near - far), 0.0],
    ]
}

/// Camera state `seconds` into a slow orbit of radius 5 around the origin.
pub fn orbit(seconds: f32, width: u32, height: u32) -> CameraState {
    const RADIUS: f32 = 5.0;
    const SPEED: f32 = 0.25;

    let angle = seconds * SPEED;
    let eye = [RADIUS * angle.cos(), 2.0, RADIUS * angle.sin()];
    let aspect = width.max(1) as f32 / height.max(1) as f32;

    CameraState {
        view: look_at_rh(eye, [0.0; 3], [0.0, 1.0, 0.0]),
        projection: perspective_rh_zo(std::f32::consts::FRAC_PI_4, aspect, 0.1, 100.0),
        position: [eye[0], eye[1], eye[2], 1.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_matrix_maps_the_eye_to_the_origin() {
        let camera = orbit(3.0, 1280, 720);
        let eye = [camera.position[0], camera.position[1], camera.position[2]];
        let v = camera.view;
        for row in 0..3 {
            let transformed = v[0][row] * eye[0] + v[1][row] * eye[1] + v[2][row] * eye[2] + v[3][row];
            assert!(transformed.abs() < 1e-4, "row {row}: {transformed}");
        }
    }

    #[test]
    fn orbit_keeps_a_constant_distance() {
        for t in [0.0, 1.5, 12.0] {
            let p = orbit(t, 800, 600).position;
            let horizontal = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((horizontal - 5.0).abs() < 1e-4);
        }
    }
}
