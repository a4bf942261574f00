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

//! Per-frame camera constants.

use bytemuck::{Pod, Zeroable};

/// Camera state supplied by the host for each drawn frame.
///
/// The layout matches a std140 uniform block so the backend can upload it
/// verbatim.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraState {
    /// Column-major view matrix.
    pub view: [[f32; 4]; 4],
    /// Column-major projection matrix.
    pub projection: [[f32; 4]; 4],
    /// World-space camera position; `w` is unused.
    pub position: [f32; 4],
}

impl CameraState {
    /// Column-major identity matrix.
    pub const IDENTITY: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    /// Size in bytes of the uploaded constant block.
    pub const SIZE: u64 = std::mem::size_of::<CameraState>() as u64;

    /// Returns the raw bytes of the constant block.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            view: Self::IDENTITY,
            projection: Self::IDENTITY,
            position: [0.0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_block_is_tightly_packed() {
        assert_eq!(CameraState::SIZE, 144);
        assert_eq!(CameraState::default().as_bytes().len(), 144);
    }
}
