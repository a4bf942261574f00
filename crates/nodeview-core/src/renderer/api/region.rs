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

//! Rasterizer regions and clear values.

use super::descriptor::DescriptorSlot;

/// The mapping from normalized device coordinates to render-target pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Near end of the depth range.
    pub min_depth: f32,
    /// Far end of the depth range.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport covering a whole `width` x `height` target with depth range `0..1`.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// A pixel rectangle outside of which rasterization is discarded.
///
/// Edges are exclusive on the right and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl ScissorRect {
    /// A scissor covering a whole `width` x `height` target.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: i32::try_from(width).unwrap_or(i32::MAX),
            bottom: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    /// A rectangle is valid when it encloses at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }

    /// Width in pixels, zero for invalid rectangles.
    pub fn width(&self) -> u32 {
        u32::try_from(self.right.saturating_sub(self.left)).unwrap_or(0)
    }

    /// Height in pixels, zero for invalid rectangles.
    pub fn height(&self) -> u32 {
        u32::try_from(self.bottom.saturating_sub(self.top)).unwrap_or(0)
    }
}

/// Values the render targets are cleared to at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValues {
    /// Linear RGBA clear color.
    pub color: [f32; 4],
    /// Depth clear value.
    pub depth: f32,
    /// Stencil clear value.
    pub stencil: u32,
}

/// The targets cleared by one
/// [`CommandRecorder::clear_targets`](crate::renderer::traits::CommandRecorder::clear_targets) call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearTargets {
    /// Render-target view to clear to `values.color`.
    pub color: Option<DescriptorSlot>,
    /// Depth-stencil view to clear to `values.depth`.
    pub depth: Option<DescriptorSlot>,
    /// Also clear the stencil aspect of `depth` to `values.stencil`.
    pub clear_stencil: bool,
    /// The clear values.
    pub values: ClearValues,
}
