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

//! Texture handles and formats.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An opaque handle to a GPU texture resource.
///
/// Backends never reuse an id, so two handles compare equal only if they name
/// the same resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// The texel formats the render core works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit RGBA, unsigned normalized.
    Rgba8Unorm,
    /// 8-bit RGBA, sRGB encoded.
    Rgba8UnormSrgb,
    /// 8-bit BGRA, unsigned normalized.
    Bgra8Unorm,
    /// 8-bit BGRA, sRGB encoded.
    Bgra8UnormSrgb,
    /// 10-bit RGB, 2-bit alpha.
    Rgb10a2Unorm,
    /// 16-bit float RGBA.
    Rgba16Float,
    /// 16-bit unsigned normalized depth.
    Depth16Unorm,
    /// At least 24-bit depth.
    Depth24Plus,
    /// At least 24-bit depth with 8-bit stencil.
    Depth24PlusStencil8,
    /// 32-bit float depth.
    Depth32Float,
    /// 32-bit float depth with 8-bit stencil.
    Depth32FloatStencil8,
}

impl TextureFormat {
    /// Returns `true` if the format carries a depth component.
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            TextureFormat::Depth16Unorm
                | TextureFormat::Depth24Plus
                | TextureFormat::Depth24PlusStencil8
                | TextureFormat::Depth32Float
                | TextureFormat::Depth32FloatStencil8
        )
    }

    /// Returns `true` if the format carries a stencil component.
    pub fn has_stencil(self) -> bool {
        matches!(
            self,
            TextureFormat::Depth24PlusStencil8 | TextureFormat::Depth32FloatStencil8
        )
    }

    /// Returns `true` for sRGB-encoded color formats.
    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            TextureFormat::Rgba8UnormSrgb | TextureFormat::Bgra8UnormSrgb
        )
    }

    /// Returns the format with the sRGB encoding toggled, if one exists.
    ///
    /// Formats that differ only in sRGB-ness are copy compatible.
    pub fn srgb_counterpart(self) -> Option<TextureFormat> {
        match self {
            TextureFormat::Rgba8Unorm => Some(TextureFormat::Rgba8UnormSrgb),
            TextureFormat::Rgba8UnormSrgb => Some(TextureFormat::Rgba8Unorm),
            TextureFormat::Bgra8Unorm => Some(TextureFormat::Bgra8UnormSrgb),
            TextureFormat::Bgra8UnormSrgb => Some(TextureFormat::Bgra8Unorm),
            _ => None,
        }
    }
}

/// Description of a depth(-stencil) buffer to create.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBufferDescriptor<'a> {
    /// A debug label for the resource.
    pub label: Option<Cow<'a, str>>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth format; must satisfy [`TextureFormat::is_depth`].
    pub format: TextureFormat,
    /// Optimized clear depth.
    pub clear_depth: f32,
    /// Optimized clear stencil.
    pub clear_stencil: u32,
}
