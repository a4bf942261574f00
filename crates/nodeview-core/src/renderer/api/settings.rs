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

//! Configuration recognized by a render surface.

use super::adapter::{AdapterSelectionConfig, FeatureLevel};
use super::region::ClearValues;
use super::texture::TextureFormat;
use crate::renderer::error::InitError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest accepted swap-chain ring.
pub const MIN_BUFFER_COUNT: u32 = 2;
/// Largest accepted swap-chain ring.
pub const MAX_BUFFER_COUNT: u32 = 16;

/// Settings that shape a [`RenderSurface`](crate::renderer::RenderSurface).
///
/// Every field has a default, so a partial file deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSurfaceConfig {
    /// Number of buffers in the swap-chain ring.
    pub buffer_count: u32,
    /// Requested format of the swap-chain buffers.
    pub color_format: TextureFormat,
    /// Format of the depth buffer.
    pub depth_format: TextureFormat,
    /// Skip software adapters during selection.
    pub hardware_only: bool,
    /// Prefer the adapter with the most dedicated video memory.
    pub prefer_max_memory: bool,
    /// Minimum feature level a device must be created at.
    pub minimum_feature_level: FeatureLevel,
    /// Depth value the depth buffer is cleared to.
    pub depth_clear_value: f32,
    /// Stencil value the depth buffer is cleared to.
    pub stencil_clear_value: u32,
    /// Linear RGBA color the back buffer is cleared to.
    pub clear_color: [f32; 4],
    /// Upper bound on any single fence wait; `None` waits forever.
    pub fence_timeout: Option<Duration>,
    /// Synchronize presentation with the display refresh.
    pub vsync: bool,
    /// Enable backend validation and route its messages to the log.
    pub enable_validation: bool,
}

impl Default for RenderSurfaceConfig {
    fn default() -> Self {
        Self {
            buffer_count: 3,
            color_format: TextureFormat::Rgba8Unorm,
            depth_format: TextureFormat::Depth32Float,
            hardware_only: true,
            prefer_max_memory: true,
            minimum_feature_level: FeatureLevel::Core,
            depth_clear_value: 1.0,
            stencil_clear_value: 0,
            clear_color: [0.1, 0.1, 0.12, 1.0],
            fence_timeout: Some(Duration::from_secs(5)),
            vsync: true,
            enable_validation: cfg!(debug_assertions),
        }
    }
}

impl RenderSurfaceConfig {
    /// Checks the settings that would otherwise only fail deep inside a backend.
    pub fn validate(&self) -> Result<(), InitError> {
        if !(MIN_BUFFER_COUNT..=MAX_BUFFER_COUNT).contains(&self.buffer_count) {
            return Err(InitError::InvalidConfig(format!(
                "buffer_count must be in {MIN_BUFFER_COUNT}..={MAX_BUFFER_COUNT}, got {}",
                self.buffer_count
            )));
        }
        if self.color_format.is_depth() {
            return Err(InitError::InvalidConfig(format!(
                "color_format {:?} is a depth format",
                self.color_format
            )));
        }
        if !self.depth_format.is_depth() {
            return Err(InitError::InvalidConfig(format!(
                "depth_format {:?} is not a depth format",
                self.depth_format
            )));
        }
        if !(0.0..=1.0).contains(&self.depth_clear_value) {
            return Err(InitError::InvalidConfig(format!(
                "depth_clear_value {} is outside 0..=1",
                self.depth_clear_value
            )));
        }
        Ok(())
    }

    /// The adapter selection constraints carried by this configuration.
    pub fn adapter_selection(&self) -> AdapterSelectionConfig {
        AdapterSelectionConfig {
            minimum_feature_level: self.minimum_feature_level,
            hardware_only: self.hardware_only,
            prefer_max_memory: self.prefer_max_memory,
        }
    }

    /// The per-frame clear values carried by this configuration.
    pub fn clear_values(&self) -> ClearValues {
        ClearValues {
            color: self.clear_color,
            depth: self.depth_clear_value,
            stencil: self.stencil_clear_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = RenderSurfaceConfig::default();
        assert_eq!(config.buffer_count, 3);
        assert_eq!(config.color_format, TextureFormat::Rgba8Unorm);
        assert_eq!(config.depth_format, TextureFormat::Depth32Float);
        assert!(config.hardware_only);
        assert!(config.prefer_max_memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_buffer_count_is_rejected() {
        let config = RenderSurfaceConfig {
            buffer_count: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));
    }

    #[test]
    fn swapped_formats_are_rejected() {
        let config = RenderSurfaceConfig {
            color_format: TextureFormat::Depth32Float,
            depth_format: TextureFormat::Rgba8Unorm,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: RenderSurfaceConfig =
            serde_json::from_str(r#"{ "buffer_count": 2, "vsync": false }"#).unwrap();
        assert_eq!(config.buffer_count, 2);
        assert!(!config.vsync);
        assert_eq!(config.depth_format, TextureFormat::Depth32Float);
        assert_eq!(config.fence_timeout, Some(Duration::from_secs(5)));
    }
}
