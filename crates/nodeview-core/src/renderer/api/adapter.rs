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

//! Adapter and device information, and the knobs that drive adapter selection.

use serde::{Deserialize, Serialize};

/// The graphics API an adapter is exposed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsBackendType {
    /// Vulkan.
    Vulkan,
    /// Direct3D 12.
    Dx12,
    /// Apple Metal.
    Metal,
    /// OpenGL / OpenGL ES.
    OpenGL,
    /// Browser WebGPU.
    WebGpu,
    /// Anything the backend could not classify.
    #[default]
    Unknown,
}

/// The physical kind of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererDeviceType {
    /// A GPU sharing memory with the CPU.
    IntegratedGpu,
    /// A GPU with its own dedicated memory.
    DiscreteGpu,
    /// A virtualized GPU (VM passthrough, remote desktop).
    VirtualGpu,
    /// A software rasterizer running on the CPU.
    Cpu,
    /// Unknown device type.
    #[default]
    Unknown,
}

/// The minimum capability tier a device must satisfy to be accepted.
///
/// Ordered: a device supporting `Core` also satisfies `Downlevel`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum FeatureLevel {
    /// Reduced capability set (GLES3 / WebGL2 class hardware).
    Downlevel,
    /// Full core capability set.
    #[default]
    Core,
}

/// Standardized, backend-agnostic information about a graphics adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphicsAdapterInfo {
    /// The name of the adapter (e.g., "NVIDIA GeForce RTX 4090").
    pub name: String,
    /// PCI vendor id, or 0 when unknown.
    pub vendor: u32,
    /// PCI device id, or 0 when unknown.
    pub device: u32,
    /// The graphics API backend this adapter is associated with.
    pub backend_type: GraphicsBackendType,
    /// The physical type of the adapter.
    pub device_type: RendererDeviceType,
    /// Dedicated video memory in bytes, as far as the backend can tell.
    pub dedicated_video_memory: u64,
    /// `true` for software / fallback adapters.
    pub is_software: bool,
}

/// Constraints and preferences used by the
/// [`AdapterSelector`](crate::renderer::AdapterSelector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSelectionConfig {
    /// The device must be created at (at least) this feature level.
    pub minimum_feature_level: FeatureLevel,
    /// Skip software adapters.
    pub hardware_only: bool,
    /// Keep the adapter with the most dedicated memory instead of the last one
    /// that successfully created a device.
    pub prefer_max_memory: bool,
}

impl Default for AdapterSelectionConfig {
    fn default() -> Self {
        Self {
            minimum_feature_level: FeatureLevel::Core,
            hardware_only: true,
            prefer_max_memory: true,
        }
    }
}

/// Why an enumerated adapter was passed over during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A software adapter was found while hardware-only selection was requested.
    Software,
    /// The backend refused to create a device on the adapter.
    DeviceCreationFailed(String),
}

/// A record of one adapter that was skipped during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAdapter {
    /// Position of the adapter in enumeration order.
    pub index: usize,
    /// Adapter name, for diagnostics.
    pub name: String,
    /// The reason it was skipped.
    pub reason: SkipReason,
}

/// Result of a successful adapter selection.
#[derive(Debug)]
pub struct AdapterSelection<TAdapter, TDevice> {
    /// The selected adapter.
    pub adapter: TAdapter,
    /// The device created on the selected adapter.
    pub device: TDevice,
    /// Information about the selected adapter.
    pub adapter_info: GraphicsAdapterInfo,
    /// Position of the selected adapter in enumeration order.
    pub adapter_index: usize,
    /// Time taken for the selection process.
    pub selection_time_ms: u64,
    /// Adapters that were skipped along the way.
    pub skipped: Vec<SkippedAdapter>,
}
