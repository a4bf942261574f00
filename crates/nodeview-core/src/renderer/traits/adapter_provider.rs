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

use crate::renderer::api::{FeatureLevel, GraphicsAdapterInfo};

/// A trait for a backend that can enumerate physical adapters and create a
/// logical device on one of them.
///
/// The [`AdapterSelector`](crate::renderer::AdapterSelector) drives this trait;
/// it never needs to know the backend's concrete adapter or device types.
pub trait AdapterProvider {
    /// The backend's physical adapter handle.
    type Adapter;
    /// The backend's logical device handle.
    type Device;

    /// Lists every adapter the backend can see, in enumeration order.
    fn enumerate_adapters(&self) -> Vec<Self::Adapter>;

    /// Describes an adapter returned by [`enumerate_adapters`](Self::enumerate_adapters).
    fn adapter_info(&self, adapter: &Self::Adapter) -> GraphicsAdapterInfo;

    /// Tries to create a device on `adapter` that supports at least `minimum_level`.
    ///
    /// ## Returns
    /// The created device, or a human-readable reason the adapter was refused.
    fn create_device(
        &self,
        adapter: &Self::Adapter,
        minimum_level: FeatureLevel,
    ) -> Result<Self::Device, String>;
}
