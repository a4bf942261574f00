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

//! Physical adapter selection.

use crate::renderer::api::{
    AdapterSelection, AdapterSelectionConfig, GraphicsAdapterInfo, SkipReason, SkippedAdapter,
};
use crate::renderer::error::InitError;
use crate::renderer::traits::AdapterProvider;
use std::time::Instant;

/// Picks one adapter out of everything a backend enumerates.
///
/// Software adapters are skipped when `hardware_only` is set, and adapters
/// that refuse device creation are skipped rather than failing selection.
/// With `prefer_max_memory` the adapter with the most dedicated video memory
/// wins and ties go to the earliest one; otherwise the last adapter that
/// created a device wins.
#[derive(Debug, Clone, Default)]
pub struct AdapterSelector {
    config: AdapterSelectionConfig,
}

struct Candidate<A, D> {
    index: usize,
    adapter: A,
    device: D,
    info: GraphicsAdapterInfo,
}

impl AdapterSelector {
    /// Creates a selector applying `config`.
    pub fn new(config: AdapterSelectionConfig) -> Self {
        Self { config }
    }

    /// The constraints this selector applies.
    pub fn config(&self) -> &AdapterSelectionConfig {
        &self.config
    }

    /// Enumerates the adapters of `provider` and creates a device on the chosen one.
    ///
    /// ## Errors
    /// * `InitError::NoSuitableDevice` - If no adapter passed the filters. Not retried.
    pub fn select<P: AdapterProvider>(
        &self,
        provider: &P,
    ) -> Result<AdapterSelection<P::Adapter, P::Device>, InitError> {
        let start_time = Instant::now();
        let adapters = provider.enumerate_adapters();
        let adapters_examined = adapters.len();
        let mut best: Option<Candidate<P::Adapter, P::Device>> = None;
        let mut skipped = Vec::new();

        log::info!("Selecting a graphics adapter among {adapters_examined} candidates...");

        for (index, adapter) in adapters.into_iter().enumerate() {
            let info = provider.adapter_info(&adapter);

            if self.config.hardware_only && info.is_software {
                log::debug!("Skipping software adapter #{index} \"{}\"", info.name);
                skipped.push(SkippedAdapter {
                    index,
                    name: info.name,
                    reason: SkipReason::Software,
                });
                continue;
            }

            if self.config.prefer_max_memory {
                if let Some(current) = &best {
                    if info.dedicated_video_memory <= current.info.dedicated_video_memory {
                        log::debug!(
                            "Adapter #{index} \"{}\" ({} bytes) does not beat \"{}\" ({} bytes)",
                            info.name,
                            info.dedicated_video_memory,
                            current.info.name,
                            current.info.dedicated_video_memory
                        );
                        continue;
                    }
                }
            }

            match provider.create_device(&adapter, self.config.minimum_feature_level) {
                Ok(device) => {
                    log::debug!(
                        "Adapter #{index} \"{}\" accepted ({:?}, {} bytes dedicated)",
                        info.name,
                        info.device_type,
                        info.dedicated_video_memory
                    );
                    best = Some(Candidate {
                        index,
                        adapter,
                        device,
                        info,
                    });
                }
                Err(reason) => {
                    log::warn!(
                        "Device creation failed on adapter #{index} \"{}\": {reason}",
                        info.name
                    );
                    skipped.push(SkippedAdapter {
                        index,
                        name: info.name,
                        reason: SkipReason::DeviceCreationFailed(reason),
                    });
                }
            }
        }

        let Some(chosen) = best else {
            log::error!("No suitable graphics adapter among {adapters_examined} candidates");
            return Err(InitError::NoSuitableDevice { adapters_examined });
        };

        let selection_time_ms = start_time.elapsed().as_millis() as u64;
        log::info!(
            "Selected adapter \"{}\" ({:?} on {:?}) in {selection_time_ms} ms",
            chosen.info.name,
            chosen.info.device_type,
            chosen.info.backend_type
        );

        Ok(AdapterSelection {
            adapter: chosen.adapter,
            device: chosen.device,
            adapter_info: chosen.info,
            adapter_index: chosen.index,
            selection_time_ms,
            skipped,
        })
    }
}
