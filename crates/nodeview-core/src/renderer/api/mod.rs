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

//! Backend-agnostic value types shared between the core components and the
//! backend implementations.

pub mod adapter;
pub mod camera;
pub mod descriptor;
pub mod region;
pub mod settings;
pub mod texture;

pub use self::adapter::*;
pub use self::camera::*;
pub use self::descriptor::*;
pub use self::region::*;
pub use self::settings::*;
pub use self::texture::*;
