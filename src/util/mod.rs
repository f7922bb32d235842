// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry and pixel helpers.

pub mod crop;
pub mod geometry;
pub mod watershed;
