// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the clipping window.

pub mod canvas;
pub mod help;
pub mod preview;
pub mod toolbar;
