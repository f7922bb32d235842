// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Selection state and the clipping session.

pub mod editor;
pub mod roi;
pub mod session;
