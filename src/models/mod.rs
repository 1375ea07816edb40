// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credential;
pub mod innerscan;
pub mod window;

pub use credential::{Credential, REFRESH_GRACE_SECS};
pub use innerscan::{
    Innerscan, InnerscanDataResponse, InnerscanResponse, MeasurementRecord, RawSample,
    SubjectProfile, Tag,
};
pub use window::{DateWindow, MAX_WINDOW_DAYS};
