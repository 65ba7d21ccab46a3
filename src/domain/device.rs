// ============================================================
// Layer 3 — Compute Device Tag
// ============================================================
// An enumerated tag naming the device a model component was
// built for. Encoder, decoder and composite model must all
// carry the same tag; GoodWillHunting::new checks this once
// at construction and refuses mixed placements rather than
// letting tensors silently migrate between devices mid-pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a model component expects its tensors to live.
/// Decided at construction time, never renegotiated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeDevice {
    /// Host CPU — used by the ndarray test backend
    Cpu,
    /// GPU via the wgpu backend — the training default
    Gpu,
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeDevice::Cpu => write!(f, "cpu"),
            ComputeDevice::Gpu => write!(f, "gpu"),
        }
    }
}
