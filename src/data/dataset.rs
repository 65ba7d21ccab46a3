use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully tokenised and padded training segment:
/// a fixed-length token window and the class id of its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionSample {
    pub input_ids: Vec<u32>,
    pub author_id: usize,
}

pub struct AttributionDataset {
    samples: Vec<AttributionSample>,
}

impl AttributionDataset {
    pub fn new(samples: Vec<AttributionSample>) -> Self {
        Self { samples }
    }
}

impl Dataset<AttributionSample> for AttributionDataset {
    fn get(&self, index: usize) -> Option<AttributionSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
