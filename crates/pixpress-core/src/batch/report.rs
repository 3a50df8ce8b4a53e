//! Per-item results of a batch run.

use crate::params::CompressionLevel;
use crate::pipeline::CompressError;

/// What happened to one item during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The item was compressed.
    Compressed {
        width: u32,
        height: u32,
        estimated_size: usize,
    },
    /// The item was decoded for preview (no compression requested).
    Decoded { width: u32, height: u32 },
    /// A pipeline stage failed. The item keeps its original bytes.
    Failed(CompressError),
    /// The run was cancelled before this item started.
    Cancelled,
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed(_))
    }
}

/// Report line for one item, at its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub index: usize,
    pub name: String,
    pub original_size: usize,
    pub outcome: ItemOutcome,
}

/// Results of one coordinator run, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub level: CompressionLevel,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Compressed { .. } | ItemOutcome::Decoded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(ItemOutcome::is_failure)
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Cancelled))
    }

    /// Original bytes of the items that were compressed in this run.
    pub fn total_original_size(&self) -> usize {
        self.compressed_pairs().map(|(original, _)| original).sum()
    }

    /// Estimated output bytes of the items that were compressed in this run.
    pub fn total_estimated_size(&self) -> usize {
        self.compressed_pairs().map(|(_, estimated)| estimated).sum()
    }

    /// Fraction of bytes saved across compressed items, e.g. `0.75` for a
    /// 4:1 reduction. Negative if outputs grew. `None` if nothing was
    /// compressed or the originals were empty.
    pub fn savings_ratio(&self) -> Option<f64> {
        let original = self.total_original_size();
        if original == 0 {
            return None;
        }
        Some(1.0 - self.total_estimated_size() as f64 / original as f64)
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }

    fn compressed_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.items.iter().filter_map(|item| match item.outcome {
            ItemOutcome::Compressed { estimated_size, .. } => {
                Some((item.original_size, estimated_size))
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeError;

    fn line(index: usize, original_size: usize, outcome: ItemOutcome) -> ItemReport {
        ItemReport {
            index,
            name: format!("img{index}.png"),
            original_size,
            outcome,
        }
    }

    #[test]
    fn test_counts_and_totals() {
        let report = BatchReport {
            level: CompressionLevel::DEFAULT,
            items: vec![
                line(0, 1000, ItemOutcome::Compressed { width: 5, height: 5, estimated_size: 250 }),
                line(1, 500, ItemOutcome::Failed(DecodeError::InvalidFormat.into())),
                line(2, 3000, ItemOutcome::Compressed { width: 9, height: 9, estimated_size: 750 }),
                line(3, 800, ItemOutcome::Cancelled),
            ],
        };

        assert_eq!(report.len(), 4);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.cancelled(), 1);
        assert_eq!(report.total_original_size(), 4000);
        assert_eq!(report.total_estimated_size(), 1000);
        assert_eq!(report.savings_ratio(), Some(0.75));
    }

    #[test]
    fn test_savings_ratio_empty() {
        let report = BatchReport {
            level: CompressionLevel::DEFAULT,
            items: vec![],
        };
        assert!(report.is_empty());
        assert_eq!(report.savings_ratio(), None);
    }
}
