//! Filtered, order-preserving projection of the session's sample list.
//!
//! [`project`] walks the raw list once and pairs each admitted sample with its
//! original index. The result borrows the sample list, so the borrow checker
//! rejects any attempt to mutate the session while a projection is alive; a
//! fresh projection has to be taken after every mutation.

use crate::types::Sample;

/// Which samples the view admits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Samples with at least one label.
    OnlyFinished,
    /// Samples with no label yet.
    OnlyUnfinished,
}

impl Filter {
    pub fn admits(self, sample: &Sample) -> bool {
        match self {
            Filter::All => true,
            Filter::OnlyFinished => sample.is_labeled(),
            Filter::OnlyUnfinished => !sample.is_labeled(),
        }
    }

    /// Toggles "only unfinished": on from any other filter, off back to `All`.
    pub fn toggle_unfinished(self) -> Self {
        if self == Filter::OnlyUnfinished { Filter::All } else { Filter::OnlyUnfinished }
    }

    /// Toggles "only finished": on from any other filter, off back to `All`.
    pub fn toggle_finished(self) -> Self {
        if self == Filter::OnlyFinished { Filter::All } else { Filter::OnlyFinished }
    }

    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::OnlyFinished => "finished",
            Filter::OnlyUnfinished => "unfinished",
        }
    }
}

/// One entry of a projected view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleSample<'a> {
    pub sample: &'a Sample,
    /// Position of `sample` in the full, unfiltered list at projection time.
    pub original_index: usize,
}

/// Projects `samples` through `filter`, keeping their relative order.
pub fn project(samples: &[Sample], filter: Filter) -> Vec<VisibleSample<'_>> {
    samples
        .iter()
        .enumerate()
        .filter(|(_, sample)| filter.admits(sample))
        .map(|(original_index, sample)| VisibleSample { sample, original_index })
        .collect()
}

/// Labeling progress over the full sample list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(samples: &[Sample]) -> Self {
        Self {
            completed: samples.iter().filter(|s| s.is_labeled()).count(),
            total: samples.len(),
        }
    }

    /// Whole-number percentage of labeled samples; `0` for an empty list.
    pub fn percent(self) -> u16 {
        if self.total == 0 {
            0
        } else {
            (self.completed * 100 / self.total) as u16
        }
    }
}
