use crate::enums::FlipAxis;
use crate::vector_math::EulerAngles;
use std::collections::VecDeque;

/// Number of prior states the undo history retains. The buffer is a ring,
/// not a full undo stack: the oldest snapshot is evicted on overflow.
pub const HISTORY_CAPACITY: usize = 3;

/// Slice indices and view rotation captured before a navigation action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateSnapshot {
    pub slice_indices: [i32; 3],
    pub view_angles: EulerAngles,
}

/// Per-axis mirror counters.
///
/// Counters record how many times each flip was applied, not the parity.
/// Replaying a volume's orientation repeats the flip exactly that many
/// times, matching the review tool's volume-switch behavior step for
/// step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlipCounts {
    pub left_right: u32,
    pub front_back: u32,
    pub top_bottom: u32,
}

impl FlipCounts {
    pub fn get(&self, axis: FlipAxis) -> u32 {
        match axis {
            FlipAxis::LeftRight => self.left_right,
            FlipAxis::FrontBack => self.front_back,
            FlipAxis::TopBottom => self.top_bottom,
        }
    }

    pub(crate) fn bump(&mut self, axis: FlipAxis) {
        match axis {
            FlipAxis::LeftRight => self.left_right += 1,
            FlipAxis::FrontBack => self.front_back += 1,
            FlipAxis::TopBottom => self.top_bottom += 1,
        }
    }
}

/// Mutable navigation state for one loaded volume.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Current slice index per axis (x, y, z).
    pub slice_indices: [i32; 3],
    /// Current live view rotation.
    pub view_angles: EulerAngles,
    pub flip_counts: FlipCounts,
    /// Set once a frame rebuild has succeeded for this volume.
    pub frame_established: bool,
    history: VecDeque<StateSnapshot>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current slice indices and view angles. On overflow the
    /// oldest snapshot is dropped.
    pub fn push_snapshot(&mut self) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(StateSnapshot {
            slice_indices: self.slice_indices,
            view_angles: self.view_angles,
        });
    }

    /// Restore the most recent snapshot. Returns `false` (and leaves the
    /// state untouched) when the history is empty; an empty undo is not an
    /// operator-facing error.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(snapshot) => {
                self.slice_indices = snapshot.slice_indices;
                self.view_angles = snapshot.view_angles;
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
