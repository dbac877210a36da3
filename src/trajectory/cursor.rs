use crate::ephemeris::EphemerisSeries;
use nalgebra_glm as glm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Unloaded,
    Ready,
    Playing,
}

/// Per-body playback state
///
/// `next_index` always names the sample that follows `current_index`.
/// Both stay inside the series once it is seeded.
#[derive(Debug, Clone)]
pub struct TrajectoryCursor {
    pub current_index: usize,
    pub next_index: usize,
    pub current_position: glm::DVec3,
    pub target_position: glm::DVec3,
    pub elapsed_time: f64,
    state: PlaybackState,
}

impl Default for TrajectoryCursor {
    fn default() -> Self {
        Self {
            current_index: 0,
            next_index: 1,
            current_position: glm::vec3(0.0, 0.0, 0.0),
            target_position: glm::vec3(0.0, 0.0, 0.0),
            elapsed_time: 0.0,
            state: PlaybackState::Unloaded,
        }
    }
}

impl TrajectoryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state != PlaybackState::Unloaded
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// UNLOADED -> READY: start at sample 0 heading for sample 1
    pub fn seed(&mut self, series: &EphemerisSeries) {
        self.current_index = 0;
        self.next_index = 1;
        self.current_position = series.position(0);
        self.target_position = series.position(1);
        self.elapsed_time = 0.0;
        self.state = PlaybackState::Ready;
    }

    pub(crate) fn mark_playing(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Arrival at the target under constant-speed stepping.
    /// Past the last sample the body restarts at sample 0 heading for sample 1.
    /// Returns true when the loop restarted.
    pub fn advance_with_restart(&mut self, series: &EphemerisSeries) -> bool {
        self.current_position = self.target_position;
        self.next_index += 1;
        let wrapped = self.next_index >= series.len();
        if wrapped {
            self.next_index = 1;
            self.current_position = series.position(0);
        }
        self.current_index = self.next_index - 1;
        self.target_position = series.position(self.next_index);
        wrapped
    }

    /// Arrival under eased interpolation: both indices move together and
    /// the position snaps to the new current sample.
    /// Returns true when the pair wrapped to (0, 1).
    pub fn advance_pair(&mut self, series: &EphemerisSeries) -> bool {
        self.current_index += 1;
        self.next_index += 1;
        let wrapped = self.next_index >= series.len();
        if wrapped {
            self.current_index = 0;
            self.next_index = 1;
        }
        self.current_position = series.position(self.current_index);
        self.target_position = series.position(self.next_index);
        wrapped
    }

    pub fn remaining_distance(&self) -> f64 {
        glm::distance(&self.current_position, &self.target_position)
    }
}
