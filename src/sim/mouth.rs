//! Mouth-openness sources
//!
//! Button mode maps a held key to a fixed angle. Face mode maps the lip gap
//! reported by a face-landmark tracker through a clamped linear ramp.
//! Tracker results arrive asynchronously, so they go through a single-slot
//! mailbox that the frame loop reads at frame start.

use glam::Vec2;

use super::state::ControlMode;
use crate::Tuning;

/// One face-landmark report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceReport {
    pub keypoints: Vec<Vec2>,
}

impl FaceReport {
    /// Build from interleaved `[x0, y0, x1, y1, ...]` coordinates
    pub fn from_flat(coords: &[f32]) -> Self {
        Self {
            keypoints: coords
                .chunks_exact(2)
                .map(|c| Vec2::new(c[0], c[1]))
                .collect(),
        }
    }

    /// Mean lower-lip y minus mean upper-lip y; `None` if a landmark is missing
    pub fn mouth_distance(&self, upper: &[usize], lower: &[usize]) -> Option<f32> {
        let mean_y = |indices: &[usize]| -> Option<f32> {
            if indices.is_empty() {
                return None;
            }
            let mut sum = 0.0;
            for &i in indices {
                sum += self.keypoints.get(i)?.y;
            }
            Some(sum / indices.len() as f32)
        };
        Some(mean_y(lower)? - mean_y(upper)?)
    }
}

/// Map a lip gap to a mouth angle
///
/// Gaps at or below the close threshold give 0, gaps at or beyond the max-open
/// distance give the max angle, and the ramp in between is linear.
pub fn aperture_to_angle(distance: f32, tuning: &Tuning) -> f32 {
    let close = tuning.face_close_threshold;
    let open = tuning.face_max_open_distance;
    if distance <= close {
        return 0.0;
    }
    if open <= close {
        return tuning.max_mouth_angle;
    }
    let t = ((distance - close) / (open - close)).clamp(0.0, 1.0);
    t * tuning.max_mouth_angle
}

/// Face tracking capability as seen by the simulation
pub trait FaceTracking {
    /// Whether a camera stream is live right now (never cached)
    fn is_available(&self) -> bool;
    /// Begin delivering reports; returns false if tracking could not start
    fn start(&mut self) -> bool;
    /// Stop delivering reports and forget the last one. Safe to repeat.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    /// Most recent report since the last `start`
    fn latest(&self) -> Option<FaceReport>;
}

/// Single-slot tracker mailbox
///
/// Reports overwrite each other; anything delivered while stopped is dropped
/// so late callbacks cannot leak into a new session.
#[derive(Debug, Clone, Default)]
pub struct FaceTracker {
    /// Camera presence as reported by the platform
    pub available: bool,
    running: bool,
    slot: Option<FaceReport>,
}

impl FaceTracker {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            running: false,
            slot: None,
        }
    }

    /// A tracker for hosts with no camera
    pub fn unavailable() -> Self {
        Self::new(false)
    }

    /// Store a report; returns false when it was discarded
    pub fn deliver(&mut self, report: FaceReport) -> bool {
        if !self.running {
            return false;
        }
        self.slot = Some(report);
        true
    }
}

impl FaceTracking for FaceTracker {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self) -> bool {
        if !self.available {
            return false;
        }
        self.running = true;
        self.slot = None;
        true
    }

    fn stop(&mut self) {
        self.running = false;
        self.slot = None;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn latest(&self) -> Option<FaceReport> {
        self.slot.clone()
    }
}

/// Mouth angle for this frame
///
/// Face mode with no report yet reads as closed.
pub fn mouth_angle(
    mode: ControlMode,
    button_open: bool,
    report: Option<&FaceReport>,
    tuning: &Tuning,
) -> f32 {
    match mode {
        ControlMode::Button => {
            if button_open {
                tuning.button_max_angle
            } else {
                0.0
            }
        }
        ControlMode::Face => report
            .and_then(|r| r.mouth_distance(&tuning.upper_lip_indices, &tuning.lower_lip_indices))
            .map(|d| aperture_to_angle(d, tuning))
            .unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A report whose lips sit `gap` pixels apart
    fn report_with_gap(tuning: &Tuning, gap: f32) -> FaceReport {
        let mut keypoints = vec![Vec2::ZERO; 478];
        for &i in &tuning.upper_lip_indices {
            keypoints[i] = Vec2::new(0.0, 100.0);
        }
        for &i in &tuning.lower_lip_indices {
            keypoints[i] = Vec2::new(0.0, 100.0 + gap);
        }
        FaceReport { keypoints }
    }

    #[test]
    fn test_ramp_endpoints() {
        let tuning = Tuning::default();
        assert_eq!(aperture_to_angle(0.0, &tuning), 0.0);
        assert_eq!(aperture_to_angle(25.0, &tuning), 0.0);
        assert!((aperture_to_angle(70.0, &tuning) - tuning.max_mouth_angle).abs() < 1e-6);
        assert!((aperture_to_angle(47.5, &tuning) - tuning.max_mouth_angle / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_button_mode_angles() {
        let tuning = Tuning::default();
        assert_eq!(mouth_angle(ControlMode::Button, false, None, &tuning), 0.0);
        assert_eq!(
            mouth_angle(ControlMode::Button, true, None, &tuning),
            std::f32::consts::FRAC_PI_4
        );
    }

    #[test]
    fn test_face_mode_without_report_is_closed() {
        let tuning = Tuning::default();
        assert_eq!(mouth_angle(ControlMode::Face, true, None, &tuning), 0.0);

        let empty = FaceReport::default();
        assert_eq!(mouth_angle(ControlMode::Face, false, Some(&empty), &tuning), 0.0);
    }

    #[test]
    fn test_face_mode_uses_lip_gap() {
        let tuning = Tuning::default();
        let report = report_with_gap(&tuning, 80.0);
        let angle = mouth_angle(ControlMode::Face, false, Some(&report), &tuning);
        assert!((angle - tuning.max_mouth_angle).abs() < 1e-6);
    }

    #[test]
    fn test_from_flat() {
        let report = FaceReport::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(report.keypoints, vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
    }

    #[test]
    fn test_mailbox_drops_late_reports() {
        let tuning = Tuning::default();
        let mut tracker = FaceTracker::new(true);

        // Not started yet
        assert!(!tracker.deliver(report_with_gap(&tuning, 50.0)));
        assert!(tracker.latest().is_none());

        assert!(tracker.start());
        assert!(tracker.deliver(report_with_gap(&tuning, 30.0)));
        assert!(tracker.deliver(report_with_gap(&tuning, 60.0)));
        let latest = tracker.latest().unwrap();
        let gap = latest
            .mouth_distance(&tuning.upper_lip_indices, &tuning.lower_lip_indices)
            .unwrap();
        assert!((gap - 60.0).abs() < 1e-4);

        tracker.stop();
        tracker.stop();
        assert!(!tracker.is_running());
        assert!(tracker.latest().is_none());
        assert!(!tracker.deliver(report_with_gap(&tuning, 40.0)));
        assert!(tracker.latest().is_none());
    }

    #[test]
    fn test_unavailable_tracker_refuses_start() {
        let mut tracker = FaceTracker::unavailable();
        assert!(!tracker.is_available());
        assert!(!tracker.start());
        assert!(!tracker.is_running());
    }

    proptest! {
        #[test]
        fn prop_closed_below_threshold(d in -100.0f32..25.0) {
            prop_assert_eq!(aperture_to_angle(d, &Tuning::default()), 0.0);
        }

        #[test]
        fn prop_saturates_past_max(d in 70.0f32..10_000.0) {
            let tuning = Tuning::default();
            prop_assert!((aperture_to_angle(d, &tuning) - tuning.max_mouth_angle).abs() < 1e-6);
        }

        #[test]
        fn prop_monotonic(a in 0.0f32..120.0, b in 0.0f32..120.0) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(aperture_to_angle(lo, &tuning) <= aperture_to_angle(hi, &tuning));
        }

        #[test]
        fn prop_angle_in_range(d in -1000.0f32..1000.0) {
            let tuning = Tuning::default();
            let angle = aperture_to_angle(d, &tuning);
            prop_assert!(angle >= 0.0 && angle <= tuning.max_mouth_angle);
        }
    }
}
