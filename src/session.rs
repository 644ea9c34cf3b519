//! Session container: one recording's named arrays, loaded fully into
//! memory from an `.npz` archive.

use ndarray::{s, Array0, Array1, Array2};
use ndarray_npy::NpzReader;
use num_complex::Complex64;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::constants::NANOS_PER_SEC;
use crate::error::{Result, RingphaseError};

/// One imaging session: fluorescence, its frame clock, the behavior stream,
/// and the stimulus onset.
#[derive(Debug, Clone)]
pub struct ImagingSession {
    /// ΔF/F in region × time layout
    pub dfof: Array2<f64>,

    /// Epoch time (ns) of each imaging frame
    pub image_timestamps: Array1<f64>,

    /// Orientation of the animal in VR space, radians
    pub vr_heading: Array1<f64>,

    /// Epoch time (ns) of each behavior sample
    pub vr_timestamps: Array1<f64>,

    /// VR position as x + iy; carried for completeness, not used by the
    /// analysis
    pub vr_position: Array1<Complex64>,

    /// Moment the visual environment is activated
    pub bar_on_time: f64,
}

impl ImagingSession {
    /// Load a session archive and validate the array shapes against each
    /// other.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut npz = NpzReader::new(File::open(path)?)?;

        let dfof: Array2<f64> = npz.by_name("dfof")?;
        let image_timestamps: Array1<f64> = npz.by_name("image_timestamps")?;
        let vr_heading: Array1<f64> = npz.by_name("vr_heading")?;
        let vr_timestamps: Array1<f64> = npz.by_name("vr_timestamps")?;
        let vr_position: Array1<Complex64> = npz.by_name("vr_position")?;
        let bar_on_time: Array0<f64> = npz.by_name("bar_on_time")?;

        if dfof.ncols() == 0 {
            return Err(RingphaseError::EmptyTimeSeries("fluorescence"));
        }
        if vr_heading.is_empty() {
            return Err(RingphaseError::EmptyTimeSeries("vr heading"));
        }
        if dfof.ncols() != image_timestamps.len() {
            return Err(RingphaseError::ShapeMismatch {
                what: "image timestamps",
                expected: dfof.ncols(),
                actual: image_timestamps.len(),
            });
        }
        if vr_heading.len() != vr_timestamps.len() {
            return Err(RingphaseError::ShapeMismatch {
                what: "vr timestamps",
                expected: vr_heading.len(),
                actual: vr_timestamps.len(),
            });
        }

        debug!(
            regions = dfof.nrows(),
            frames = dfof.ncols(),
            behavior_samples = vr_heading.len(),
            "loaded session archive"
        );

        Ok(Self {
            dfof,
            image_timestamps,
            vr_heading,
            vr_timestamps,
            vr_position,
            bar_on_time: bar_on_time.into_scalar(),
        })
    }

    /// Number of wedge channels.
    pub fn n_regions(&self) -> usize {
        self.dfof.nrows()
    }

    /// Number of imaging frames.
    pub fn n_frames(&self) -> usize {
        self.dfof.ncols()
    }

    /// Owned copies of the fluorescence split where the VR is still off
    /// (frames before `bar_on_time`) and where it is on.
    pub fn split_at_stimulus(&self) -> (Array2<f64>, Array2<f64>) {
        let split = self
            .image_timestamps
            .iter()
            .take_while(|&&t| t < self.bar_on_time)
            .count();
        let pre = self.dfof.slice(s![.., ..split]).to_owned();
        let post = self.dfof.slice(s![.., split..]).to_owned();
        (pre, post)
    }

    /// Imaging timestamps rebased to seconds from the first frame, for axis
    /// labeling.
    pub fn seconds_from_start(&self) -> Array1<f64> {
        let t0 = self.image_timestamps[0];
        self.image_timestamps.mapv(|t| (t - t0) / NANOS_PER_SEC)
    }

    /// Behavior timestamps rebased to the same origin as
    /// [`seconds_from_start`](Self::seconds_from_start).
    pub fn vr_seconds_from_start(&self) -> Array1<f64> {
        let t0 = self.image_timestamps[0];
        self.vr_timestamps.mapv(|t| (t - t0) / NANOS_PER_SEC)
    }
}
