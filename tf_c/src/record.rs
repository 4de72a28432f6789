//! Transform record marshalling
//!
//! Converts between the flat record crossing the boundary and the engine's
//! [`TransformStamped`]. Both directions are lossless for every representable
//! field value; no validation happens here, bad frame names surface later as
//! engine lookup failures.

use tf_core::{TfTime, Transform, TransformStamped};

/// Flat transform record returned by lookups.
///
/// The field order is part of the C contract and mirrors the managed side's
/// struct layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TfTransformRecord {
    pub sec: i32,
    pub nanosec: u32,
    pub translation_x: f64,
    pub translation_y: f64,
    pub translation_z: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub rotation_z: f64,
    pub rotation_w: f64,
}

/// Build an engine transform from raw boundary fields.
pub(crate) fn decode(
    sec: i32,
    nanosec: u32,
    frame_id: &str,
    child_frame_id: &str,
    translation: [f64; 3],
    rotation: [f64; 4],
) -> TransformStamped {
    TransformStamped {
        stamp: TfTime::new(sec, nanosec),
        frame_id: frame_id.to_string(),
        child_frame_id: child_frame_id.to_string(),
        transform: Transform::from_parts(translation, rotation),
    }
}

/// Flatten an engine transform into the boundary record.
///
/// The frame names are dropped: the caller supplied them and the record
/// layout has no string fields.
pub(crate) fn encode(t: &TransformStamped) -> TfTransformRecord {
    TfTransformRecord {
        sec: t.stamp.sec,
        nanosec: t.stamp.nanosec,
        translation_x: t.transform.translation[0],
        translation_y: t.transform.translation[1],
        translation_z: t.transform.translation[2],
        rotation_x: t.transform.rotation[0],
        rotation_y: t.transform.rotation[1],
        rotation_z: t.transform.rotation[2],
        rotation_w: t.transform.rotation[3],
    }
}
