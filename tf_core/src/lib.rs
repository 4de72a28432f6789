//! # tf_core
//!
//! Transform buffer engine: stores timestamped coordinate-frame transforms
//! and answers "what is the transform between frame A and frame B at time T"
//! queries.
//!
//! The buffer is a tree of frames connected by parent/child edges. Each edge
//! carries either a single static transform or a bounded history of
//! timestamped samples that are interpolated at lookup time.
//!
//! # Example
//!
//! ```rust
//! use tf_core::{BufferCore, Transform, TransformStamped, TfTime};
//!
//! let mut buffer = BufferCore::new();
//!
//! buffer.set_transform(
//!     &TransformStamped {
//!         stamp: TfTime::new(10, 0),
//!         frame_id: "world".into(),
//!         child_frame_id: "base_link".into(),
//!         transform: Transform::from_translation([1.0, 0.0, 0.0]),
//!     },
//!     "example",
//!     false,
//! );
//!
//! let tf = buffer
//!     .lookup_transform("world", "base_link", TfTime::new(10, 0))
//!     .unwrap();
//! assert_eq!(tf.transform.translation[0], 1.0);
//! ```

pub mod buffer;
pub mod cache;
pub mod error;
pub mod time;
pub mod transform;

// Re-export commonly used types for easy access
pub use buffer::{BufferCore, TransformStamped};
pub use cache::TimeCache;
pub use error::{TfError, TfResult};
pub use time::TfTime;
pub use transform::Transform;
