//! Transform buffer core
//!
//! Stores the frame tree and answers transform lookups between any two
//! frames. Each edge connects a child frame to its parent and carries either
//! a single static transform or a [`TimeCache`] of timestamped samples.

use std::collections::{HashMap, HashSet};

use crate::cache::{TimeCache, DEFAULT_CACHE_CAPACITY};
use crate::error::{TfError, TfResult};
use crate::time::TfTime;
use crate::transform::Transform;

/// Maximum parent-chain length walked during a lookup.
///
/// A chain longer than this means the tree contains a loop (re-parenting can
/// introduce one, insertion does not reject it).
const MAX_TREE_DEPTH: usize = 1000;

/// A transform between two named frames at a point in time.
///
/// `transform` maps points in `child_frame_id` coordinates into `frame_id`
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStamped {
    pub stamp: TfTime,
    /// Parent (target) frame
    pub frame_id: String,
    /// Child (source) frame
    pub child_frame_id: String,
    pub transform: Transform,
}

/// One edge of the frame tree, keyed by its child frame.
#[derive(Debug, Clone)]
enum Edge {
    Static {
        parent: String,
        transform: Transform,
    },
    Dynamic {
        parent: String,
        cache: TimeCache,
    },
}

impl Edge {
    fn parent(&self) -> &str {
        match self {
            Edge::Static { parent, .. } => parent,
            Edge::Dynamic { parent, .. } => parent,
        }
    }
}

/// The transform buffer engine.
///
/// Holds every frame seen so far and the parent edge of each child frame.
/// Frames connect into one or more trees; lookups compose the transform
/// chain through the closest common ancestor.
#[derive(Debug, Clone)]
pub struct BufferCore {
    /// Parent edge of each child frame
    edges: HashMap<String, Edge>,
    /// Every frame name ever seen, as child or parent
    known_frames: HashSet<String>,
    /// Sample capacity for new dynamic edges
    cache_capacity: usize,
}

impl Default for BufferCore {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferCore {
    /// Create an empty buffer with the default per-edge sample capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create an empty buffer keeping at most `cache_capacity` samples per
    /// dynamic edge.
    pub fn with_capacity(cache_capacity: usize) -> Self {
        Self {
            edges: HashMap::new(),
            known_frames: HashSet::new(),
            cache_capacity,
        }
    }

    /// Insert a transform into the buffer.
    ///
    /// Returns whether the transform was accepted. Rejections (empty or
    /// self-referential frame ids, non-finite values) are logged with the
    /// `authority` tag and return `false` instead of erroring.
    ///
    /// A static transform is treated as valid at any time; inserting one
    /// replaces the edge's history. A dynamic transform is appended to the
    /// edge's sample cache. Either kind re-parents `child_frame_id` under
    /// `frame_id`.
    pub fn set_transform(
        &mut self,
        t: &TransformStamped,
        authority: &str,
        is_static: bool,
    ) -> bool {
        if t.frame_id.is_empty() || t.child_frame_id.is_empty() {
            log::warn!(
                "transform from authority '{}' rejected: empty frame id \
                 (frame_id='{}', child_frame_id='{}')",
                authority,
                t.frame_id,
                t.child_frame_id
            );
            return false;
        }
        if t.frame_id == t.child_frame_id {
            log::warn!(
                "transform from authority '{}' rejected: frame '{}' is its own parent",
                authority,
                t.frame_id
            );
            return false;
        }
        if !t.transform.is_finite() {
            log::warn!(
                "transform from authority '{}' for frame '{}' rejected: \
                 non-finite translation or rotation",
                authority,
                t.child_frame_id
            );
            return false;
        }

        if is_static {
            self.edges.insert(
                t.child_frame_id.clone(),
                Edge::Static {
                    parent: t.frame_id.clone(),
                    transform: t.transform,
                },
            );
        } else {
            match self.edges.get_mut(&t.child_frame_id) {
                Some(Edge::Dynamic { parent, cache }) => {
                    *parent = t.frame_id.clone();
                    cache.insert(t.stamp.as_nanos(), t.transform);
                }
                _ => {
                    let mut cache = TimeCache::new(self.cache_capacity);
                    cache.insert(t.stamp.as_nanos(), t.transform);
                    self.edges.insert(
                        t.child_frame_id.clone(),
                        Edge::Dynamic {
                            parent: t.frame_id.clone(),
                            cache,
                        },
                    );
                }
            }
        }

        self.known_frames.insert(t.frame_id.clone());
        self.known_frames.insert(t.child_frame_id.clone());
        true
    }

    /// Look up the transform that maps `source_frame` coordinates into
    /// `target_frame` coordinates at `time`.
    ///
    /// The zero time is a sentinel meaning "latest available": the chain is
    /// evaluated at the newest stamp every dynamic edge on it can answer.
    pub fn lookup_transform(
        &self,
        target_frame: &str,
        source_frame: &str,
        time: TfTime,
    ) -> TfResult<TransformStamped> {
        if target_frame.is_empty() || source_frame.is_empty() {
            return Err(TfError::InvalidArgument(
                "empty frame id passed to lookup_transform".to_string(),
            ));
        }

        if target_frame == source_frame {
            return Ok(TransformStamped {
                stamp: time,
                frame_id: target_frame.to_string(),
                child_frame_id: source_frame.to_string(),
                transform: Transform::identity(),
            });
        }

        for frame in [target_frame, source_frame] {
            if !self.known_frames.contains(frame) {
                return Err(TfError::Lookup(format!(
                    "frame '{}' passed to lookup_transform does not exist",
                    frame
                )));
            }
        }

        let source_path = self.chain_to_root(source_frame)?;
        let target_path = self.chain_to_root(target_frame)?;

        // Closest common ancestor of the two chains
        let (source_edges, target_edges) = source_path
            .iter()
            .enumerate()
            .find_map(|(i, frame)| {
                target_path
                    .iter()
                    .position(|f| f == frame)
                    .map(|j| (&source_path[..i], &target_path[..j]))
            })
            .ok_or_else(|| {
                TfError::Connectivity(format!(
                    "could not find a connection between '{}' and '{}' because \
                     they are not part of the same transform tree",
                    target_frame, source_frame
                ))
            })?;

        let (nanos, stamp) = self.resolve_time(time, source_edges, target_edges)?;

        let mut source_acc = Transform::identity();
        for frame in source_edges {
            source_acc = self.edge_transform(frame, nanos)?.compose(&source_acc);
        }
        let mut target_acc = Transform::identity();
        for frame in target_edges {
            target_acc = self.edge_transform(frame, nanos)?.compose(&target_acc);
        }

        Ok(TransformStamped {
            stamp,
            frame_id: target_frame.to_string(),
            child_frame_id: source_frame.to_string(),
            transform: target_acc.inverse().compose(&source_acc),
        })
    }

    /// Whether a transform between the two frames is available at `time`.
    pub fn can_transform(&self, target_frame: &str, source_frame: &str, time: TfTime) -> bool {
        self.lookup_transform(target_frame, source_frame, time).is_ok()
    }

    /// Whether the frame has been seen, as a child or as a parent.
    pub fn frame_exists(&self, frame: &str) -> bool {
        self.known_frames.contains(frame)
    }

    /// Number of known frames.
    pub fn frame_count(&self) -> usize {
        self.known_frames.len()
    }

    /// One line per edge, describing the tree for diagnostics.
    pub fn all_frames_as_string(&self) -> String {
        let mut children: Vec<&String> = self.edges.keys().collect();
        children.sort();
        let mut out = String::new();
        for child in children {
            out.push_str(&format!(
                "frame '{}' exists with parent '{}'.\n",
                child,
                self.edges[child].parent()
            ));
        }
        out
    }

    /// Drop all frames and transforms.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.known_frames.clear();
    }

    /// Walk parent links from `frame` to its root, inclusive.
    fn chain_to_root<'a>(&'a self, frame: &'a str) -> TfResult<Vec<&'a str>> {
        let mut path = vec![frame];
        let mut current = frame;
        while let Some(edge) = self.edges.get(current) {
            current = edge.parent();
            path.push(current);
            if path.len() > MAX_TREE_DEPTH {
                return Err(TfError::Lookup(format!(
                    "the transform tree is invalid because it contains a loop \
                     near frame '{}'",
                    frame
                )));
            }
        }
        Ok(path)
    }

    /// Pick the evaluation time for a lookup.
    ///
    /// An explicit time is used as-is. The zero sentinel resolves to the
    /// newest stamp common to every dynamic edge on the chain, which is the
    /// minimum of their newest stamps; an all-static chain keeps the zero
    /// stamp.
    fn resolve_time(
        &self,
        time: TfTime,
        source_edges: &[&str],
        target_edges: &[&str],
    ) -> TfResult<(i64, TfTime)> {
        if !time.is_zero() {
            return Ok((time.as_nanos(), time));
        }

        let mut latest: Option<i64> = None;
        for frame in source_edges.iter().chain(target_edges.iter()) {
            if let Some(Edge::Dynamic { cache, .. }) = self.edges.get(*frame) {
                let newest = cache.newest_stamp().ok_or_else(|| {
                    TfError::Extrapolation(format!(
                        "no transform data available for frame '{}'",
                        frame
                    ))
                })?;
                latest = Some(match latest {
                    None => newest,
                    Some(l) => l.min(newest),
                });
            }
        }

        let nanos = latest.unwrap_or(0);
        Ok((nanos, TfTime::from_nanos(nanos)))
    }

    /// Transform of the edge above `frame`, evaluated at `nanos`.
    fn edge_transform(&self, frame: &str, nanos: i64) -> TfResult<Transform> {
        match self.edges.get(frame) {
            Some(Edge::Static { transform, .. }) => Ok(*transform),
            Some(Edge::Dynamic { cache, .. }) => cache.lookup(nanos),
            None => Err(TfError::Lookup(format!(
                "frame '{}' passed to lookup_transform does not exist",
                frame
            ))),
        }
    }
}
