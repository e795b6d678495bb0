use std::collections::BTreeSet;

use posekit_scene::SceneGraph;
use tracing::debug;

use crate::pose::AnimationFrameTable;

/// What one call to [`apply_frame`] touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub frame: usize,
    /// Bones written, in scene traversal order
    pub written: Vec<String>,
    /// Joint names in the frame with no matching bone in the scene
    pub skipped: Vec<String>,
}

/// Write `frames[frame_index]` onto the scene's skeleton.
///
/// Every bone whose name exactly matches a joint in the frame gets its
/// position and rotation overwritten, and its scale when the frame carries
/// one. Bones the frame does not mention keep whatever transform they had.
/// Joint names the model lacks are skipped. An index past the end of the
/// table writes nothing.
pub fn apply_frame(frame_index: usize, table: &AnimationFrameTable, scene: &mut SceneGraph) -> ApplyReport {
    let mut report = ApplyReport {
        frame: frame_index,
        ..Default::default()
    };
    let Some(pose) = table.frame(frame_index) else {
        debug!("Frame {} is outside a {}-frame table", frame_index, table.len());
        return report;
    };

    let mut matched = BTreeSet::new();
    scene.traverse_mut(|_, node| {
        if !node.is_bone() {
            return;
        }
        let Some(joint) = pose.get(&node.name) else {
            return;
        };
        node.transform.position = joint.position;
        node.transform.set_euler_xyz(joint.rotation);
        if let Some(scale) = joint.scale {
            node.transform.scale = scale;
        }
        matched.insert(node.name.clone());
        report.written.push(node.name.clone());
    });

    report.skipped = pose
        .keys()
        .filter(|name| !matched.contains(*name))
        .cloned()
        .collect();
    if !report.skipped.is_empty() {
        debug!("Frame {}: no bone for {:?}", frame_index, report.skipped);
    }
    report
}
