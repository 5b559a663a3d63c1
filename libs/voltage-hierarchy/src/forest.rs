//! Meter Forest Assembly
//!
//! Turns a flat meter snapshot into independent trees following the
//! transformer cascade:
//!
//! ```text
//! 400kV root            (SS400, always a leaf)
//! 132kV root            (SS132)
//!   └── 11kV feeder     (SS132 = root.SS132, SS011)
//!         └── 380V load (SS011 = feeder.SS011)
//! orphans               (synthetic bucket, no meter)
//!   └── every meter that could not be placed
//! ```
//!
//! Every input meter ends up in exactly one node. Assembly never fails:
//! meters that are incomplete, or whose parent code has no owner in the
//! snapshot, go to the orphan bucket with a reason.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::types::{CodeTier, Meter, VoltageLevel};

/// Id of the synthetic incomplete-hierarchy node
pub const ORPHAN_BUCKET_ID: &str = "orphans";

/// Position of a node in the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTier {
    Ss400,
    Ss132,
    Ss011,
    Root,
}

/// A node of the meter forest
///
/// Real meters carry `meter`; the orphan bucket does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter: Option<Meter>,
    pub tier: NodeTier,
    pub incomplete: bool,
    /// Why an orphan could not be placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn for_meter(meter: &Meter, tier: NodeTier) -> Self {
        Self {
            id: meter.id.clone(),
            meter: Some(meter.clone()),
            tier,
            incomplete: false,
            reason: None,
            children: Vec::new(),
        }
    }

    fn orphan(meter: &Meter, reason: String) -> Self {
        Self {
            id: meter.id.clone(),
            meter: Some(meter.clone()),
            tier: NodeTier::Root,
            incomplete: true,
            reason: Some(reason),
            children: Vec::new(),
        }
    }

    fn orphan_bucket(children: Vec<TreeNode>) -> Self {
        Self {
            id: ORPHAN_BUCKET_ID.to_string(),
            meter: None,
            tier: NodeTier::Root,
            incomplete: true,
            reason: None,
            children,
        }
    }

    pub fn is_orphan_bucket(&self) -> bool {
        self.meter.is_none() && self.id == ORPHAN_BUCKET_ID
    }

    /// Meters in this subtree, depth-first, parents before children
    pub fn meters(&self) -> Vec<&Meter> {
        let mut out = Vec::new();
        self.collect_meters(&mut out);
        out
    }

    fn collect_meters<'a>(&'a self, out: &mut Vec<&'a Meter>) {
        if let Some(meter) = &self.meter {
            out.push(meter);
        }
        for child in &self.children {
            child.collect_meters(out);
        }
    }
}

/// All meters reachable from the forest, depth-first in forest order
pub fn forest_meters(forest: &[TreeNode]) -> Vec<&Meter> {
    let mut out = Vec::new();
    for node in forest {
        node.collect_meters(&mut out);
    }
    out
}

/// Placement counts for a built forest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestSummary {
    pub roots_400: usize,
    pub roots_132: usize,
    pub feeders_11kv: usize,
    pub loads_380v: usize,
    pub orphans: usize,
    pub total: usize,
}

impl ForestSummary {
    pub fn of(forest: &[TreeNode]) -> Self {
        let mut summary = ForestSummary::default();
        for node in forest {
            match node.tier {
                NodeTier::Ss400 => summary.roots_400 += 1,
                NodeTier::Ss132 => {
                    summary.roots_132 += 1;
                    for feeder in &node.children {
                        summary.feeders_11kv += 1;
                        summary.loads_380v += feeder.children.len();
                    }
                },
                NodeTier::Root => summary.orphans += node.children.len(),
                NodeTier::Ss011 => {},
            }
        }
        summary.total = summary.roots_400
            + summary.roots_132
            + summary.feeders_11kv
            + summary.loads_380v
            + summary.orphans;
        summary
    }
}

/// Build the meter forest from a snapshot
///
/// Output order: 400kV roots, then 132kV roots, then the orphan bucket if
/// it has members. Children keep snapshot order. A meter whose parent code
/// is shared by several parents is attached once, under the first parent
/// reached while walking the 132kV roots in snapshot order.
pub fn build_forest(meters: &[Meter]) -> Vec<TreeNode> {
    let n = meters.len();
    let mut orphan_reason: Vec<Option<String>> = vec![None; n];
    let mut roots_400 = Vec::new();
    let mut roots_132 = Vec::new();
    // Index entries stay in snapshot order
    let mut feeders_by_ss132: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut loads_by_ss011: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut feeder_ss011: HashSet<&str> = HashSet::new();

    for (i, meter) in meters.iter().enumerate() {
        let classification = classify(meter);
        if !classification.is_complete {
            orphan_reason[i] = classification.missing_or_extra_reason;
            continue;
        }
        // Complete meters always have a level and its expected codes
        match (meter.voltage(), meter.code(CodeTier::Ss132), meter.code(CodeTier::Ss011)) {
            (Some(VoltageLevel::Kv400), _, _) => roots_400.push(i),
            (Some(VoltageLevel::Kv132), _, _) => roots_132.push(i),
            (Some(VoltageLevel::Kv11), Some(ss132), Some(ss011)) => {
                feeders_by_ss132.entry(ss132).or_default().push(i);
                feeder_ss011.insert(ss011);
            },
            (Some(VoltageLevel::V380), _, Some(ss011)) => {
                loads_by_ss011.entry(ss011).or_default().push(i)
            },
            _ => orphan_reason[i] = Some("unclassifiable code set".to_string()),
        }
    }

    let mut placed = vec![false; n];
    let mut forest = Vec::with_capacity(roots_400.len() + roots_132.len() + 1);

    for &i in &roots_400 {
        placed[i] = true;
        forest.push(TreeNode::for_meter(&meters[i], NodeTier::Ss400));
    }

    for &i in &roots_132 {
        placed[i] = true;
        let mut root = TreeNode::for_meter(&meters[i], NodeTier::Ss132);

        let feeders = meters[i]
            .code(CodeTier::Ss132)
            .and_then(|code| feeders_by_ss132.get(code));
        for &f in feeders.into_iter().flatten() {
            if placed[f] {
                continue;
            }
            placed[f] = true;
            let mut feeder = TreeNode::for_meter(&meters[f], NodeTier::Ss011);

            let loads = meters[f]
                .code(CodeTier::Ss011)
                .and_then(|code| loads_by_ss011.get(code));
            for &l in loads.into_iter().flatten() {
                if placed[l] {
                    continue;
                }
                placed[l] = true;
                feeder
                    .children
                    .push(TreeNode::for_meter(&meters[l], NodeTier::Ss011));
            }

            root.children.push(feeder);
        }

        forest.push(root);
    }

    let mut orphans = Vec::new();
    let mut dangling = 0usize;
    for (i, meter) in meters.iter().enumerate() {
        if placed[i] {
            continue;
        }
        let reason = match orphan_reason[i].take() {
            Some(reason) => reason,
            None => {
                dangling += 1;
                dangling_reason(meter, &feeder_ss011)
            },
        };
        debug!("Meter {} not placed: {}", meter.id, reason);
        orphans.push(TreeNode::orphan(meter, reason));
    }

    if dangling > 0 {
        warn!(
            "{} meter(s) reference a parent code with no placed owner",
            dangling
        );
    }

    if !orphans.is_empty() {
        forest.push(TreeNode::orphan_bucket(orphans));
    }

    let summary = ForestSummary::of(&forest);
    debug!(
        "Built meter forest: {} meters, {} 400kV roots, {} 132kV roots, {} orphans",
        summary.total, summary.roots_400, summary.roots_132, summary.orphans
    );

    forest
}

/// Reason for a complete meter that found no parent
fn dangling_reason(meter: &Meter, feeder_ss011: &HashSet<&str>) -> String {
    match meter.voltage() {
        Some(VoltageLevel::Kv11) => format!(
            "parent SS132 code '{}' not found",
            meter.code(CodeTier::Ss132).unwrap_or_default()
        ),
        Some(VoltageLevel::V380) => {
            let code = meter.code(CodeTier::Ss011).unwrap_or_default();
            if feeder_ss011.contains(code) {
                format!("parent SS011 code '{}' belongs to an unattached 11kV meter", code)
            } else {
                format!("parent SS011 code '{}' not found", code)
            }
        },
        _ => "parent not found".to_string(),
    }
}
