//! Terminal rendering of meter forests

use colored::Colorize;
use voltage_hierarchy::{ForestSummary, NodeTier, TreeNode};

fn tier_label(tier: NodeTier) -> &'static str {
    match tier {
        NodeTier::Ss400 => "SS400",
        NodeTier::Ss132 => "SS132",
        NodeTier::Ss011 => "SS011",
        NodeTier::Root => "ROOT",
    }
}

fn node_line(node: &TreeNode) -> String {
    if node.is_orphan_bucket() {
        return format!(
            "{} ({} meters)",
            "Incomplete hierarchy".red().bold(),
            node.children.len()
        );
    }

    let Some(meter) = &node.meter else {
        return node.id.clone();
    };

    let mut line = format!(
        "{} {} {} [{}]",
        node.id.bright_yellow(),
        meter.meter_code,
        meter.voltage_level.bright_cyan(),
        tier_label(node.tier)
    );
    if let Some(reason) = &node.reason {
        line.push_str(&format!(" - {}", reason.red()));
    }
    line
}

fn render_node(node: &TreeNode, prefix: &str, last: bool, out: &mut Vec<String>) {
    let branch = if last { "└── " } else { "├── " };
    out.push(format!("{}{}{}", prefix, branch, node_line(node)));

    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == count, out);
    }
}

/// Render a forest as indented lines, one top-level tree after another
pub fn render_forest(forest: &[TreeNode]) -> Vec<String> {
    let mut out = Vec::new();
    for root in forest {
        out.push(node_line(root));
        let count = root.children.len();
        for (i, child) in root.children.iter().enumerate() {
            render_node(child, "", i + 1 == count, &mut out);
        }
    }
    out
}

pub fn render_summary(summary: &ForestSummary) -> String {
    format!(
        "{} meters: {} x 400kV, {} x 132kV, {} x 11kV, {} x 380V, {} incomplete",
        summary.total,
        summary.roots_400,
        summary.roots_132,
        summary.feeders_11kv,
        summary.loads_380v,
        summary.orphans
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltage_hierarchy::{build_forest, CodeTier, Meter};

    #[test]
    fn test_render_cascade_and_orphans() {
        colored::control::set_override(false);

        let meters = vec![
            Meter::new("M1", "PQMS_132KV.APA0001", "132kV").with_code(CodeTier::Ss132, "APA132"),
            Meter::new("M2", "PQMS_11KV.APA0042_H3", "11kV")
                .with_code(CodeTier::Ss132, "APA132")
                .with_code(CodeTier::Ss011, "APA011"),
            Meter::new("M3", "PQMS_380V.APA0107", "380V").with_code(CodeTier::Ss011, "APA011"),
            Meter::new("M4", "PQMS_11KV.APA0004", "11kV").with_code(CodeTier::Ss132, "APA132"),
        ];
        let lines = render_forest(&build_forest(&meters));

        assert_eq!(
            lines,
            vec![
                "M1 PQMS_132KV.APA0001 132kV [SS132]",
                "└── M2 PQMS_11KV.APA0042_H3 11kV [SS011]",
                "    └── M3 PQMS_380V.APA0107 380V [SS011]",
                "Incomplete hierarchy (1 meters)",
                "└── M4 PQMS_11KV.APA0004 11kV [ROOT] - missing SS011 code",
            ]
        );
    }

    #[test]
    fn test_render_summary() {
        let summary = ForestSummary {
            roots_400: 1,
            roots_132: 2,
            feeders_11kv: 3,
            loads_380v: 4,
            orphans: 5,
            total: 15,
        };
        assert_eq!(
            render_summary(&summary),
            "15 meters: 1 x 400kV, 2 x 132kV, 3 x 11kV, 4 x 380V, 5 incomplete"
        );
    }
}
