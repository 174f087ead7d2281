//! Region → violence category flow graph.

use conflict_map_data_models::{FlowEdge, FlowGraph, FlowNode, FlowNodeKind, RawRow, ViolenceType};

/// Builds the flow graph for `year`.
///
/// Region nodes come first, in the order their first row appears; category
/// nodes follow in ascending id order, limited to the categories present.
/// Identical input always gives identical node order. Each usable row
/// becomes one edge carrying its event count; duplicate (region, category)
/// pairs are not merged. Rows without a region or a valid category, and
/// rows whose count is negative or non-finite, produce neither an edge nor
/// a node.
#[must_use]
pub fn flow_graph(rows: &[RawRow], year: i32) -> FlowGraph {
    let mut regions: Vec<&str> = Vec::new();
    let mut present = [false; ViolenceType::ALL.len()];
    let mut links: Vec<(usize, ViolenceType, f64)> = Vec::new();

    for row in rows.iter().filter(|row| row.year == year) {
        let Some(region) = row.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) else {
            continue;
        };
        let Some(category) = row.category() else {
            continue;
        };
        if !row.events.is_finite() || row.events < 0.0 {
            log::trace!("Dropping {region} -> {category} edge with value {}", row.events);
            continue;
        }

        let source = regions.iter().position(|r| *r == region).unwrap_or_else(|| {
            regions.push(region);
            regions.len() - 1
        });
        present[usize::from(category.id() - 1)] = true;
        links.push((source, category, row.events));
    }

    let categories: Vec<ViolenceType> = ViolenceType::ALL
        .into_iter()
        .filter(|category| present[usize::from(category.id() - 1)])
        .collect();

    let mut nodes: Vec<FlowNode> = regions
        .iter()
        .map(|region| FlowNode {
            name: (*region).to_owned(),
            kind: FlowNodeKind::Region,
        })
        .collect();
    nodes.extend(categories.iter().map(|&category| FlowNode {
        name: category.label().to_owned(),
        kind: FlowNodeKind::Category(category),
    }));

    let edges = links
        .into_iter()
        .filter_map(|(source, category, value)| {
            let offset = categories.iter().position(|&c| c == category)?;
            Some(FlowEdge {
                source,
                target: regions.len() + offset,
                value,
                category,
            })
        })
        .collect();

    let graph = FlowGraph { nodes, edges };
    log::debug!(
        "Flow {year}: {} nodes, {} edges, {} events",
        graph.nodes.len(),
        graph.edges.len(),
        graph.total()
    );
    graph
}
