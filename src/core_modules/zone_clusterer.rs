// THEORY:
// The `zone_clusterer` is the engine of the spatial grouping layer. It takes
// the ordered catalog and produces WatchZones: per-directory connected
// components of the rectangle "linked" relation.
//
// Key architectural principles:
// 1.  **Directory Isolation**: Clustering runs independently per source
//     subdirectory. Masks from different directories never share a zone, even
//     with numerically identical rectangles.
// 2.  **Explicit Transitive Closure**: The linked relation (overlap or within
//     the proximity tolerance) is symmetric but not transitive; the zones we
//     want are its transitive closure. A union-find structure over the
//     directory's rectangles makes that closure explicit and testable instead
//     of an emergent property of nested loops. Four corner fragments of one
//     logical region chain together into a single zone even when opposite
//     corners are nowhere near each other.
// 3.  **Aggregation Like a Blob**: A zone's enclosing rectangle is the
//     running union of its members' bounds — corner extents only, the same
//     aggregation a grown blob applies to its chunks.
// 4.  **Stable Emission Order**: Directories appear in catalog order, zones
//     within a directory in order of their first member, members within a
//     zone in catalog order. Repeated runs over unchanged input emit
//     byte-identical sequences.

use crate::core_modules::mask::MaskImage;
use crate::core_modules::run_context::{ProcessingEvent, RunContext};
use crate::core_modules::watch_zone::WatchZone;
use crate::error::{ArchitectError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Union-find over the rectangles of one directory.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            // Path halving keeps the trees shallow.
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            // Attach the later root under the earlier one so component
            // representatives stay stable in traversal order.
            let (keep, merge) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[merge] = keep;
        }
    }
}

/// Groups catalog entries into WatchZones. `masks` must be in catalog
/// traversal order; the output order is derived from it.
pub fn cluster(
    masks: &[MaskImage],
    proximity_tolerance: u32,
    ctx: &mut RunContext,
) -> Result<Vec<WatchZone>> {
    // Partition indices by directory, keeping first-encounter order.
    let mut directory_order: Vec<PathBuf> = Vec::new();
    let mut members_by_directory: HashMap<PathBuf, Vec<usize>> = HashMap::new();

    for (index, mask) in masks.iter().enumerate() {
        let members = members_by_directory
            .entry(mask.directory.clone())
            .or_insert_with(|| {
                directory_order.push(mask.directory.clone());
                Vec::new()
            });
        members.push(index);
    }

    let mut zones = Vec::new();
    for directory in directory_order {
        let members = &members_by_directory[&directory];
        let directory_zones =
            cluster_directory(masks, &directory, members, proximity_tolerance)?;

        for zone in &directory_zones {
            ctx.record(ProcessingEvent::ZoneCreated {
                directory: zone.directory.clone(),
                cluster_index: zone.cluster_index,
                member_count: zone.member_names.len(),
                bounds: zone.bounds,
            });
        }
        zones.extend(directory_zones);
    }

    Ok(zones)
}

/// Connected components over one directory's rectangles.
fn cluster_directory(
    masks: &[MaskImage],
    directory: &Path,
    members: &[usize],
    proximity_tolerance: u32,
) -> Result<Vec<WatchZone>> {
    if members.is_empty() {
        return Err(ArchitectError::EmptyDirectory {
            directory: directory.to_path_buf(),
        });
    }

    let mut set = DisjointSet::new(members.len());
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            let a = &masks[members[i]].bounds;
            let b = &masks[members[j]].bounds;
            if a.is_linked(b, proximity_tolerance) {
                set.union(i, j);
            }
        }
    }

    // Collect components keyed by root, zones ordered by first member.
    let mut component_order: Vec<usize> = Vec::new();
    let mut component_members: HashMap<usize, Vec<usize>> = HashMap::new();
    for local in 0..members.len() {
        let root = set.find(local);
        component_members
            .entry(root)
            .or_insert_with(|| {
                component_order.push(root);
                Vec::new()
            })
            .push(members[local]);
    }

    let mut zones = Vec::with_capacity(component_order.len());
    for (cluster_index, root) in component_order.into_iter().enumerate() {
        let component = &component_members[&root];

        let mut bounds = masks[component[0]].bounds;
        for &index in &component[1..] {
            bounds = bounds.union(&masks[index].bounds);
        }

        zones.push(WatchZone {
            directory: directory.to_path_buf(),
            cluster_index: cluster_index as u32,
            bounds,
            member_names: component.iter().map(|&i| masks[i].name.clone()).collect(),
            comparison_metric: None,
        });
    }

    Ok(zones)
}
