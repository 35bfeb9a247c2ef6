use super::bulge::BulgeClassifier;
use super::config::SheetConfig;
use super::error::AssignError;
use super::hbonds::BackboneIndex;
use super::ladder::{self, BetaLadder, LadderKind, ladder_sse_type};
use crate::core::models::sse::{Sse, SseType};
use itertools::Itertools;
use slotmap::{SlotMap, new_key_type};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

new_key_type! {
    /// Identifies a strand vertex of a [`SheetGraph`].
    pub struct StrandId;
}

/// One strand of the sheet graph.
///
/// Ladders in `up` and `down` are stored so that their strand 0 lies on this
/// strand.
#[derive(Debug, Clone)]
pub struct StrandNode {
    pub sse: Sse,
    pub sheet_id: usize,
    /// Whether residues with even sequence numbers face the `up` neighbours.
    pub even_up: bool,
    pub up: Vec<(StrandId, BetaLadder)>,
    pub down: Vec<(StrandId, BetaLadder)>,
}

impl StrandNode {
    fn new(sse: Sse, sheet_id: usize, even_up: bool) -> Self {
        Self {
            sse,
            sheet_id,
            even_up,
            up: Vec::new(),
            down: Vec::new(),
        }
    }

    pub fn ladders(&self) -> impl Iterator<Item = &BetaLadder> {
        self.up.iter().chain(self.down.iter()).map(|(_, ladder)| ladder)
    }

    pub fn neighbours(&self) -> impl Iterator<Item = StrandId> + '_ {
        self.up.iter().chain(self.down.iter()).map(|(id, _)| *id)
    }
}

/// Graph of beta-strands connected by ladders.
///
/// Each added ladder contributes two strands in a fresh sheet. A new strand is
/// merged into any earlier strand it overlaps in Z or forms a bulge with, which
/// joins their sheets. Strands are kept in a slot map so merging can remove
/// vertices without invalidating the ids held by their neighbours.
pub struct SheetGraph<'a> {
    backbone: &'a BackboneIndex<'a>,
    bulges: BulgeClassifier<'a>,
    min_z_overlap: isize,
    strands_by_alpha: bool,
    nodes: SlotMap<StrandId, StrandNode>,
    vertices: Vec<StrandId>,
    sheet_count: usize,
}

impl<'a> SheetGraph<'a> {
    pub fn new(backbone: &'a BackboneIndex<'a>, config: &SheetConfig) -> Self {
        Self {
            backbone,
            bulges: BulgeClassifier::new(backbone, config),
            min_z_overlap: config.min_z_overlap(),
            strands_by_alpha: config.strands_by_alpha,
            nodes: SlotMap::with_key(),
            vertices: Vec::new(),
            sheet_count: 0,
        }
    }

    /// Adds both strands of `ladder` to the graph and merges them with
    /// existing strands where possible.
    ///
    /// # Arguments
    ///
    /// * `ladder` - A validated ladder that is not a C7 self-ladder.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::InvalidLadder`] for malformed ladders and
    /// [`AssignError::Internal`] if the graph's link invariants are broken.
    pub fn add_ladder(&mut self, ladder: &BetaLadder) -> Result<(), AssignError> {
        let sse_type = ladder_sse_type(self.backbone, ladder)?;
        let span0 = ladder::strand0_span(self.backbone, ladder, self.strands_by_alpha);
        let span1 = ladder::strand1_span(self.backbone, ladder, self.strands_by_alpha);

        let sheet_id = self.sheet_count;
        self.sheet_count += 1;
        let lower = self.nodes.insert(StrandNode::new(
            Sse::new(None, &span0.chain_id, span0.start, span0.end, sse_type, None),
            sheet_id,
            span0.start % 2 == 0,
        ));
        let upper = self.nodes.insert(StrandNode::new(
            Sse::new(None, &span1.chain_id, span1.start, span1.end, sse_type, None),
            sheet_id,
            span1.start % 2 != 0,
        ));

        self.link(lower, upper, *ladder)?;
        self.add_vertex_and_possibly_merge(lower)?;
        self.add_vertex_and_possibly_merge(upper)
    }

    pub fn node(&self, id: StrandId) -> Option<&StrandNode> {
        self.nodes.get(id)
    }

    /// Surviving strands in the order they were added.
    pub fn vertices(&self) -> &[StrandId] {
        &self.vertices
    }

    fn node_ref(&self, id: StrandId) -> Result<&StrandNode, AssignError> {
        self.nodes
            .get(id)
            .ok_or_else(|| AssignError::Internal(format!("dangling strand reference {id:?}")))
    }

    fn node_mut(&mut self, id: StrandId) -> Result<&mut StrandNode, AssignError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| AssignError::Internal(format!("dangling strand reference {id:?}")))
    }

    fn link(&mut self, lower: StrandId, upper: StrandId, ladder: BetaLadder) -> Result<(), AssignError> {
        if lower == upper {
            warn!("Linking a beta-strand to itself.");
        }
        if self.node_ref(lower)?.sheet_id != self.node_ref(upper)?.sheet_id {
            return Err(AssignError::Internal(
                "linked strands belong to different sheets".to_string(),
            ));
        }
        self.node_mut(lower)?.up.push((upper, ladder));
        self.node_mut(upper)?.down.push((lower, ladder.inverted()));
        Ok(())
    }

    fn unlink(&mut self, lower: StrandId, upper: StrandId) -> Result<(), AssignError> {
        let missing = || AssignError::Internal("unlinking strands that are not linked".to_string());

        let node = self.node_mut(lower)?;
        let i = node.up.iter().position(|(id, _)| *id == upper).ok_or_else(missing)?;
        node.up.remove(i);

        let node = self.node_mut(upper)?;
        let j = node.down.iter().position(|(id, _)| *id == lower).ok_or_else(missing)?;
        node.down.remove(j);
        Ok(())
    }

    fn add_vertex_and_possibly_merge(&mut self, new: StrandId) -> Result<(), AssignError> {
        self.vertices.push(new);
        let mut i_new = self.vertices.len() - 1;
        for i in (0..i_new).rev() {
            let (existing, added) = (self.vertices[i], self.vertices[i_new]);
            if self.should_merge(existing, added)? {
                self.merge(existing, added)?;
                self.vertices.remove(i_new);
                i_new = i;
            }
        }
        Ok(())
    }

    fn should_merge(&self, a: StrandId, b: StrandId) -> Result<bool, AssignError> {
        let (a, b) = (self.node_ref(a)?, self.node_ref(b)?);
        if a.sse.chain_id != b.sse.chain_id {
            return Ok(false);
        }
        let overlap = |la: &BetaLadder, lb: &BetaLadder| {
            la.z_end0() - lb.z_start0() >= self.min_z_overlap
                && lb.z_end0() - la.z_start0() >= self.min_z_overlap
        };
        let short_side = |la: &BetaLadder, lb: &BetaLadder| self.bulges.classify(la, lb).is_some();
        let long_side = |la: &BetaLadder, lb: &BetaLadder| {
            self.bulges
                .classify(&la.inverted(), &lb.inverted())
                .is_some()
        };
        let any_pair = |test: &dyn Fn(&BetaLadder, &BetaLadder) -> bool| {
            a.ladders()
                .cartesian_product(b.ladders().collect_vec())
                .any(|(la, lb)| test(la, lb))
        };
        Ok(any_pair(&overlap) || any_pair(&short_side) || any_pair(&long_side))
    }

    /// Merges `extending` into `extended`, joining their sheets.
    fn merge(&mut self, extended: StrandId, extending: StrandId) -> Result<(), AssignError> {
        if extended == extending {
            return Err(AssignError::Internal(
                "cannot merge a beta-strand with itself".to_string(),
            ));
        }
        let target = self.node_ref(extended)?.clone();
        let source = self.node_ref(extending)?.clone();
        let start = target.sse.start.min(source.sse.start);
        let end = target.sse.end.max(source.sse.end);

        if target.sheet_id == source.sheet_id {
            if target.even_up != source.even_up {
                debug!(
                    chain = %target.sse.chain_id, start, end,
                    "Cycle with inconsistent direction in beta-strand graph."
                );
            } else {
                debug!(chain = %target.sse.chain_id, start, end, "Cycle in beta-strand graph.");
            }
        } else {
            if target.even_up != source.even_up {
                self.invert_component(extending)?;
            }
            self.set_component_sheet(extending, target.sheet_id)?;
        }

        let node = self.node_mut(extended)?;
        node.sse.start = start;
        node.sse.end = end;

        // Neighbour lists may have been swapped by the inversion above.
        let source = self.node_ref(extending)?.clone();
        for (neighbour, ladder) in source.up {
            self.unlink(extending, neighbour)?;
            self.link(extended, neighbour, ladder)?;
        }
        for (neighbour, ladder) in source.down {
            self.unlink(neighbour, extending)?;
            self.link(neighbour, extended, ladder.inverted())?;
        }
        self.nodes.remove(extending);
        trace!(chain = %target.sse.chain_id, start, end, "Merged beta-strands.");
        Ok(())
    }

    fn invert_component(&mut self, seed: StrandId) -> Result<(), AssignError> {
        for id in self.component(seed) {
            let node = self.node_mut(id)?;
            node.even_up = !node.even_up;
            std::mem::swap(&mut node.up, &mut node.down);
        }
        Ok(())
    }

    fn set_component_sheet(&mut self, seed: StrandId, sheet_id: usize) -> Result<(), AssignError> {
        for id in self.component(seed) {
            self.node_mut(id)?.sheet_id = sheet_id;
        }
        Ok(())
    }

    /// Depth-first traversal over up and down edges starting at `seed`.
    ///
    /// The visited set lives only for the duration of this call, so a
    /// traversal can be replayed any number of times.
    ///
    /// # Arguments
    ///
    /// * `seed` - The strand to start from.
    /// * `on_discover` - Called when a strand is first reached.
    /// * `on_return` - Called when all strands reachable from a strand have been explored.
    pub fn traverse(
        &self,
        seed: StrandId,
        mut on_discover: impl FnMut(StrandId),
        mut on_return: impl FnMut(StrandId),
    ) {
        if !self.nodes.contains_key(seed) {
            return;
        }
        let mut visited = HashSet::from([seed]);
        let mut stack = vec![(seed, self.neighbours_of(seed).into_iter())];
        on_discover(seed);

        while let Some((id, pending)) = stack.last_mut() {
            match pending.next() {
                Some(n) => {
                    if visited.insert(n) {
                        on_discover(n);
                        stack.push((n, self.neighbours_of(n).into_iter()));
                    }
                }
                None => {
                    let id = *id;
                    stack.pop();
                    on_return(id);
                }
            }
        }
    }

    fn neighbours_of(&self, id: StrandId) -> Vec<StrandId> {
        self.nodes
            .get(id)
            .map(|n| n.neighbours().collect())
            .unwrap_or_default()
    }

    /// All strands connected to `seed`, in discovery order.
    pub fn component(&self, seed: StrandId) -> Vec<StrandId> {
        let mut found = Vec::new();
        self.traverse(seed, |id| found.push(id), |_| {});
        found
    }

    /// One strand per connected component, ordered by chain, start and end.
    pub fn seeds(&self) -> Vec<StrandId> {
        let mut covered = HashSet::new();
        let mut seeds = Vec::new();
        for &v in &self.vertices {
            if !covered.contains(&v) {
                covered.extend(self.component(v));
                seeds.push(v);
            }
        }
        seeds.sort_by_cached_key(|&id| {
            self.nodes
                .get(id)
                .map(|n| (n.sse.chain_id.clone(), n.sse.start, n.sse.end))
        });
        seeds
    }

    /// Numbers the sheets from 1 in seed order and types every strand as a
    /// sheet strand or an isolated bridge.
    ///
    /// # Return
    ///
    /// The seeds, one per sheet, in sheet-id order.
    pub fn assign_sheet_ids(&mut self) -> Result<Vec<StrandId>, AssignError> {
        let seeds = self.seeds();
        for (index, &seed) in seeds.iter().enumerate() {
            let sheet_id = index + 1;
            for id in self.component(seed) {
                let sse_type = self.strand_type(id)?;
                let node = self.node_mut(id)?;
                node.sheet_id = sheet_id;
                node.sse.sheet_id = Some(sheet_id);
                node.sse.sse_type = sse_type;
            }
        }
        debug!(sheets = seeds.len(), strands = self.vertices.len(), "Assigned sheet ids.");
        Ok(seeds)
    }

    fn strand_type(&self, id: StrandId) -> Result<SseType, AssignError> {
        let node = self.node_ref(id)?;
        if node.sse.end - node.sse.start > 0 {
            return Ok(SseType::Sheet);
        }
        for ladder in node.ladders() {
            if ladder_sse_type(self.backbone, ladder)? == SseType::Sheet {
                return Ok(SseType::Sheet);
            }
        }
        Ok(SseType::IsolatedBridge)
    }

    /// Strand segments ordered by chain, start and end, labelled `<code><index>`.
    pub fn strands(&self) -> Vec<(StrandId, Sse)> {
        self.vertices
            .iter()
            .filter_map(|&id| self.nodes.get(id).map(|n| (id, n.sse.clone())))
            .sorted_by(|(_, x), (_, y)| x.order_key().cmp(&y.order_key()))
            .enumerate()
            .map(|(i, (id, sse))| {
                let label = format!("{}{i}", sse.sse_type);
                (id, sse.with_label(label))
            })
            .collect()
    }

    /// Sheet edges as `(lower index, higher index, +1 parallel / -1 antiparallel)`,
    /// distinct and sorted. `index_of` maps strands to their output position.
    pub fn connectivity(&self, index_of: &HashMap<StrandId, usize>) -> Vec<(usize, usize, i8)> {
        self.vertices
            .iter()
            .filter_map(|&u| Some((self.nodes.get(u)?, *index_of.get(&u)?)))
            .flat_map(|(node, iu)| {
                node.down.iter().filter_map(move |(v, ladder)| {
                    let iv = *index_of.get(v)?;
                    let kind = match ladder.kind {
                        LadderKind::Parallel => 1,
                        LadderKind::Antiparallel => -1,
                    };
                    Some((iu.min(iv), iu.max(iv), kind))
                })
            })
            .sorted()
            .dedup()
            .collect()
    }
}
