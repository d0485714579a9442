use std::collections::{HashMap, HashSet};

use crate::readutil::Fragment;

/// Pairs up paired-end reads so each template is called once.
///
/// A read waits in `buffered` until its mate arrives. Names in
/// `pending_indel` belong to templates whose first mate was rejected for an
/// indel; the surviving mate is dispatched alone on arrival.
#[derive(Debug, Default)]
pub struct MateResolver {
    buffered: HashMap<String, Fragment>,
    pending_indel: HashSet<String>,
}

impl MateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mate rejected for an indel. Returns the buffered mate, if
    /// any, which must now be called on its own.
    pub fn reject_indel(&mut self, qname: &str) -> Option<Fragment> {
        if let Some(mate) = self.buffered.remove(qname) {
            return Some(mate);
        }
        // Both mates carry indels: nothing left to wait for.
        if !self.pending_indel.remove(qname) {
            self.pending_indel.insert(qname.to_string());
        }
        None
    }

    /// Feeds one normalized mate and returns the fragments ready for calling.
    pub fn accept(&mut self, fragment: Fragment, mate_unmapped: bool) -> Vec<Fragment> {
        if self.pending_indel.remove(&fragment.qname) || mate_unmapped {
            return vec![fragment];
        }

        match self.buffered.remove(&fragment.qname) {
            Some(first) => resolve_pair(first, fragment),
            None => {
                self.buffered.insert(fragment.qname.clone(), fragment);
                Vec::new()
            }
        }
    }

    /// Mates still waiting for their partner. These are dropped when the scan ends.
    pub fn num_buffered(&self) -> usize {
        self.buffered.len()
    }

    pub fn num_pending_indel(&self) -> usize {
        self.pending_indel.len()
    }
}

/// Resolves a complete pair. Mates on different references or without
/// overlap are returned as they are; a mate contained in the other is
/// dropped; otherwise the pair is merged into one fragment spanning both.
pub fn resolve_pair(first: Fragment, second: Fragment) -> Vec<Fragment> {
    let overlap = first.end().min(second.end()) as i64 - first.pos.max(second.pos) as i64;
    if first.tid != second.tid || overlap <= 0 {
        return vec![first, second];
    }

    let overlap = overlap as usize;
    if overlap == first.len() {
        return vec![second];
    }
    if overlap == second.len() {
        return vec![first];
    }

    let (mut earlier, later) = if first.pos <= second.pos {
        (first, second)
    } else {
        (second, first)
    };
    earlier.seq.extend_from_slice(&later.seq[overlap..]);
    vec![earlier]
}
