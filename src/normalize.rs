//! Paragraph normalization.
//!
//! Two phases over the top-level body paragraphs, each computing a plan
//! against a snapshot before touching the tree:
//!
//! 1. **Prune or strip.** Empty paragraphs without runs are removed. Empty
//!    paragraphs whose runs carry page breaks lose those breaks and stay.
//! 2. **Collapse.** Runs of consecutive empty paragraphs shrink to their first
//!    paragraph.
//!
//! Paragraphs with visible text are never modified. Tables and other blocks
//! are not paragraphs: they are skipped, so blanks on either side of them still
//! count as consecutive.

use crate::docx::{Block, Body, BreakKind, Document};
use log::debug;

/// What a normalization pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Empty paragraphs without runs removed in the first phase
    pub pruned: usize,
    /// Page breaks removed from otherwise empty paragraphs
    pub breaks_stripped: usize,
    /// Repeated empty paragraphs removed in the second phase
    pub collapsed: usize,
}

impl NormalizeSummary {
    /// Whether the pass left the document as it was.
    pub fn is_noop(&self) -> bool {
        self.pruned == 0 && self.breaks_stripped == 0 && self.collapsed == 0
    }
}

/// Normalize a document's body paragraphs in place.
///
/// Running it twice gives the same result as running it once.
pub fn normalize(document: &mut Document) -> NormalizeSummary {
    normalize_body(document.body_mut())
}

/// Normalize the paragraphs of a body in place.
pub fn normalize_body(body: &mut Body) -> NormalizeSummary {
    let mut summary = NormalizeSummary::default();

    let plan = plan_prune_strip(body.blocks());
    debug!(
        "prune/strip plan: {} to remove, {} to strip",
        plan.remove.len(),
        plan.strip.len()
    );
    for &idx in &plan.strip {
        if let Some(para) = body.blocks_mut()[idx].as_paragraph_mut() {
            summary.breaks_stripped += para.remove_breaks(&BreakKind::Page);
        }
    }
    summary.pruned = body.remove_blocks(&plan.remove);

    let collapse = plan_collapse(body.blocks());
    debug!("collapse plan: {} to remove", collapse.len());
    summary.collapsed = body.remove_blocks(&collapse);

    summary
}

/// Block indices touched by the prune-or-strip phase.
#[derive(Debug, Default, PartialEq, Eq)]
struct PruneStripPlan {
    /// Empty paragraphs with no runs
    remove: Vec<usize>,
    /// Empty paragraphs carrying page breaks
    strip: Vec<usize>,
}

fn plan_prune_strip(blocks: &[Block]) -> PruneStripPlan {
    let mut plan = PruneStripPlan::default();
    for (idx, block) in blocks.iter().enumerate() {
        let Block::Paragraph(para) = block else {
            continue;
        };
        if !para.is_empty() {
            continue;
        }
        if para.run_count() == 0 {
            plan.remove.push(idx);
        } else if para.has_break(&BreakKind::Page) {
            plan.strip.push(idx);
        }
    }
    plan
}

/// Position within a sequence of paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankRunState {
    /// Last paragraph had text, or nothing was seen yet
    SeenNonBlank,
    /// Inside a run of empty paragraphs whose first one is kept
    SeenBlankRun,
}

impl BlankRunState {
    /// Advance over one paragraph; returns the next state and whether to keep it.
    fn step(self, empty: bool) -> (Self, bool) {
        match (self, empty) {
            (_, false) => (Self::SeenNonBlank, true),
            (Self::SeenNonBlank, true) => (Self::SeenBlankRun, true),
            (Self::SeenBlankRun, true) => (Self::SeenBlankRun, false),
        }
    }
}

fn plan_collapse(blocks: &[Block]) -> Vec<usize> {
    let mut state = BlankRunState::SeenNonBlank;
    let mut remove = Vec::new();

    for (idx, block) in blocks.iter().enumerate() {
        let Block::Paragraph(para) = block else {
            continue;
        };
        let (next, keep) = state.step(para.is_empty());
        if !keep {
            remove.push(idx);
        }
        state = next;
    }
    remove
}
