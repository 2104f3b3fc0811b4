//! Summary and tooltip helpers for the spectator stream.

use serde::{Deserialize, Serialize};

/// A short notification shown over an agent in the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    /// Agent the tooltip belongs to.
    pub agent: usize,
    /// Text to show.
    pub text: String,
    /// Success tooltips render green, failures red.
    pub success: bool,
}

/// Wrap `text` in the viewer's colour tags.
#[must_use]
pub fn color_text(text: &str, success: bool) -> String {
    let color = if success { "GREEN" } else { "RED" };
    format!("¤{color}¤{text}§{color}§")
}

/// Tooltips for one frame, deduplicated by agent and text in first-seen
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TooltipSet {
    items: Vec<Tooltip>,
}

impl TooltipSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tooltip unless the same agent already has the same text.
    pub fn insert(&mut self, tooltip: Tooltip) {
        let duplicate = self
            .items
            .iter()
            .any(|t| t.agent == tooltip.agent && t.text == tooltip.text);
        if !duplicate {
            self.items.push(tooltip);
        }
    }

    /// Number of distinct tooltips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Spectator lines: text then agent, per tooltip.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.items.len() * 2);
        for tooltip in &self.items {
            lines.push(color_text(&tooltip.text, tooltip.success));
            lines.push(tooltip.agent.to_string());
        }
        lines
    }
}

impl Extend<Tooltip> for TooltipSet {
    fn extend<I: IntoIterator<Item = Tooltip>>(&mut self, iter: I) {
        for tooltip in iter {
            self.insert(tooltip);
        }
    }
}
