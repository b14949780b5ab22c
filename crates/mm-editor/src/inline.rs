//! Inline label editor.
//!
//! While open, the editor floats over one node's screen rectangle and holds
//! the text being typed. The map only changes when the edit is committed.

use mm_core::id::NodeId;
use mm_render::surface::Rect;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InlineEditor {
    #[default]
    Closed,
    Editing {
        node: NodeId,
        /// Screen rectangle the input box covers.
        rect: Rect,
        buffer: String,
    },
}

impl InlineEditor {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Start editing `node`, seeding the buffer with its current label.
    /// Opening while already open retargets the editor.
    pub fn open(&mut self, node: NodeId, rect: Rect, content: &str) {
        *self = Self::Editing {
            node,
            rect,
            buffer: content.to_string(),
        };
    }

    /// Replace the typed text. Ignored when closed.
    pub fn set_buffer(&mut self, text: &str) {
        if let Self::Editing { buffer, .. } = self {
            buffer.clear();
            buffer.push_str(text);
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Editing { buffer, .. } => Some(buffer),
            Self::Closed => None,
        }
    }

    /// Close the editor and hand back what should be written.
    pub fn commit(&mut self) -> Option<(NodeId, String)> {
        match std::mem::take(self) {
            Self::Editing { node, buffer, .. } => Some((node, buffer)),
            Self::Closed => None,
        }
    }

    /// Close without writing.
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_type_commit() {
        let node = NodeId::intern("inline-a");
        let mut editor = InlineEditor::default();
        assert!(!editor.is_editing());

        editor.open(node, Rect::new(10.0, 20.0, 100.0, 30.0), "New Node");
        assert_eq!(editor.buffer(), Some("New Node"));
        editor.set_buffer("Plans");
        assert_eq!(editor.commit(), Some((node, "Plans".to_string())));
        assert_eq!(editor, InlineEditor::Closed);
    }

    #[test]
    fn cancel_discards() {
        let mut editor = InlineEditor::default();
        editor.open(NodeId::intern("inline-b"), Rect::default(), "x");
        editor.cancel();
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn typing_while_closed_is_ignored() {
        let mut editor = InlineEditor::default();
        editor.set_buffer("lost");
        assert_eq!(editor.buffer(), None);
    }
}
