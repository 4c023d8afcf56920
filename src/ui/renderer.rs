use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::traits::{InteractiveNode, RenderContext};

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

/// Rows a node occupied in the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRows {
    pub start: u16,
    pub height: u16,
}

impl NodeRows {
    pub fn contains(&self, row: u16) -> bool {
        row >= self.start && (row as u32) < self.start as u32 + self.height as u32
    }
}

pub struct RenderView<'a> {
    pub title: &'a str,
    pub hint: Option<&'a str>,
    pub nodes: &'a [Box<dyn InteractiveNode>],
    pub focused: Option<usize>,
    pub footer: Vec<SpanLine>,
}

pub struct Renderer;

impl Renderer {
    pub fn render(view: &RenderView<'_>, terminal_size: TerminalSize) -> (RenderFrame, Vec<NodeRows>) {
        let mut frame = RenderFrame::default();
        let focused_id = view
            .focused
            .and_then(|idx| view.nodes.get(idx))
            .map(|node| node.id().to_string());
        let ctx = RenderContext {
            focused_id,
            terminal_size,
            origin_row: 0,
        };
        let mut row_offset: u16 = 0;

        frame
            .lines
            .push(vec![Span::styled(view.title, Style::new().color(Color::Cyan))]);
        row_offset = row_offset.saturating_add(1);
        if let Some(hint) = view.hint {
            frame.lines.push(vec![Span::styled(
                format!("Hint: {}", hint),
                Style::new().color(Color::Yellow),
            )]);
            row_offset = row_offset.saturating_add(1);
        }
        frame.lines.push(Vec::new());
        row_offset = row_offset.saturating_add(1);

        let mut rows = Vec::with_capacity(view.nodes.len());
        for (idx, node) in view.nodes.iter().enumerate() {
            let out = node.draw(&ctx.at_row(row_offset));
            let height = u16::try_from(out.lines.len()).unwrap_or(u16::MAX);

            if view.focused == Some(idx) {
                if let Some(local) = node.cursor_pos() {
                    frame.cursor = Some(CursorPos {
                        col: local.col,
                        row: row_offset.saturating_add(local.row),
                    });
                }
            }

            rows.push(NodeRows {
                start: row_offset,
                height,
            });
            row_offset = row_offset.saturating_add(height);
            frame.lines.extend(out.lines);
        }

        if !view.footer.is_empty() {
            frame.lines.push(Vec::new());
            frame.lines.extend(view.footer.iter().cloned());
        }

        (frame, rows)
    }
}
