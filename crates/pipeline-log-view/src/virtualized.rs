//! Viewport-based rendering of log lines.
//!
//! Only rows intersecting the viewport (plus a small overscan) are ever
//! materialized, so the cost of a frame does not depend on how much of the
//! log has been loaded.

use std::ops::Range;

/// Scroll window over a list of fixed-height rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first visible row.
    pub scroll_offset: usize,
    /// Number of visible rows.
    pub height: usize,
    /// Extra rows materialized above and below the visible window.
    pub overscan: usize,
    /// First visible column of every row. Rows are never wrapped, so long
    /// lines are reached by panning.
    pub column_offset: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            height: 0,
            overscan: 2,
            column_offset: 0,
        }
    }
}

impl Viewport {
    pub fn new(height: usize, overscan: usize) -> Self {
        Self {
            scroll_offset: 0,
            height,
            overscan,
            column_offset: 0,
        }
    }

    pub fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.height)
    }

    /// Rows actually on screen.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let start = self.scroll_offset.min(total);
        let end = start.saturating_add(self.height).min(total);
        start..end
    }

    /// Visible rows widened by the overscan, clamped to `0..total`.
    pub fn render_range(&self, total: usize) -> Range<usize> {
        let visible = self.visible_range(total);
        let start = visible.start.saturating_sub(self.overscan);
        let end = visible.end.saturating_add(self.overscan).min(total);
        start..end
    }

    pub fn clamp(&mut self, total: usize) {
        self.scroll_offset = self.scroll_offset.min(self.max_offset(total));
    }

    pub fn scroll_by(&mut self, delta: isize, total: usize) {
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta as usize)
        };
        self.clamp(total);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, total: usize) {
        self.scroll_offset = self.max_offset(total);
    }

    /// Keeps the same lines in view after `added` lines were inserted above.
    pub fn anchor_after_prepend(&mut self, added: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(added);
    }

    /// Pans horizontally, keeping at least `visible_width` columns of the
    /// widest line (`widest` chars) in view.
    pub fn pan_by(&mut self, delta: isize, widest: usize, visible_width: usize) {
        let max_column = widest.saturating_sub(visible_width);
        self.column_offset = if delta < 0 {
            self.column_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.column_offset.saturating_add(delta as usize)
        }
        .min(max_column);
    }

    pub fn set_height(&mut self, height: usize, total: usize) {
        self.height = height;
        self.clamp(total);
    }
}

/// Inputs for the height estimate used when rows wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateParams {
    /// Average width of one character in container units.
    pub avg_char_width: f32,
    /// Width of the container in the same units.
    pub container_width: u16,
    /// Height of one rendered row.
    pub line_height: u16,
    /// Upper bound of the returned height.
    pub max_height: u32,
}

/// Estimated rendered height of `lines` when wrapped to the container width.
///
/// Each line contributes `(floor(chars * avg_char_width / width) + 1) *
/// line_height`. Summation stops as soon as `max_height` is reached.
pub fn estimated_height<S: AsRef<str>>(lines: &[S], params: EstimateParams) -> u32 {
    let width = f32::from(params.container_width.max(1));
    let line_height = u32::from(params.line_height);
    let mut total: u32 = 0;

    for line in lines {
        let chars = line.as_ref().chars().count() as f32;
        let wrapped = (chars * params.avg_char_width / width).floor() as u32 + 1;
        total = total.saturating_add(wrapped.saturating_mul(line_height));
        if total >= params.max_height {
            return params.max_height;
        }
    }

    total
}

/// One materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedRow<'a> {
    /// Index in the loaded buffer.
    pub index: usize,
    /// 1-based number shown to the user.
    pub number: usize,
    /// The line, untouched.
    pub content: &'a str,
}

impl<'a> RenderedRow<'a> {
    /// The content starting at char `column`; empty past the end.
    pub fn from_column(&self, column: usize) -> &'a str {
        match self.content.char_indices().nth(column) {
            Some((byte, _)) => &self.content[byte..],
            None => "",
        }
    }
}

/// Read-only view over loaded lines that materializes rows on demand.
#[derive(Debug, Clone, Copy)]
pub struct VirtualizedLines<'a> {
    lines: &'a [String],
}

impl<'a> VirtualizedLines<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rows in the viewport's render range.
    pub fn rows(&self, viewport: &Viewport) -> Vec<RenderedRow<'a>> {
        let range = viewport.render_range(self.lines.len());
        self.lines[range.clone()]
            .iter()
            .zip(range)
            .map(|(content, index)| RenderedRow {
                index,
                number: index + 1,
                content: content.as_str(),
            })
            .collect()
    }

    /// Length in chars of the longest loaded line.
    pub fn widest(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Digits needed for the largest line number.
    pub fn number_width(&self) -> usize {
        self.lines.len().max(1).to_string().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_visible_range() {
        let mut viewport = Viewport::new(10, 2);
        assert_eq!(viewport.visible_range(100), 0..10);
        assert_eq!(viewport.visible_range(4), 0..4);

        viewport.scroll_offset = 95;
        assert_eq!(viewport.visible_range(100), 95..100);
    }

    #[test]
    fn test_render_range_with_overscan() {
        let mut viewport = Viewport::new(10, 2);
        assert_eq!(viewport.render_range(100), 0..12);

        viewport.scroll_offset = 50;
        assert_eq!(viewport.render_range(100), 48..62);

        viewport.scroll_offset = 90;
        assert_eq!(viewport.render_range(100), 88..100);
    }

    #[test]
    fn test_empty_list() {
        let viewport = Viewport::new(10, 2);
        assert_eq!(viewport.render_range(0), 0..0);
        assert!(VirtualizedLines::new(&[]).rows(&viewport).is_empty());
    }

    #[test]
    fn test_row_count_independent_of_total() {
        let all = lines(100_000);
        let mut viewport = Viewport::new(40, 3);
        viewport.scroll_offset = 60_000;

        let rows = VirtualizedLines::new(&all).rows(&viewport);
        assert_eq!(rows.len(), 46);
        assert!(rows.len() <= viewport.height + 2 * viewport.overscan);
        assert_eq!(rows[0].index, 59_997);
    }

    #[test]
    fn test_row_numbers_are_one_based() {
        let all = lines(5);
        let rows = VirtualizedLines::new(&all).rows(&Viewport::new(3, 0));
        let numbers: Vec<_> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(rows[0].content, "line 0");
    }

    #[test]
    fn test_content_is_untouched() {
        let all = vec!["  \tindented  ".to_string(), "\x1b[31mred\x1b[0m".to_string()];
        let rows = VirtualizedLines::new(&all).rows(&Viewport::new(5, 0));
        assert_eq!(rows[0].content, "  \tindented  ");
        assert_eq!(rows[1].content, "\x1b[31mred\x1b[0m");
    }

    #[test]
    fn test_scrolling_is_clamped() {
        let mut viewport = Viewport::new(10, 0);
        viewport.scroll_by(-5, 100);
        assert_eq!(viewport.scroll_offset, 0);

        viewport.scroll_by(500, 100);
        assert_eq!(viewport.scroll_offset, 90);

        viewport.scroll_to_top();
        viewport.scroll_to_bottom(15);
        assert_eq!(viewport.scroll_offset, 5);

        viewport.set_height(20, 15);
        assert_eq!(viewport.scroll_offset, 0);
    }

    #[test]
    fn test_anchor_after_prepend() {
        let all = lines(50);
        let mut viewport = Viewport::new(10, 0);
        viewport.scroll_offset = 5;
        let before = VirtualizedLines::new(&all).rows(&viewport)[0].content.to_string();

        let mut grown = lines(20);
        grown.extend(all.iter().cloned());
        viewport.anchor_after_prepend(20);

        let after = VirtualizedLines::new(&grown).rows(&viewport)[0].content.to_string();
        assert_eq!(before, after);
    }

    #[test]
    fn test_panning_is_clamped_to_widest_line() {
        let mut viewport = Viewport::new(10, 0);
        viewport.pan_by(-4, 200, 56);
        assert_eq!(viewport.column_offset, 0);

        viewport.pan_by(100, 200, 56);
        assert_eq!(viewport.column_offset, 100);
        viewport.pan_by(100, 200, 56);
        assert_eq!(viewport.column_offset, 144);

        // Everything fits: nothing to pan
        viewport.pan_by(8, 30, 56);
        assert_eq!(viewport.column_offset, 0);
    }

    #[test]
    fn test_row_from_column() {
        let all = vec!["ab→cd".to_string(), String::new()];
        let rows = VirtualizedLines::new(&all).rows(&Viewport::new(2, 0));
        assert_eq!(rows[0].from_column(0), "ab→cd");
        assert_eq!(rows[0].from_column(3), "cd");
        assert_eq!(rows[0].from_column(9), "");
        assert_eq!(rows[1].from_column(0), "");
        assert_eq!(VirtualizedLines::new(&all).widest(), 5);
    }

    #[test]
    fn test_estimated_height() {
        let params = EstimateParams {
            avg_char_width: 1.0,
            container_width: 10,
            line_height: 1,
            max_height: 1000,
        };
        let text = vec!["short", "exactly 10", "this one is twenty c"];
        // 1 + 2 + 3
        assert_eq!(estimated_height(&text, params), 6);

        let tall = EstimateParams {
            line_height: 2,
            ..params
        };
        assert_eq!(estimated_height(&text, tall), 12);
    }

    #[test]
    fn test_estimated_height_is_capped() {
        let params = EstimateParams {
            avg_char_width: 1.0,
            container_width: 80,
            line_height: 1,
            max_height: 30,
        };
        assert_eq!(estimated_height(&lines(100_000), params), 30);
        assert_eq!(estimated_height::<String>(&[], params), 0);
    }

    #[test]
    fn test_number_width() {
        assert_eq!(VirtualizedLines::new(&lines(9)).number_width(), 1);
        assert_eq!(VirtualizedLines::new(&lines(10)).number_width(), 2);
        assert_eq!(VirtualizedLines::new(&[]).number_width(), 1);
    }
}
