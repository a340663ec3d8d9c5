//! UiFrame: a thin wrapper around a ratatui buffer that clips every draw to
//! the visible area.
//!
//! Windows on the desktop can sit partially or entirely off-screen, so
//! their geometry is signed while the terminal buffer is not. Window frames
//! are therefore drawn into a private buffer of the window's own size and
//! composited with [`UiFrame::blit_from_signed`], which drops the cells that
//! fall outside the terminal.
use crate::window::FloatRect;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer, e.g. an
    /// offscreen window buffer or a test buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Paint every cell of `area` blank with `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(" ");
                    cell.set_style(style);
                }
            }
        }
    }

    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let bounds = self.area.intersection(self.buffer.area);
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }

    /// Copy `src` (whose origin is 0,0) onto this frame at a signed offset.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Test helper: the symbols of row `y`, concatenated.
#[cfg(test)]
pub(crate) fn row_text(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.x..area.x + area.width)
        .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u16, height: u16, symbol: &str) -> Buffer {
        let mut src = Buffer::empty(Rect {
            x: 0,
            y: 0,
            width,
            height,
        });
        for y in 0..height {
            for x in 0..width {
                if let Some(cell) = src.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                }
            }
        }
        src
    }

    #[test]
    fn blit_drops_cells_left_of_frame() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 5,
            height: 1,
        };
        let mut dest = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut dest);
        frame.blit_from_signed(
            &solid(3, 1, "#"),
            FloatRect {
                x: -2,
                y: 0,
                width: 3,
                height: 1,
            },
        );
        assert_eq!(row_text(&dest, 0), "#    ");
    }

    #[test]
    fn blit_respects_frame_bottom_edge() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 3,
            height: 2,
        };
        let mut dest = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut dest);
        frame.blit_from_signed(
            &solid(2, 3, "@"),
            FloatRect {
                x: 1,
                y: 1,
                width: 2,
                height: 3,
            },
        );
        assert_eq!(row_text(&dest, 0), "   ");
        assert_eq!(row_text(&dest, 1), " @@");
    }

    #[test]
    fn set_string_truncates_at_frame_edge() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 1,
        };
        let mut dest = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut dest);
        frame.set_string(1, 0, "hello", Style::default());
        assert_eq!(row_text(&dest, 0), " hel");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_to_width("◧◎✎", 2), "◧◎");
        assert_eq!(truncate_to_width("ab", 5), "ab");
    }
}
