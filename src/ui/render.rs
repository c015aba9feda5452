use tiny_skia::{Paint, Color, Rect, Transform, PixmapMut, PathBuilder, Stroke};
use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, SwashCache};
use crate::config::ThemeConfig;
use crate::state::{AppState, Focus};
use crate::status::Severity;

const FIELD_HEIGHT: f32 = 36.0;
const STATUS_HEIGHT: f32 = 18.0;
const QUERY_SIZE: f32 = 18.0;
const ROW_SIZE: f32 = 15.0;
const STATUS_SIZE: f32 = 13.0;

/// Geometry of the result list, shared by drawing and pointer hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    pub field_top: f32,
    pub top: f32,
    pub item_height: f32,
    pub visible: usize,
}

impl ListLayout {
    pub fn new(theme: &ThemeConfig, height: f32) -> Self {
        let top = theme.padding + FIELD_HEIGHT + theme.spacing;
        let bottom = height - theme.padding - STATUS_HEIGHT - theme.spacing;
        let visible = ((bottom - top) / theme.item_height).max(0.0) as usize;
        Self {
            field_top: theme.padding,
            top,
            item_height: theme.item_height,
            visible,
        }
    }

    fn bottom(&self) -> f32 {
        self.top + self.visible as f32 * self.item_height
    }

    /// Scrolls as little as possible to keep the cursor row on screen.
    pub fn follow(&self, offset: usize, total: usize, cursor: Option<usize>) -> usize {
        if self.visible == 0 || total <= self.visible {
            return 0;
        }
        let cursor = cursor.unwrap_or(0).min(total - 1);
        let offset = offset.min(total - self.visible);
        if cursor < offset {
            cursor
        } else if cursor >= offset + self.visible {
            cursor + 1 - self.visible
        } else {
            offset
        }
    }

    pub fn hits_query_field(&self, y: f32) -> bool {
        y >= self.field_top && y < self.field_top + FIELD_HEIGHT
    }

    pub fn row_at(&self, y: f32, offset: usize, total: usize) -> Option<usize> {
        if y < self.top || y >= self.bottom() {
            return None;
        }
        let row = offset + ((y - self.top) / self.item_height) as usize;
        (row < total).then_some(row)
    }
}

pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    pub fn draw(&mut self, pixmap: &mut PixmapMut, state: &AppState, scroll_offset: usize) {
        let theme = &state.config.theme;
        let bg_color = ThemeConfig::parse_color(&theme.background);
        let field_color = ThemeConfig::parse_color(&theme.field_background);
        let border_color = ThemeConfig::parse_color(&theme.border_color);
        let text_color = ThemeConfig::parse_color(&theme.text);
        let accent_color = ThemeConfig::parse_color(&theme.accent);

        pixmap.fill(Color::TRANSPARENT);

        let width = pixmap.width() as f32;
        let height = pixmap.height() as f32;

        let Some(window) = Rect::from_xywh(0.0, 0.0, width, height) else { return; };
        self.draw_rounded_rect(pixmap, window, theme.border_radius, bg_color, Some(border_color));

        let inner_width = width - theme.padding * 2.0;
        let inner_radius = theme.border_radius / 2.0;
        let focus_border = |focus: Focus| {
            Some(if state.focus == focus { accent_color } else { border_color })
        };
        let layout = ListLayout::new(theme, height);

        // Query field
        let field = Rect::from_xywh(theme.padding, layout.field_top, inner_width, FIELD_HEIGHT);
        if let Some(field) = field {
            let border = focus_border(Focus::Query);
            self.draw_rounded_rect(pixmap, field, inner_radius, field_color, border);
        }
        let (query_text, query_color) = if state.query.is_empty() {
            ("Search apps...".to_string(), ThemeConfig::parse_color(&theme.placeholder))
        } else {
            (format!("> {}", state.query), text_color)
        };
        let query_y = layout.field_top + (FIELD_HEIGHT - QUERY_SIZE) / 2.0;
        self.draw_text(pixmap, &query_text, theme.padding + 10.0, query_y, QUERY_SIZE, query_color);

        // Result list
        let list_height = layout.visible as f32 * layout.item_height;
        if let Some(list) = Rect::from_xywh(theme.padding, layout.top, inner_width, list_height) {
            let border = focus_border(Focus::List);
            self.draw_rounded_rect(pixmap, list, inner_radius, field_color, border);
        }

        for (i, entry) in state.displayed().enumerate().skip(scroll_offset).take(layout.visible) {
            let y = layout.top + (i - scroll_offset) as f32 * layout.item_height;

            if state.cursor == Some(i) {
                let (sel_width, sel_height) = (inner_width - 4.0, layout.item_height - 2.0);
                let sel = Rect::from_xywh(theme.padding + 2.0, y + 1.0, sel_width, sel_height);
                if let Some(sel) = sel {
                    self.draw_rounded_rect(pixmap, sel, inner_radius, accent_color, None);
                }
            }

            let text_y = y + (layout.item_height - ROW_SIZE) / 2.0;
            self.draw_text(pixmap, &entry.name, theme.padding + 10.0, text_y, ROW_SIZE, text_color);
        }

        if state.filtered_indices.is_empty() && !state.query.is_empty() {
            let error_color = ThemeConfig::parse_color(&theme.error);
            let (x, y) = (theme.padding + 10.0, layout.top + 6.0);
            self.draw_text(pixmap, "No results found", x, y, ROW_SIZE, error_color);
        }

        // Status line
        let status_color = match state.status.severity() {
            Severity::Info => text_color,
            Severity::Success => ThemeConfig::parse_color(&theme.success),
            Severity::Error => ThemeConfig::parse_color(&theme.error),
        };
        let status_y =
            height - theme.padding - STATUS_HEIGHT + (STATUS_HEIGHT - STATUS_SIZE) / 2.0;
        let message = state.status.message();
        self.draw_text(pixmap, message, theme.padding, status_y, STATUS_SIZE, status_color);
    }

    fn draw_rounded_rect(
        &self,
        pixmap: &mut PixmapMut,
        rect: Rect,
        radius: f32,
        fill: Color,
        stroke: Option<Color>,
    ) {
        let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
        let (x, y, w, h) = (rect.left(), rect.top(), rect.width(), rect.height());

        let mut pb = PathBuilder::new();
        pb.move_to(x + radius, y);
        pb.line_to(x + w - radius, y);
        pb.quad_to(x + w, y, x + w, y + radius);
        pb.line_to(x + w, y + h - radius);
        pb.quad_to(x + w, y + h, x + w - radius, y + h);
        pb.line_to(x + radius, y + h);
        pb.quad_to(x, y + h, x, y + h - radius);
        pb.line_to(x, y + radius);
        pb.quad_to(x, y, x + radius, y);
        pb.close();

        let Some(path) = pb.finish() else { return; };

        let mut paint = Paint::default();
        paint.set_color(fill);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, tiny_skia::FillRule::Winding, Transform::identity(), None);

        if let Some(s_color) = stroke {
            paint.set_color(s_color);
            let stroke = Stroke { width: 1.5, ..Default::default() };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn draw_text(
        &mut self,
        pixmap: &mut PixmapMut,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    ) {
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        buffer.set_size(&mut self.font_system, Some(pixmap.width() as f32 - x), None);
        buffer.set_text(&mut self.font_system, text, Attrs::new(), cosmic_text::Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let text_color = cosmic_text::Color::rgba(
            (color.red() * 255.0) as u8,
            (color.green() * 255.0) as u8,
            (color.blue() * 255.0) as u8,
            (color.alpha() * 255.0) as u8,
        );

        let (max_x, max_y) = (pixmap.width() as i32, pixmap.height() as i32);
        let cache = &mut self.swash_cache;
        buffer.draw(&mut self.font_system, cache, text_color, |draw_x, draw_y, w, h, color| {
            let draw_x = draw_x + x as i32;
            let draw_y = draw_y + y as i32;
            if w == 0 || h == 0 || draw_x < 0 || draw_y < 0 || draw_x >= max_x || draw_y >= max_y {
                return;
            }
            let rgba = Color::from_rgba8(color.r(), color.g(), color.b(), color.a());
            let paint = Paint {
                shader: tiny_skia::Shader::SolidColor(rgba),
                ..Paint::default()
            };
            if let Some(r) = Rect::from_xywh(draw_x as f32, draw_y as f32, w as f32, h as f32) {
                pixmap.fill_rect(r, &paint, Transform::identity(), None);
            }
        });
    }
}
