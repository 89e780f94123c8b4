//! Link preview card widget.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use super::text::{truncate_with_ellipsis, wrap_text};
use crate::application::services::{ImageSizing, LinkPreview, preview_filename};
use crate::domain::entities::ImageDimensions;
use crate::presentation::theme::LinkPreviewStyles;

/// Pixels covered by one terminal column.
pub const CELL_WIDTH_PX: u32 = 8;
/// Pixels covered by one terminal row.
pub const CELL_HEIGHT_PX: u32 = 16;

const SITE_NAME_LINES: usize = 1;
const TITLE_LINES: usize = 3;
const DESCRIPTION_LINES: usize = 5;
const REPLY_TITLE_MARGIN: u16 = 1;

/// Part of the card under a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardHit {
    /// The title; opens the link.
    OpenLink,
    /// The image; opens the viewer.
    PreviewImage,
}

/// Where each part of the card is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardLayout {
    /// Whole card including its border.
    pub card: Rect,
    /// Site name line.
    pub site_name: Option<Rect>,
    /// Title lines.
    pub title: Option<Rect>,
    /// Description lines.
    pub description: Option<Rect>,
    /// Image box including its border.
    pub image: Option<Rect>,
    site_name_text: String,
    title_lines: Vec<String>,
    description_lines: Vec<String>,
}

/// Terminal cells covering an image of the given pixel size.
#[must_use]
pub fn image_cells(dimensions: ImageDimensions) -> (u16, u16) {
    let cols = dimensions.width.div_ceil(CELL_WIDTH_PX).max(1);
    let rows = dimensions.height.div_ceil(CELL_HEIGHT_PX).max(1);
    (
        u16::try_from(cols).unwrap_or(u16::MAX),
        u16::try_from(rows).unwrap_or(u16::MAX),
    )
}

fn take_rows(cursor: &mut u16, bottom: u16, x: u16, width: u16, rows: usize) -> Option<Rect> {
    if rows == 0 || *cursor >= bottom || width == 0 {
        return None;
    }

    let rows = u16::try_from(rows).unwrap_or(u16::MAX);
    let height = rows.min(bottom - *cursor);
    let rect = Rect::new(x, *cursor, width, height);
    *cursor += height;
    Some(rect)
}

/// Card showing a link's site name, title, description and image.
///
/// Renders nothing until Open Graph metadata is available.
pub struct LinkPreviewCard<'a> {
    preview: &'a LinkPreview,
    styles: LinkPreviewStyles,
}

impl<'a> LinkPreviewCard<'a> {
    /// Creates a card for `preview`.
    #[must_use]
    pub const fn new(preview: &'a LinkPreview, styles: LinkPreviewStyles) -> Self {
        Self { preview, styles }
    }

    /// Lays the card out inside `area`.
    #[must_use]
    pub fn layout(&self, area: Rect) -> Option<CardLayout> {
        let og = self.preview.open_graph()?;
        if area.width < 5 || area.height < 3 {
            return None;
        }

        let x = area.x + 2;
        let width = area.width - 4;
        let bottom = area.bottom() - 1;
        let mut cursor = area.y + 1;
        let mut layout = CardLayout::default();

        if let Some(site_name) = og.site_name.as_deref().filter(|s| !s.is_empty()) {
            layout.site_name_text = truncate_with_ellipsis(site_name, usize::from(width));
            layout.site_name = take_rows(&mut cursor, bottom, x, width, SITE_NAME_LINES);
        }

        let title_width = if self.preview.layout().is_reply {
            width.saturating_sub(REPLY_TITLE_MARGIN)
        } else {
            width
        };
        layout.title_lines = wrap_text(self.preview.title(), usize::from(title_width), TITLE_LINES);
        layout.title = take_rows(
            &mut cursor,
            bottom,
            x,
            title_width,
            layout.title_lines.len(),
        );

        if let Some(description) = og.description.as_deref().filter(|d| !d.is_empty()) {
            layout.description_lines =
                wrap_text(description, usize::from(width), DESCRIPTION_LINES);
            layout.description = take_rows(
                &mut cursor,
                bottom,
                x,
                width,
                layout.description_lines.len(),
            );
        }

        if let Some(size) = self.preview.display_size() {
            let (cols, rows) = image_cells(size);
            let box_width = cols.saturating_add(2).min(width);
            let image_x = x + (width - box_width) / 2;
            layout.image = take_rows(
                &mut cursor,
                bottom,
                image_x,
                box_width,
                usize::from(rows.saturating_add(2)),
            );
        }

        layout.card = Rect::new(area.x, area.y, area.width, cursor + 1 - area.y);
        Some(layout)
    }

    /// Maps a click at (`column`, `row`) to the part of the card under it.
    #[must_use]
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<CardHit> {
        let layout = self.layout(area)?;
        let position = Position::new(column, row);

        if layout.title.is_some_and(|r| r.contains(position)) {
            Some(CardHit::OpenLink)
        } else if layout.image.is_some_and(|r| r.contains(position)) {
            Some(CardHit::PreviewImage)
        } else {
            None
        }
    }

    fn image_caption(&self) -> String {
        match self.preview.sizing() {
            ImageSizing::NoImage => String::new(),
            ImageSizing::Pending { .. } => "loading…".to_string(),
            ImageSizing::Sized {
                image_url,
                original,
                ..
            } => format!(
                "{} {}x{}",
                preview_filename(image_url),
                original.width,
                original.height
            ),
        }
    }
}

impl Widget for LinkPreviewCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(layout) = self.layout(area) else {
            return;
        };

        Block::bordered()
            .border_style(self.styles.container)
            .render(layout.card, buf);

        if let Some(rect) = layout.site_name {
            Paragraph::new(layout.site_name_text.as_str())
                .style(self.styles.site_title)
                .render(rect, buf);
        }

        if let Some(rect) = layout.title {
            let lines: Vec<Line> = layout
                .title_lines
                .iter()
                .map(|l| Line::from(l.as_str()))
                .collect();
            Paragraph::new(lines)
                .style(self.styles.site_subtitle)
                .render(rect, buf);
        }

        if let Some(rect) = layout.description {
            let lines: Vec<Line> = layout
                .description_lines
                .iter()
                .map(|l| Line::from(l.as_str()))
                .collect();
            Paragraph::new(lines)
                .style(self.styles.site_description)
                .render(rect, buf);
        }

        if let Some(rect) = layout.image {
            let block = Block::bordered().border_style(self.styles.image_container);
            let inner = block.inner(rect);
            block.render(rect, buf);

            if inner.height > 0 {
                let caption_row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
                let caption = truncate_with_ellipsis(&self.image_caption(), usize::from(inner.width));
                Paragraph::new(caption)
                    .style(self.styles.image_container)
                    .alignment(Alignment::Center)
                    .render(caption_row, buf);
            }
        }
    }
}
