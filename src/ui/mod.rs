use egui::{vec2, Vec2};
use quickcomic::PageSize;

pub mod app;
mod cell_pool;
mod textures;

/// Size of the window showing that an archive cannot be previewed
pub const ERROR_WINDOW_SIZE: Vec2 = Vec2::new(520.0, 240.0);

/// Bounds of the page pane when the window is first opened
const MAX_PAGE_PANE: Vec2 = Vec2::new(900.0, 820.0);

/// Thumbnails shown side by side in the sidebar when the window opens
const SIDEBAR_COLUMNS: f32 = 2.0;

pub fn sidebar_width(thumbnail_size: u32) -> f32 {
    (thumbnail_size as f32 + 12.0) * SIDEBAR_COLUMNS + 24.0
}

/// Size the window so that the first page fits next to the thumbnails
pub fn initial_window_size(page_size: PageSize, thumbnail_size: u32) -> Vec2 {
    let (width, height) = page_size.fit_within(MAX_PAGE_PANE.x, MAX_PAGE_PANE.y);

    vec2(
        width + sidebar_width(thumbnail_size),
        height.max(thumbnail_size as f32 * 2.0),
    )
}
