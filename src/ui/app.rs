use std::path::PathBuf;

use anyhow::Error;
use egui::{
    vec2, Align, Align2, Area, CentralPanel, Color32, Context, InputState, Key, Label, Layout,
    Response, RichText, ScrollArea, Sense, SidePanel, Spinner, Stroke, TextStyle, Ui, Vec2,
};
use log::{error, trace};
use quickcomic::{
    presenter::PresenterOptions, CellId, CellImage, LazyGridPresenter, PreviewError,
    PreviewSession,
};

use crate::{cmd::Args, settings::Settings};

use super::{cell_pool::CellPool, sidebar_width, textures::TextureCache};

pub struct PreviewApp {
    /// Application settings
    settings: Settings,

    /// Path of the previewed file or directory
    path: PathBuf,

    state: PreviewState,
}

enum PreviewState {
    Ready(Box<Viewer>),

    /// The archive cannot be previewed at all
    Failed(Error),
}

/// Thumbnail grid plus the page currently selected in it
struct Viewer {
    /// Owns the archive, everything below only refers to it
    session: PreviewSession,

    grid: LazyGridPresenter,
    pool: CellPool,
    thumbnails: TextureCache,

    page: LazyGridPresenter,
    page_cell: CellId,
    page_texture: TextureCache,

    /// Position of the page shown in the main pane
    selected: usize,
}

impl PreviewApp {
    /// Set up the application
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        args: Args,
        prepared: Result<PreviewSession, PreviewError>,
    ) -> Self {
        // Load settings from the application's storage, or use default ones
        let mut settings: Settings = match cc.storage {
            Some(storage) => eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default(),
            None => Settings::default(),
        };

        if let Some(thumbnail_size) = args.thumbnail_size {
            settings.thumbnail_size = thumbnail_size;
        }

        if args.serial_reads {
            settings.serial_reads = true;
        }

        let state = match prepared {
            Ok(session) => {
                PreviewState::Ready(Box::new(Viewer::new(&cc.egui_ctx, session, &settings)))
            }
            Err(err) => {
                let err = Error::new(err);
                error!("{err:?}");
                PreviewState::Failed(err)
            }
        };

        Self {
            settings,
            path: args.path,
            state,
        }
    }

    /// Handle inputs (keyboard, etc.) from the UI thread
    fn handle_inputs(&mut self, i: &InputState, frame: &mut eframe::Frame) {
        if i.key_pressed(Key::Escape) {
            frame.close();
        }

        if i.key_pressed(Key::I) {
            self.settings.display_pages_number = !self.settings.display_pages_number;
        }

        let PreviewState::Ready(viewer) = &mut self.state else {
            return;
        };

        let last = viewer.grid.cell_count().saturating_sub(1);

        let target = if i.key_pressed(Key::Home) {
            Some(0)
        } else if i.key_pressed(Key::End) {
            Some(last)
        } else if i.key_pressed(Key::ArrowDown)
            || i.key_pressed(Key::ArrowRight)
            || i.key_pressed(Key::Space)
        {
            Some((viewer.selected + 1).min(last))
        } else if i.key_pressed(Key::ArrowUp) || i.key_pressed(Key::ArrowLeft) {
            Some(viewer.selected.saturating_sub(1))
        } else {
            None
        };

        if let Some(target) = target {
            viewer.select(target);
        }
    }
}

impl Viewer {
    fn new(ctx: &Context, session: PreviewSession, settings: &Settings) -> Self {
        let thumbnail_options = PresenterOptions {
            thumbnail_edge: Some(settings.thumbnail_size()),
            force_serial: settings.serial_reads,
        };

        let page_options = PresenterOptions {
            thumbnail_edge: None,
            force_serial: settings.serial_reads,
        };

        let repaint = |ctx: &Context| {
            let ctx = ctx.clone();
            move || ctx.request_repaint()
        };

        let grid = session
            .presenter(thumbnail_options)
            .with_waker(repaint(ctx));

        let mut page = session.presenter(page_options).with_waker(repaint(ctx));
        let page_cell = page.make_cell();

        let mut viewer = Self {
            session,
            grid,
            pool: CellPool::default(),
            thumbnails: TextureCache::default(),
            page,
            page_cell,
            page_texture: TextureCache::default(),
            selected: 0,
        };

        viewer.select(0);
        viewer
    }

    /// Show a page in the main pane
    fn select(&mut self, position: usize) {
        self.selected = position;

        if self.page.is_showing(self.page_cell, position) {
            return;
        }

        self.page.bind(self.page_cell, position);
        self.page.will_display(self.page_cell);
    }

    fn show_thumbnails(&mut self, ui: &mut Ui, settings: &Settings) {
        let edge = settings.thumbnail_size() as f32;
        let caption_height = if settings.display_pages_number {
            ui.text_style_height(&TextStyle::Small) + ui.spacing().item_spacing.y
        } else {
            0.0
        };

        let cell_size = vec2(edge, edge + caption_height);
        let spacing = ui.spacing().item_spacing;
        let columns = (((ui.available_width() + spacing.x) / (cell_size.x + spacing.x)).floor()
            as usize)
            .max(1);

        let total = self.grid.cell_count();
        let rows = (total + columns - 1) / columns;

        let mut clicked = None;

        ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show_rows(ui, cell_size.y, rows, |ui, row_range| {
                let visible = (row_range.start * columns)..(row_range.end * columns);
                let cells = self.pool.show(&mut self.grid, visible);

                for row in cells.chunks(columns) {
                    ui.horizontal(|ui| {
                        for &(position, cell) in row {
                            let response = ui
                                .allocate_ui_with_layout(
                                    cell_size,
                                    Layout::top_down(Align::Center),
                                    |ui| {
                                        ui.set_min_size(cell_size);

                                        let response = thumbnail(
                                            ui,
                                            &self.grid,
                                            &mut self.thumbnails,
                                            cell,
                                            edge,
                                        );

                                        if settings.display_pages_number {
                                            ui.label(
                                                RichText::new((position + 1).to_string()).small(),
                                            );
                                        }

                                        response
                                    },
                                )
                                .inner;

                            if position == self.selected {
                                ui.painter().rect_stroke(
                                    response.rect.expand(2.0),
                                    2.0,
                                    Stroke::new(2.0, ui.visuals().selection.bg_fill),
                                );
                            }

                            if response.clicked() {
                                clicked = Some(position);
                            }
                        }
                    });
                }
            });

        if let Some(position) = clicked {
            self.select(position);
        }
    }

    fn show_page(&mut self, ui: &mut Ui) {
        let available = ui.available_size();

        ui.centered_and_justified(|ui| match self.page.cell_image(self.page_cell) {
            Some(CellImage::Loaded(page)) => {
                let Some(binding) = self.page.cell_binding(self.page_cell) else {
                    return;
                };

                let texture = self.page_texture.texture_for(
                    ui.ctx(),
                    self.page_cell,
                    binding.generation,
                    page,
                );

                let (width, height) = page.size().fit_within(available.x, available.y);
                ui.image(texture.id(), vec2(width, height));
            }

            Some(CellImage::Placeholder) => {
                ui.heading(
                    RichText::new("⚠ This page cannot be displayed").color(Color32::YELLOW),
                );
            }

            _ => {
                ui.add(Spinner::new().size(48.0));
            }
        });
    }
}

/// Render a single grid cell, the returned response senses clicks
fn thumbnail(
    ui: &mut Ui,
    grid: &LazyGridPresenter,
    textures: &mut TextureCache,
    cell: CellId,
    edge: f32,
) -> Response {
    let response = match (grid.cell_image(cell), grid.cell_binding(cell)) {
        (Some(CellImage::Loaded(page)), Some(binding)) => {
            let texture = textures.texture_for(ui.ctx(), cell, binding.generation, page);
            let (width, height) = page.size().fit_within(edge, edge);

            ui.allocate_ui_with_layout(Vec2::splat(edge), Layout::bottom_up(Align::Center), |ui| {
                ui.image(texture.id(), vec2(width, height))
            })
            .inner
        }

        (Some(CellImage::Placeholder), _) => ui.add_sized(
            Vec2::splat(edge),
            Label::new(
                RichText::new("⚠")
                    .size(edge / 3.0)
                    .color(Color32::YELLOW),
            ),
        ),

        _ => ui.add_sized(Vec2::splat(edge), Spinner::new()),
    };

    response.interact(Sense::click())
}

impl eframe::App for PreviewApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        // Save settings
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        ctx.input(|i| self.handle_inputs(i, frame));

        let settings = &self.settings;

        match &mut self.state {
            PreviewState::Failed(err) => {
                CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(24.0);
                        ui.heading(RichText::new("⚠ Cannot preview this file").color(Color32::YELLOW));
                        ui.add_space(8.0);
                        ui.label(self.path.display().to_string());
                        ui.add_space(8.0);
                        ui.label(RichText::new(format!("{err:#}")).small());
                    });
                });
            }

            PreviewState::Ready(viewer) => {
                // Background loads only wake us up, outcomes are applied here
                let applied = viewer.grid.apply_completions() + viewer.page.apply_completions();

                if applied > 0 {
                    trace!("Applied {applied} loaded pages");
                }

                SidePanel::left("thumbnails")
                    .resizable(true)
                    .default_width(sidebar_width(settings.thumbnail_size()))
                    .show(ctx, |ui| viewer.show_thumbnails(ui, settings));

                CentralPanel::default().show(ctx, |ui| viewer.show_page(ui));

                // Display the pages number if enabled in the settings
                if settings.display_pages_number {
                    Area::new("pages_number")
                        .anchor(Align2::RIGHT_TOP, Vec2::ZERO)
                        .show(ctx, |ui| {
                            let text = format!(
                                "{}/{}",
                                viewer.selected + 1,
                                viewer.session.catalog().len()
                            );

                            ui.add(
                                Label::new(
                                    RichText::from(text).heading().background_color(Color32::BLACK),
                                )
                                .wrap(false),
                            );
                        });
                }
            }
        }
    }
}
