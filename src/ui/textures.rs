use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use quickcomic::{CellId, PageImage};

/// GPU textures of the pages currently shown by cells
///
/// A texture is tied to the binding generation it was uploaded for, so a
/// recycled cell never shows the texture of its previous page.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<CellId, (u64, TextureHandle)>,
}

impl TextureCache {
    pub fn texture_for(
        &mut self,
        ctx: &Context,
        cell: CellId,
        generation: u64,
        page: &PageImage,
    ) -> TextureHandle {
        if let Some((uploaded_for, texture)) = self.textures.get(&cell) {
            if *uploaded_for == generation {
                return texture.clone();
            }
        }

        let image = ColorImage::from_rgba_unmultiplied(
            [page.width as usize, page.height as usize],
            &page.rgba8_pixels,
        );

        let texture = ctx.load_texture(
            format!("page-{cell:?}-{generation}"),
            image,
            TextureOptions::LINEAR,
        );

        self.textures.insert(cell, (generation, texture.clone()));
        texture
    }
}
