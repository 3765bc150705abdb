use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thumbnail_size: u32,
    pub display_pages_number: bool,
    pub serial_reads: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thumbnail_size: 160,
            display_pages_number: true,
            serial_reads: false,
        }
    }
}

impl Settings {
    /// Thumbnails below this size are unreadable
    pub const MIN_THUMBNAIL_SIZE: u32 = 48;
    pub const MAX_THUMBNAIL_SIZE: u32 = 512;

    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
            .clamp(Self::MIN_THUMBNAIL_SIZE, Self::MAX_THUMBNAIL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_size_is_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.thumbnail_size(), 160);

        settings.thumbnail_size = 1;
        assert_eq!(settings.thumbnail_size(), Settings::MIN_THUMBNAIL_SIZE);

        settings.thumbnail_size = 100_000;
        assert_eq!(settings.thumbnail_size(), Settings::MAX_THUMBNAIL_SIZE);
    }
}
