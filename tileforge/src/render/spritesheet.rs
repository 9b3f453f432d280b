use crate::math::Size;

/// Grid of equally sized sprites inside one image.
///
/// Only the geometry lives here; pixels are owned by the asset layer and
/// fetched by `path`.
#[derive(Clone, Debug, PartialEq)]
pub struct Spritesheet {
    name: String,
    path: String,
    sprite_width: u32,
    sprite_height: u32,
    columns: u32,
    rows: u32,
}

impl Spritesheet {
    /// Describe a sheet whose image is `image_size` pixels large.
    ///
    /// Sprite dimensions are clamped to at least one pixel.
    pub fn new(path: impl Into<String>, image_size: (u32, u32), sprite_width: u32, sprite_height: u32) -> Self {
        let path = path.into();
        let sprite_width = sprite_width.max(1);
        let sprite_height = sprite_height.max(1);
        Self {
            name: file_stem(&path).to_string(),
            path,
            sprite_width,
            sprite_height,
            columns: image_size.0 / sprite_width,
            rows: image_size.1 / sprite_height,
        }
    }

    /// File name without directories or extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn sprite_size(&self) -> Size {
        Size::new(self.sprite_width as f32, self.sprite_height as f32)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn total_sprites(&self) -> u32 {
        self.columns * self.rows
    }

    /// Pixel offset of the sprite with the given index, row by row.
    pub fn sprite_offset(&self, index: u32) -> Option<(u32, u32)> {
        if index >= self.total_sprites() {
            return None;
        }

        Some((
            (index % self.columns) * self.sprite_width,
            (index / self.columns) * self.sprite_height,
        ))
    }
}

/// One `name,width,height` line of a sprite info file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteInfo {
    pub name: String,
    pub sprite_width: u32,
    pub sprite_height: u32,
}

/// Parse sprite info text.
///
/// Empty lines and lines starting with `#` are ignored; malformed lines are
/// logged and skipped.
pub fn parse_sprite_info(text: &str) -> Vec<SpriteInfo> {
    let mut sprites = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let items: Vec<&str> = line.split(',').map(str::trim).collect();
        if items.len() < 3 {
            log::warn!("Sprite info line {} has too few fields: '{}'", number + 1, line);
            continue;
        }

        match (items[1].parse(), items[2].parse()) {
            (Ok(sprite_width), Ok(sprite_height)) => sprites.push(SpriteInfo {
                name: items[0].to_string(),
                sprite_width,
                sprite_height,
            }),
            _ => log::warn!("Sprite info line {} has bad dimensions: '{}'", number + 1, line),
        }
    }

    log::debug!("{} sprite infos parsed", sprites.len());
    sprites
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}
