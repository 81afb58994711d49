/// Opaque reference to an image source, typically a URL handed over by the
/// gallery/history layer. The engine never interprets it beyond passing it
/// to the texture loader.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureRef(pub String);

impl TextureRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TextureRef {
    fn from(url: &str) -> Self {
        Self(url.to_owned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

/// Sampler hints applied when the decoded image is uploaded by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSettings {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub linear_filter: bool,
    pub generate_mipmaps: bool,
    pub anisotropy: u8,
    pub srgb: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            linear_filter: true,
            generate_mipmaps: true,
            anisotropy: 4,
            srgb: true,
        }
    }
}

/// Decoded RGBA8 image, renderer-agnostic.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub settings: TextureSettings,
}

impl TextureData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            rgba,
            settings: TextureSettings::default(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.rgba.len()
    }
}
