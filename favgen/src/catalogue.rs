/// One target size in the fixed output catalogue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SizeSpec {
    pub file_name: &'static str,
    pub width: u32,
    pub height: u32,
}

const fn spec(file_name: &'static str, width: u32, height: u32) -> SizeSpec {
    SizeSpec {
        file_name,
        width,
        height,
    }
}

/// Web delivery sizes, in generation order. New sizes are additive here.
pub const WEB_SIZES: [SizeSpec; 6] = [
    spec("favicon-16x16.png", 16, 16),
    spec("favicon-32x32.png", 32, 32),
    spec("favicon-48x48.png", 48, 48),
    // iOS home screen
    spec("apple-touch-icon.png", 180, 180),
    // Android Chrome
    spec("favicon-192x192.png", 192, 192),
    // PWA install
    spec("favicon-512x512.png", 512, 512),
];

/// Sizes bundled into the legacy favicon.ico.
pub const ICO_SIZES: [u32; 3] = [16, 32, 48];

pub const ICO_NAME: &str = "favicon.ico";
pub const WEBMANIFEST_NAME: &str = "site.webmanifest";
