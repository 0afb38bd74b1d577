//! Built-in source definitions for well-known stock photo sites

use crate::source::SourceSpec;

/// Names of every built-in preset
pub const PRESET_NAMES: [&str; 5] = ["pixabay", "shutterstock", "burst", "picjumbo", "isorepublic"];

/// Looks up a built-in preset by name (case-insensitive)
pub fn by_name(name: &str) -> Option<SourceSpec> {
    let spec = match name.to_ascii_lowercase().as_str() {
        "pixabay" => SourceSpec::new(
            "pixabay",
            "https://pixabay.com/images/search/{keyword}/?pagi={page}",
            ".item a img:first-of-type",
        )
        .with_exclude(&["/static/img/blank.gif"]),
        "shutterstock" => SourceSpec::new(
            "shutterstock",
            "https://www.shutterstock.com/search/{keyword}?src=aw.ds&orientation=horizontal&page={page}",
            ".z_e_h",
        ),
        "burst" => SourceSpec::new(
            "burst",
            "https://burst.shopify.com/photos/search?page={page}&q={keyword}&utf8=%E2%9C%93",
            ".tile__image",
        )
        .with_extensions(&[".png", ".jpg"]),
        "picjumbo" => SourceSpec::new(
            "picjumbo",
            "https://picjumbo.com/page/{page}/?s={keyword}",
            ".image",
        ),
        "isorepublic" => SourceSpec::new(
            "isorepublic",
            "https://isorepublic.com/page/{page}/?s={keyword}&post_type=photo_post",
            ".photo-grid-item img:first-of-type",
        ),
        _ => return None,
    };
    Some(spec)
}

/// Returns every built-in preset
pub fn all() -> Vec<SourceSpec> {
    PRESET_NAMES.iter().filter_map(|name| by_name(name)).collect()
}
