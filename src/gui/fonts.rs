use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

/// System fonts tried as fallbacks for scripts the bundled egui fonts lack
/// (Arabic, Devanagari, Bengali, CJK, Thai).
const FALLBACK_FONTS: &[(&str, &[&str])] = &[
    (
        "arabic",
        &[
            "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Regular.ttf",
            "/usr/share/fonts/noto/NotoNaskhArabic-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
            "/System/Library/Fonts/Supplemental/GeezaPro.ttc",
            "C:\\Windows\\Fonts\\segoeui.ttf",
        ],
    ),
    (
        "devanagari",
        &[
            "/usr/share/fonts/truetype/noto/NotoSansDevanagari-Regular.ttf",
            "/usr/share/fonts/noto/NotoSansDevanagari-Regular.ttf",
            "/System/Library/Fonts/Supplemental/DevanagariMT.ttc",
            "C:\\Windows\\Fonts\\Nirmala.ttf",
        ],
    ),
    (
        "bengali",
        &[
            "/usr/share/fonts/truetype/noto/NotoSansBengali-Regular.ttf",
            "/usr/share/fonts/noto/NotoSansBengali-Regular.ttf",
        ],
    ),
    (
        "thai",
        &[
            "/usr/share/fonts/truetype/noto/NotoSansThai-Regular.ttf",
            "/usr/share/fonts/noto/NotoSansThai-Regular.ttf",
            "C:\\Windows\\Fonts\\leelawui.ttf",
        ],
    ),
    (
        "cjk",
        &[
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/System/Library/Fonts/PingFang.ttc",
            "C:\\Windows\\Fonts\\msyh.ttc",
        ],
    ),
];

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();

    for (name, paths) in FALLBACK_FONTS {
        let Some(bytes) = paths.iter().find_map(|path| std::fs::read(path).ok()) else {
            log::debug!("No system font found for {}", name);
            continue;
        };
        fonts
            .font_data
            .insert(name.to_string(), FontData::from_owned(bytes).into());
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .push(name.to_string());
        }
    }

    ctx.set_fonts(fonts);
}
