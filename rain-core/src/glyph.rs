//! Display glyphs for provider icon codes.
//!
//! OpenWeather icon codes look like `10d` / `10n`: the two-digit prefix is the
//! condition family, the suffix is day or night. See
//! <https://openweathermap.org/weather-conditions>.

/// Ordered `(prefix, glyph)` pairs. First match wins.
pub const ICON_GLYPHS: &[(&str, &str)] = &[
    ("01", "☀️"),
    ("02", "🌤️"),
    ("03", "☁️"),
    ("04", "☁️"),
    ("09", "🌧️"),
    ("10", "🌦️"),
    ("11", "⛈️"),
    ("13", "❄️"),
    ("50", "🌫️"),
];

/// Used for empty or unknown icon codes.
pub const FALLBACK_GLYPH: &str = "🌡️";

pub fn glyph_for(icon_code: &str) -> &'static str {
    ICON_GLYPHS
        .iter()
        .find(|(prefix, _)| icon_code.starts_with(prefix))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FALLBACK_GLYPH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_known_prefix_for_day_and_night() {
        for (prefix, glyph) in ICON_GLYPHS {
            assert_eq!(glyph_for(&format!("{prefix}d")), *glyph);
            assert_eq!(glyph_for(&format!("{prefix}n")), *glyph);
        }
    }

    #[test]
    fn cloud_families_share_a_glyph() {
        assert_eq!(glyph_for("03d"), glyph_for("04n"));
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(glyph_for(""), FALLBACK_GLYPH);
        assert_eq!(glyph_for("99d"), FALLBACK_GLYPH);
        assert_eq!(glyph_for("1"), FALLBACK_GLYPH);
    }
}
