use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Reference colours of the first seven channels, by CSS name.
pub const CHANNEL_COLOR_NAMES: [&str; 7] = [
    "deepskyblue",
    "dimgray",
    "red",
    "blue",
    "green",
    "yellow",
    "brown",
];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Look up a CSS colour name.
pub fn named_color(name: &str) -> Option<Color32> {
    palette::named::from_str(name).map(|c| Color32::from_rgb(c.red, c.green, c.blue))
}

// ---------------------------------------------------------------------------
// Channel colours
// ---------------------------------------------------------------------------

/// One colour per channel: the reference colours first, then generated
/// hues for any channels beyond them.
pub fn channel_colors(n: usize) -> Vec<Color32> {
    let extra = generate_palette(n.saturating_sub(CHANNEL_COLOR_NAMES.len()));
    CHANNEL_COLOR_NAMES
        .iter()
        .take(n)
        .map(|name| named_color(name).unwrap_or(Color32::GRAY))
        .chain(extra)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_names_resolve() {
        assert_eq!(named_color("red"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(named_color("deepskyblue"), Some(Color32::from_rgb(0, 191, 255)));
        assert!(CHANNEL_COLOR_NAMES.iter().all(|n| named_color(n).is_some()));
        assert_eq!(named_color("not-a-colour"), None);
    }

    #[test]
    fn one_colour_per_channel() {
        assert!(channel_colors(0).is_empty());
        assert_eq!(channel_colors(3).len(), 3);
        let many = channel_colors(10);
        assert_eq!(many.len(), 10);
        assert_eq!(many[2], Color32::from_rgb(255, 0, 0));
    }
}
