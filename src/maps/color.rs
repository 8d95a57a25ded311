//! Gradient interpolation for choropleth fills.

use crate::coalitions::ColorStop;

/// Piecewise-linear interpolation of a color scale at vote share `t`.
/// `t` is clamped to [0, 1]; stops arrive sorted from config loading.
pub fn scale_color(scale: &[ColorStop], t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    match scale {
        [] => "#808080".to_string(),
        [only] => only.color.clone(),
        _ => {
            if t <= scale[0].at {
                return scale[0].color.clone();
            }
            for pair in scale.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if t <= b.at {
                    let span = b.at - a.at;
                    let local = if span <= f64::EPSILON {
                        1.0
                    } else {
                        (t - a.at) / span
                    };
                    return lerp_hex(&a.color, &b.color, local);
                }
            }
            scale[scale.len() - 1].color.clone()
        }
    }
}

fn lerp_hex(start: &str, end: &str, t: f64) -> String {
    let (sr, sg, sb) = parse_hex(start);
    let (er, eg, eb) = parse_hex(end);
    let mix = |s: u8, e: u8| (f64::from(s) + (f64::from(e) - f64::from(s)) * t) as u8;
    format!("#{:02X}{:02X}{:02X}", mix(sr, er), mix(sg, eg), mix(sb, eb))
}

fn parse_hex(color: &str) -> (u8, u8, u8) {
    let hex = color.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0)
    };
    (channel(0), channel(2), channel(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(pairs: &[(f64, &str)]) -> Vec<ColorStop> {
        pairs
            .iter()
            .map(|(at, color)| ColorStop {
                at: *at,
                color: color.to_string(),
            })
            .collect()
    }

    #[test]
    fn endpoints_return_the_stop_colors() {
        let scale = stops(&[(0.0, "#FFFFCC"), (1.0, "#0060C9")]);
        assert_eq!(scale_color(&scale, 0.0), "#FFFFCC");
        assert_eq!(scale_color(&scale, 1.0), "#0060C9");
    }

    #[test]
    fn midpoint_blends_channels() {
        let scale = stops(&[(0.0, "#000000"), (1.0, "#FFFFFF")]);
        assert_eq!(scale_color(&scale, 0.5), "#7F7F7F");
    }

    #[test]
    fn out_of_range_shares_are_clamped() {
        let scale = stops(&[(0.0, "#000000"), (1.0, "#FFFFFF")]);
        assert_eq!(scale_color(&scale, -0.5), "#000000");
        assert_eq!(scale_color(&scale, 1.5), "#FFFFFF");
    }

    #[test]
    fn multi_stop_scales_interpolate_within_the_right_segment() {
        let scale = stops(&[(0.0, "#000000"), (0.5, "#FF0000"), (1.0, "#FFFFFF")]);
        assert_eq!(scale_color(&scale, 0.25), "#7F0000");
        assert_eq!(scale_color(&scale, 0.75), "#FF7F7F");
    }
}
