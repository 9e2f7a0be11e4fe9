//! Built-in emblem icons for the skills keyboard, authored on a 24x24 grid.
//!
//! Filled shapes wind clockwise (screen space) and holes counter-clockwise,
//! so overlapping parts stay filled under the non-zero rule.

use crate::icon::{SvgIcon, ViewBox};

pub const BUILTIN_NAMES: [&str; 16] = [
    "react",
    "nextjs",
    "typescript",
    "javascript",
    "tailwind",
    "nodejs",
    "python",
    "java",
    "express",
    "spring",
    "mongodb",
    "postgresql",
    "mysql",
    "git",
    "docker",
    "figma",
];

fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, rotation_deg: f32, clockwise: bool) -> String {
    let (s, c) = rotation_deg.to_radians().sin_cos();
    let (x0, y0) = (cx - rx * c, cy - rx * s);
    let (x1, y1) = (cx + rx * c, cy + rx * s);
    let sweep = u8::from(clockwise);
    format!(
        "M{x0} {y0}A{rx} {ry} {rotation_deg} 1 {sweep} {x1} {y1}A{rx} {ry} {rotation_deg} 1 {sweep} {x0} {y0}Z"
    )
}

fn circle(cx: f32, cy: f32, r: f32) -> String {
    ellipse(cx, cy, r, r, 0.0, true)
}

fn hole(cx: f32, cy: f32, r: f32) -> String {
    ellipse(cx, cy, r, r, 0.0, false)
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> String {
    format!("M{x} {y}h{w}v{h}h{}z", -w)
}

fn frame() -> Vec<String> {
    vec![rect(2.0, 2.0, 20.0, 20.0), "M4 4v16h16V4z".into()]
}

fn paths_for(name: &str) -> Option<Vec<String>> {
    let paths = match name {
        "react" => {
            let mut p = vec![circle(12.0, 12.0, 2.0)];
            for deg in [0.0, 60.0, 120.0] {
                p.push(ellipse(12.0, 12.0, 11.0, 4.2, deg, true));
                p.push(ellipse(12.0, 12.0, 9.6, 2.8, deg, false));
            }
            p
        }
        "nextjs" => vec![
            circle(12.0, 12.0, 11.0),
            hole(12.0, 12.0, 9.5),
            rect(8.0, 7.0, 1.6, 10.0),
            rect(14.4, 7.0, 1.6, 10.0),
            "M8 7h1.8l6.2 10h-1.8z".into(),
        ],
        "typescript" => {
            let mut p = frame();
            p.push("M6 10h8v1.8h-3.1V19H9.1v-7.2H6z".into());
            p.push("M15 10h3.5v1.6H16.6v2.2h1.9V19H15v-1.6h1.9v-2.2H15z".into());
            p
        }
        "javascript" => {
            let mut p = frame();
            p.push("M13 9h1.8v7.2a3 3 0 0 1 -3 3h-1v-1.8h1a1.2 1.2 0 0 0 1.2-1.2z".into());
            p
        }
        "tailwind" => vec![
            "M12 6c-2.7 0-4.3 1.3-5 4 1-1.3 2.2-1.8 3.5-1.5.8.2 1.3.8 1.9 1.4 1 1 2.1 2.1 4.6 2.1 2.7 0 4.3-1.3 5-4-1 1.3-2.2 1.8-3.5 1.5-.8-.2-1.3-.8-1.9-1.4C15.6 7.1 14.5 6 12 6z".into(),
            "M7 12c-2.7 0-4.3 1.3-5 4 1-1.3 2.2-1.8 3.5-1.5.8.2 1.3.8 1.9 1.4 1 1 2.1 2.1 4.6 2.1 2.7 0 4.3-1.3 5-4-1 1.3-2.2 1.8-3.5 1.5-.8-.2-1.3-.8-1.9-1.4C10.6 13.1 9.5 12 7 12z".into(),
        ],
        "nodejs" => vec![
            "M12 1.5l9.1 5.25v10.5L12 22.5l-9.1-5.25V6.75z".into(),
            "M12 5L5.9 8.5v7L12 19l6.1-3.5v-7z".into(),
            rect(11.1, 8.5, 1.8, 7.0),
        ],
        "python" => vec![
            "M8 2h7a3 3 0 0 1 3 3v5a3 3 0 0 1 -3 3H9a2 2 0 0 0 -2 2v2H5a3 3 0 0 1 -3 -3v-3a3 3 0 0 1 3 -3h7V7H8z".into(),
            "M16 22h-7a3 3 0 0 1 -3 -3v-5a3 3 0 0 1 3 -3h6a2 2 0 0 0 2 -2V7h2a3 3 0 0 1 3 3v3a3 3 0 0 1 -3 3h-7v1h4z".into(),
            hole(10.5, 4.5, 1.0),
            hole(13.5, 19.5, 1.0),
        ],
        "java" => vec![
            "M5 13h11v3a4 4 0 0 1 -4 4H9a4 4 0 0 1 -4 -4z".into(),
            "M16 14h1.5a2 2 0 0 1 0 4H16v-1.4h1.5a.6.6 0 0 0 0 -1.2H16z".into(),
            "M10 3c2 2-1 3 0 6h-1c-1-3 2-4 0-6z".into(),
            "M13 4c1.5 1.5-.8 2.5 0 4.5h-.9c-.8-2 1.5-3 0-4.5z".into(),
            rect(4.0, 21.0, 13.0, 1.2),
        ],
        "express" => vec![
            "M4 6h7v1.8H6v3.3h4.5v1.8H6v3.3h5V18H4z".into(),
            "M13 9h2.1l2 3 2-3h2.1l-3 4.5 3 4.5h-2.1l-2-3-2 3H13l3-4.5z".into(),
        ],
        "spring" => vec![
            "M20 3C11 3 4 7 4 15c0 2 .6 3.5 1.5 4.5C7 14 11 10 16 8 12 11 8.5 15 7 20.5 8 21 9.4 21 11 21 18 21 21 13 20 3z".into(),
        ],
        "mongodb" => vec![
            "M12 1c3.5 4 5.5 8 5.5 12s-2.5 6.5-5 8c-2.5-1.5-5-4-5-8s2-8 4.5-12z".into(),
            rect(11.4, 19.0, 1.2, 4.0),
        ],
        "postgresql" => vec![
            ellipse(12.0, 10.0, 8.0, 7.0, 0.0, true),
            "M10.5 14h3v6.5a1.5 1.5 0 0 1 -3 0z".into(),
            hole(9.0, 8.5, 1.1),
            hole(15.0, 8.5, 1.1),
        ],
        "mysql" => vec![
            "M3 17c3-8 9-12 18-12-3 2-5 4-5.5 7 2 .5 3.5 2 4.5 4-2-1-4-1.3-6-1C10 15 6 16 3 17z".into(),
            rect(3.0, 19.0, 18.0, 1.5),
        ],
        "git" => vec![
            circle(7.0, 5.0, 2.2),
            circle(7.0, 19.0, 2.2),
            circle(17.0, 9.0, 2.2),
            rect(6.1, 7.0, 1.8, 10.0),
            "M16 10.5l1.3 1.3-8.5 5.5-1-1.5z".into(),
        ],
        "docker" => vec![
            "M2 12h19c.5 0 1 .4.9 1-1 4.5-5 8-10.9 8C6 21 3 18 2 12z".into(),
            rect(4.5, 8.8, 2.8, 2.6),
            rect(7.8, 8.8, 2.8, 2.6),
            rect(11.1, 8.8, 2.8, 2.6),
            rect(7.8, 5.7, 2.8, 2.6),
            rect(11.1, 5.7, 2.8, 2.6),
        ],
        "figma" => vec![
            rect(9.0, 2.0, 6.0, 7.0),
            circle(9.0, 5.5, 3.5),
            circle(15.0, 5.5, 3.5),
            circle(9.0, 12.5, 3.5),
            circle(15.0, 12.5, 3.5),
            circle(9.0, 19.5, 3.5),
        ],
        _ => return None,
    };
    Some(paths)
}

/// Looks up a built-in icon by name.
pub fn builtin(name: &str) -> Option<SvgIcon> {
    paths_for(name).map(|paths| SvgIcon::new(name, ViewBox::square(24.0), paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::IconDescriptor;

    #[test]
    fn every_builtin_parses_into_contours() {
        for name in BUILTIN_NAMES {
            let icon = builtin(name).unwrap_or_else(|| panic!("missing icon {name}"));
            let contours = icon
                .outline(0.1)
                .unwrap_or_else(|e| panic!("icon {name}: {e}"));
            assert!(!contours.is_empty(), "{name}");
        }
    }

    #[test]
    fn unknown_names_have_no_icon() {
        assert!(builtin("cobol").is_none());
    }

    #[test]
    fn builtins_stay_inside_their_view_box() {
        for name in BUILTIN_NAMES {
            let icon = builtin(name).unwrap();
            for contour in icon.outline(0.1).unwrap() {
                for p in contour {
                    assert!(
                        (-0.5..=24.5).contains(&p.x) && (-0.5..=24.5).contains(&p.y),
                        "{name}: {p:?}"
                    );
                }
            }
        }
    }
}
