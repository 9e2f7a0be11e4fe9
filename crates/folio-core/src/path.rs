//! SVG path data: parsing into absolute commands and flattening into
//! polylines for the polygon filler.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::error::FolioError;

/// A path command with every coordinate made absolute and every shorthand
/// (`H`, `V`, `S`, `T`) expanded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo {
        ctrl: Vec2,
        to: Vec2,
    },
    CubicTo {
        ctrl1: Vec2,
        ctrl2: Vec2,
        to: Vec2,
    },
    ArcTo {
        radii: Vec2,
        x_rotation: f32,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
    Close,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> FolioError {
        FolioError::MalformedPath {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.src.len()
    }

    fn next_is_number(&mut self) -> bool {
        self.skip_separators();
        matches!(self.peek(), Some(b'0'..=b'9' | b'-' | b'+' | b'.'))
    }

    fn command(&mut self) -> Option<u8> {
        self.skip_separators();
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E') => {
                self.pos += 1;
                Some(b)
            }
            _ => None,
        }
    }

    fn number(&mut self) -> Result<f32, FolioError> {
        self.skip_separators();
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut end = start;
        if matches!(bytes.get(end), Some(b'-' | b'+')) {
            end += 1;
        }
        let mut digits = 0;
        while matches!(bytes.get(end), Some(b'0'..=b'9')) {
            end += 1;
            digits += 1;
        }
        if bytes.get(end) == Some(&b'.') {
            end += 1;
            while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                end += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return Err(self.error("expected number"));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'-' | b'+')) {
                exp += 1;
            }
            let exp_digits_start = exp;
            while matches!(bytes.get(exp), Some(b'0'..=b'9')) {
                exp += 1;
            }
            if exp > exp_digits_start {
                end = exp;
            }
        }
        let value: f32 = self.src[start..end]
            .parse()
            .map_err(|_| self.error("invalid number"))?;
        if !value.is_finite() {
            return Err(self.error("number out of range"));
        }
        self.pos = end;
        Ok(value)
    }

    /// Arc flags may be packed without separators (`a1 1 0 0110 10`).
    fn flag(&mut self) -> Result<bool, FolioError> {
        self.skip_separators();
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected arc flag 0 or 1")),
        }
    }

    fn point(&mut self) -> Result<Vec2, FolioError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Vec2::new(x, y))
    }
}

/// Parses SVG path data into absolute commands.
pub fn parse_path(data: &str) -> Result<Vec<PathCommand>, FolioError> {
    let mut lex = Lexer::new(data);
    let mut out = Vec::new();
    let mut current = Vec2::ZERO;
    let mut subpath_start = Vec2::ZERO;
    // last cubic / quadratic control point, for S and T reflection
    let mut last_cubic: Option<Vec2> = None;
    let mut last_quad: Option<Vec2> = None;
    let mut command: Option<u8> = None;

    while !lex.at_end() {
        let cmd = match lex.command() {
            Some(c) => c,
            None => match command {
                // bare numbers repeat the previous command; moveto repeats as lineto
                Some(b'M') => b'L',
                Some(b'm') => b'l',
                Some(c) if !matches!(c, b'Z' | b'z') && lex.next_is_number() => c,
                _ => return Err(lex.error("expected command")),
            },
        };
        if out.is_empty() && !matches!(cmd, b'M' | b'm') {
            return Err(lex.error("path must start with a moveto"));
        }
        let relative = cmd.is_ascii_lowercase();
        let base = if relative { current } else { Vec2::ZERO };
        let mut next_cubic = None;
        let mut next_quad = None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                current = base + lex.point()?;
                subpath_start = current;
                out.push(PathCommand::MoveTo(current));
            }
            b'L' => {
                current = base + lex.point()?;
                out.push(PathCommand::LineTo(current));
            }
            b'H' => {
                let x = lex.number()?;
                current.x = if relative { current.x + x } else { x };
                out.push(PathCommand::LineTo(current));
            }
            b'V' => {
                let y = lex.number()?;
                current.y = if relative { current.y + y } else { y };
                out.push(PathCommand::LineTo(current));
            }
            b'C' => {
                let ctrl1 = base + lex.point()?;
                let ctrl2 = base + lex.point()?;
                let to = base + lex.point()?;
                out.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
                next_cubic = Some(ctrl2);
                current = to;
            }
            b'S' => {
                let ctrl1 = last_cubic.map_or(current, |c| current * 2.0 - c);
                let ctrl2 = base + lex.point()?;
                let to = base + lex.point()?;
                out.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
                next_cubic = Some(ctrl2);
                current = to;
            }
            b'Q' => {
                let ctrl = base + lex.point()?;
                let to = base + lex.point()?;
                out.push(PathCommand::QuadTo { ctrl, to });
                next_quad = Some(ctrl);
                current = to;
            }
            b'T' => {
                let ctrl = last_quad.map_or(current, |c| current * 2.0 - c);
                let to = base + lex.point()?;
                out.push(PathCommand::QuadTo { ctrl, to });
                next_quad = Some(ctrl);
                current = to;
            }
            b'A' => {
                let radii = Vec2::new(lex.number()?, lex.number()?);
                let x_rotation = lex.number()?;
                let large_arc = lex.flag()?;
                let sweep = lex.flag()?;
                let to = base + lex.point()?;
                out.push(PathCommand::ArcTo {
                    radii,
                    x_rotation,
                    large_arc,
                    sweep,
                    to,
                });
                current = to;
            }
            b'Z' => {
                out.push(PathCommand::Close);
                current = subpath_start;
            }
            other => {
                lex.pos -= 1;
                return Err(lex.error(format!("unknown command '{}'", other as char)));
            }
        }
        last_cubic = next_cubic;
        last_quad = next_quad;
        command = Some(cmd);
    }
    Ok(out)
}

fn segments_for(control_len: f32, tolerance: f32) -> usize {
    ((control_len / tolerance.max(1e-3)).sqrt().ceil() as usize).clamp(2, 128)
}

#[allow(clippy::too_many_arguments)]
fn flatten_arc(
    out: &mut Vec<Vec2>,
    from: Vec2,
    radii: Vec2,
    x_rotation: f32,
    large_arc: bool,
    sweep: bool,
    to: Vec2,
    tolerance: f32,
) {
    let (mut rx, mut ry) = (radii.x.abs(), radii.y.abs());
    if from == to {
        return;
    }
    if rx == 0.0 || ry == 0.0 {
        out.push(to);
        return;
    }
    let phi = x_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let half = (from - to) * 0.5;
    let p = Vec2::new(
        cos_phi * half.x + sin_phi * half.y,
        -sin_phi * half.x + cos_phi * half.y,
    );

    let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }
    let num = rx * rx * ry * ry - rx * rx * p.y * p.y - ry * ry * p.x * p.x;
    let den = rx * rx * p.y * p.y + ry * ry * p.x * p.x;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }
    let c_prime = Vec2::new(coef * rx * p.y / ry, -coef * ry * p.x / rx);
    let mid = (from + to) * 0.5;
    let center = Vec2::new(
        cos_phi * c_prime.x - sin_phi * c_prime.y + mid.x,
        sin_phi * c_prime.x + cos_phi * c_prime.y + mid.y,
    );

    let angle = |u: Vec2, v: Vec2| (u.x * v.y - u.y * v.x).atan2(u.dot(v));
    let u = Vec2::new((p.x - c_prime.x) / rx, (p.y - c_prime.y) / ry);
    let v = Vec2::new((-p.x - c_prime.x) / rx, (-p.y - c_prime.y) / ry);
    let theta1 = angle(Vec2::X, u);
    let mut delta = angle(u, v) % TAU;
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    let n = segments_for(rx.max(ry) * delta.abs(), tolerance);
    for i in 1..n {
        let theta = theta1 + delta * i as f32 / n as f32;
        let (s, c) = theta.sin_cos();
        out.push(Vec2::new(
            center.x + rx * c * cos_phi - ry * s * sin_phi,
            center.y + rx * c * sin_phi + ry * s * cos_phi,
        ));
    }
    out.push(to);
}

/// Flattens commands into closed polylines (one per subpath). `tolerance`
/// is in path units; smaller values produce more segments per curve.
pub fn flatten(commands: &[PathCommand], tolerance: f32) -> Vec<Vec<Vec2>> {
    let mut contours: Vec<Vec<Vec2>> = Vec::new();
    let mut current_contour: Vec<Vec2> = Vec::new();
    let mut current = Vec2::ZERO;
    let mut start = Vec2::ZERO;

    let finish = |contour: &mut Vec<Vec2>, contours: &mut Vec<Vec<Vec2>>| {
        if contour.len() >= 2 {
            contours.push(std::mem::take(contour));
        } else {
            contour.clear();
        }
    };

    for cmd in commands {
        if !matches!(cmd, PathCommand::MoveTo(_) | PathCommand::Close) && current_contour.is_empty()
        {
            current_contour.push(current);
        }
        match *cmd {
            PathCommand::MoveTo(p) => {
                finish(&mut current_contour, &mut contours);
                current_contour.push(p);
                current = p;
                start = p;
            }
            PathCommand::LineTo(p) => {
                current_contour.push(p);
                current = p;
            }
            PathCommand::QuadTo { ctrl, to } => {
                let n = segments_for(current.distance(ctrl) + ctrl.distance(to), tolerance);
                for i in 1..=n {
                    let t = i as f32 / n as f32;
                    let mt = 1.0 - t;
                    current_contour.push(current * mt * mt + ctrl * 2.0 * mt * t + to * t * t);
                }
                current = to;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let len = current.distance(ctrl1) + ctrl1.distance(ctrl2) + ctrl2.distance(to);
                let n = segments_for(len, tolerance);
                for i in 1..=n {
                    let t = i as f32 / n as f32;
                    let mt = 1.0 - t;
                    current_contour.push(
                        current * mt * mt * mt
                            + ctrl1 * 3.0 * mt * mt * t
                            + ctrl2 * 3.0 * mt * t * t
                            + to * t * t * t,
                    );
                }
                current = to;
            }
            PathCommand::ArcTo {
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => {
                flatten_arc(
                    &mut current_contour,
                    current,
                    radii,
                    x_rotation,
                    large_arc,
                    sweep,
                    to,
                    tolerance,
                );
                current = to;
            }
            PathCommand::Close => {
                finish(&mut current_contour, &mut contours);
                current = start;
            }
        }
    }
    finish(&mut current_contour, &mut contours);
    contours
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_and_relative_lines() {
        let cmds = parse_path("M10 10 l5 0 L20,20 h-5 v-3 z").unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(Vec2::new(10.0, 10.0)),
                PathCommand::LineTo(Vec2::new(15.0, 10.0)),
                PathCommand::LineTo(Vec2::new(20.0, 20.0)),
                PathCommand::LineTo(Vec2::new(15.0, 20.0)),
                PathCommand::LineTo(Vec2::new(15.0, 17.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn extra_moveto_pairs_become_lines() {
        let cmds = parse_path("m1 1 2 2 3 3").unwrap();
        assert_eq!(cmds[1], PathCommand::LineTo(Vec2::new(3.0, 3.0)));
        assert_eq!(cmds[2], PathCommand::LineTo(Vec2::new(6.0, 6.0)));
    }

    #[test]
    fn compact_numbers_and_exponents() {
        let cmds = parse_path("M.5-1.5L1e1,2E-1").unwrap();
        assert_eq!(cmds[0], PathCommand::MoveTo(Vec2::new(0.5, -1.5)));
        assert_eq!(cmds[1], PathCommand::LineTo(Vec2::new(10.0, 0.2)));
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let cmds = parse_path("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        match cmds[2] {
            PathCommand::CubicTo { ctrl1, .. } => assert_eq!(ctrl1, Vec2::new(10.0, -10.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn packed_arc_flags() {
        let cmds = parse_path("M0 0a5 5 0 105 5").unwrap();
        match cmds[1] {
            PathCommand::ArcTo {
                large_arc,
                sweep,
                to,
                ..
            } => {
                assert!(large_arc);
                assert!(!sweep);
                assert_eq!(to, Vec2::new(5.0, 5.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reports_offset_of_bad_token() {
        let err = parse_path("M0 0 L5 x").unwrap_err();
        assert_eq!(
            err,
            FolioError::MalformedPath {
                offset: 8,
                reason: "expected number".into()
            }
        );
        assert!(parse_path("L1 1").is_err());
        assert!(parse_path("M1 1 K2 2").is_err());
    }

    #[test]
    fn empty_data_is_no_commands() {
        assert!(parse_path("  ").unwrap().is_empty());
    }

    #[test]
    fn circle_from_two_arcs_flattens_onto_radius() {
        let cmds = parse_path("M2 12a10 10 0 1 0 20 0a10 10 0 1 0 -20 0z").unwrap();
        let contours = flatten(&cmds, 0.1);
        assert_eq!(contours.len(), 1);
        let center = Vec2::new(12.0, 12.0);
        for p in &contours[0] {
            assert!((p.distance(center) - 10.0).abs() < 1e-3, "{p:?}");
        }
        assert!(contours[0].len() > 16);
    }

    #[test]
    fn each_subpath_is_its_own_contour() {
        let cmds = parse_path("M0 0h4v4h-4z M10 10h4v4h-4z").unwrap();
        let contours = flatten(&cmds, 0.5);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[1][0], Vec2::new(10.0, 10.0));
    }

    #[test]
    fn cubic_ends_on_its_endpoint() {
        let cmds = parse_path("M0 0C0 10 10 10 10 0").unwrap();
        let contour = &flatten(&cmds, 0.25)[0];
        assert_eq!(*contour.last().unwrap(), Vec2::new(10.0, 0.0));
    }
}
