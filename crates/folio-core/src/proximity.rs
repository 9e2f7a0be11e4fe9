//! Proximity graph: which particle pairs are close enough to be connected.
//!
//! Every unordered pair is visited exactly once (`j > i`), so the scan is
//! `n * (n - 1) / 2` distance checks per frame.

use glam::Vec2;

use crate::particle::Particle;

/// One drawn connection between particles `a` and `b` (`a < b`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// `(1 - distance / threshold) * max_opacity`, zero at or past the threshold.
pub fn edge_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if !(threshold > 0.0) || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance / threshold) * max_opacity
}

/// Lazily yields every pair closer than `threshold`.
pub struct Edges<'a> {
    particles: &'a [Particle],
    threshold: f32,
    max_opacity: f32,
    i: usize,
    j: usize,
}

impl<'a> Iterator for Edges<'a> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        let n = self.particles.len();
        while self.i < n {
            if self.j >= n {
                self.i += 1;
                self.j = self.i + 1;
                continue;
            }
            let (i, j) = (self.i, self.j);
            self.j += 1;
            let distance = self.particles[i]
                .position
                .distance(self.particles[j].position);
            if distance < self.threshold {
                return Some(Edge {
                    a: i,
                    b: j,
                    distance,
                    opacity: edge_opacity(distance, self.threshold, self.max_opacity),
                });
            }
        }
        None
    }
}

pub fn edges(particles: &[Particle], threshold: f32, max_opacity: f32) -> Edges<'_> {
    Edges {
        particles,
        threshold,
        max_opacity,
        i: 0,
        j: 1,
    }
}

/// Edge endpoints in drawing order, start at particle `a`.
pub fn edge_segment(particles: &[Particle], edge: &Edge) -> (Vec2, Vec2) {
    (particles[edge.a].position, particles[edge.b].position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f32]) -> Vec<Particle> {
        xs.iter().map(|&x| Particle::at(Vec2::new(x, 0.0))).collect()
    }

    #[test]
    fn opacity_fades_linearly_to_zero() {
        assert!((edge_opacity(0.0, 180.0, 0.4) - 0.4).abs() < 1e-6);
        assert!((edge_opacity(90.0, 180.0, 0.4) - 0.2).abs() < 1e-6);
        assert_eq!(edge_opacity(180.0, 180.0, 0.4), 0.0);
        assert_eq!(edge_opacity(500.0, 180.0, 0.4), 0.0);
    }

    #[test]
    fn each_close_pair_once_and_no_self_pairs() {
        // 0-100 close, 100-250 close, 0-250 too far, 1000 isolated
        let ps = line(&[0.0, 100.0, 250.0, 1000.0]);
        let found: Vec<(usize, usize)> = edges(&ps, 180.0, 0.4).map(|e| (e.a, e.b)).collect();
        assert_eq!(found, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn empty_and_single_pools_have_no_edges() {
        assert_eq!(edges(&[], 180.0, 0.4).count(), 0);
        assert_eq!(edges(&line(&[5.0]), 180.0, 0.4).count(), 0);
    }

    #[test]
    fn coincident_particles_connect_at_full_opacity() {
        let ps = line(&[10.0, 10.0]);
        let e: Vec<Edge> = edges(&ps, 180.0, 0.4).collect();
        assert_eq!(e.len(), 1);
        assert!((e[0].opacity - 0.4).abs() < 1e-6);
    }
}
