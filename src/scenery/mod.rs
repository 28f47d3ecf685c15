//! Static scenery placed once at startup: signal posts and roadside trees

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Grid spacing between tree candidates
const TREE_SPACING: f32 = 50.0;
/// Trees are planted out to this distance along each axis
const FOREST_EXTENT: f32 = 1000.0;
/// First grid line away from the roads
const FOREST_INNER_EDGE: f32 = 20.0;
/// Minimum distance from either road centerline
const ROAD_CLEARANCE: f32 = 15.0;
/// Minimum distance from any signal post
const SIGNAL_CLEARANCE: f32 = 20.0;

/// Which approach a signal post displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// North-south traffic
    A,
    /// West-east traffic
    B,
}

/// A signal head on one corner of the intersection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalPost {
    pub x: f32,
    pub z: f32,
    /// Yaw in degrees applied by the renderer
    pub rotation: f32,
    pub approach: Approach,
}

pub const SIGNAL_POSTS: [SignalPost; 4] = [
    // North-east
    SignalPost {
        x: 10.0,
        z: -10.5,
        rotation: 0.0,
        approach: Approach::A,
    },
    // South-west
    SignalPost {
        x: -10.0,
        z: 10.5,
        rotation: 180.0,
        approach: Approach::A,
    },
    // South-east
    SignalPost {
        x: 10.0,
        z: 10.5,
        rotation: -90.0,
        approach: Approach::B,
    },
    // North-west
    SignalPost {
        x: -10.0,
        z: -10.5,
        rotation: 90.0,
        approach: Approach::B,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeInstance {
    pub x: f32,
    pub z: f32,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
}

impl TreeInstance {
    fn distance_sq_from_origin(&self) -> f32 {
        self.x * self.x + self.z * self.z
    }
}

/// True when a tree at (x, z) would crowd a signal post
pub fn is_near_signal(x: f32, z: f32) -> bool {
    SIGNAL_POSTS.iter().any(|post| {
        let dx = x - post.x;
        let dz = z - post.z;
        (dx * dx + dz * dz).sqrt() < SIGNAL_CLEARANCE
    })
}

pub fn is_valid_tree_position(x: f32, z: f32) -> bool {
    if x.abs() < ROAD_CLEARANCE || z.abs() < ROAD_CLEARANCE {
        return false;
    }
    !is_near_signal(x, z)
}

/// Scatter trees over the four quadrants around the intersection.
///
/// Deterministic for a given seed.
pub fn generate_trees(seed: u64) -> Vec<TreeInstance> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut trees = Vec::new();

    for quadrant in 0..4u8 {
        let (x_start, x_end) = quadrant_span(quadrant & 1 != 0);
        let (z_start, z_end) = quadrant_span(quadrant & 2 != 0);

        let mut x = x_start;
        while x < x_end {
            let mut z = z_start;
            while z < z_end {
                let tree_x = x + rng.gen_range(-10..10) as f32;
                let tree_z = z + rng.gen_range(-10..10) as f32;

                if is_valid_tree_position(tree_x, tree_z) {
                    trees.push(TreeInstance {
                        x: tree_x,
                        z: tree_z,
                        rotation: rng.gen_range(0..360) as f32,
                        scale: 0.8 + rng.gen_range(0..4) as f32 * 0.1,
                    });
                }
                z += TREE_SPACING;
            }
            x += TREE_SPACING;
        }
    }

    trees
}

fn quadrant_span(positive: bool) -> (f32, f32) {
    if positive {
        (FOREST_INNER_EDGE, FOREST_EXTENT)
    } else {
        (-FOREST_EXTENT, -FOREST_INNER_EDGE)
    }
}

/// Order trees farthest-first from the origin for blended drawing
pub fn sort_back_to_front(trees: &mut [TreeInstance]) {
    trees.sort_by(|a, b| b.distance_sq_from_origin().total_cmp(&a.distance_sq_from_origin()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        assert_eq!(generate_trees(42), generate_trees(42));
        assert_ne!(generate_trees(1), generate_trees(2));
    }

    #[test]
    fn trees_keep_clear_of_roads_and_signals() {
        let trees = generate_trees(9);
        assert!(trees.len() > 1000);
        for tree in &trees {
            assert!(tree.x.abs() >= ROAD_CLEARANCE && tree.z.abs() >= ROAD_CLEARANCE);
            assert!(!is_near_signal(tree.x, tree.z));
            assert!((0.0..360.0).contains(&tree.rotation));
            assert!(tree.scale >= 0.8 - 1e-6 && tree.scale <= 1.1 + 1e-6);
        }
    }

    #[test]
    fn every_quadrant_is_planted() {
        let trees = generate_trees(3);
        for (sx, sz) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
            assert!(trees.iter().any(|t| t.x.signum() == sx && t.z.signum() == sz));
        }
    }

    #[test]
    fn signal_clearance() {
        assert!(is_near_signal(15.0, -15.0));
        assert!(!is_valid_tree_position(12.0, 40.0));
        assert!(is_valid_tree_position(40.0, 40.0));
    }

    #[test]
    fn sorted_farthest_first() {
        let mut trees = generate_trees(5);
        sort_back_to_front(&mut trees);
        for pair in trees.windows(2) {
            assert!(pair[0].distance_sq_from_origin() >= pair[1].distance_sq_from_origin());
        }
    }

    #[test]
    fn posts_split_between_approaches() {
        let a = SIGNAL_POSTS.iter().filter(|p| p.approach == Approach::A).count();
        assert_eq!(a, 2);
    }
}
