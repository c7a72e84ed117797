use rand::{rngs::SmallRng, seq::index::sample, seq::SliceRandom};

/// Double bridge: cuts the tour into A B C D and reconnects as A C B D.
/// Tours shorter than 8 nodes come back unchanged.
pub fn double_bridge(route: &[usize], rng: &mut SmallRng) -> Vec<usize> {
    let n = route.len();
    if n < 8 {
        return route.to_vec();
    }
    let mut cuts = sample(rng, n - 1, 3).into_vec();
    cuts.iter_mut().for_each(|c| *c += 1);
    cuts.sort_unstable();
    let (p1, p2, p3) = (cuts[0], cuts[1], cuts[2]);

    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&route[..p1]);
    out.extend_from_slice(&route[p2..p3]);
    out.extend_from_slice(&route[p1..p2]);
    out.extend_from_slice(&route[p3..]);
    out
}

/// Uniformly random tour over `n` nodes.
pub fn random_restart(n: usize, rng: &mut SmallRng) -> Vec<usize> {
    let mut route: Vec<usize> = (0..n).collect();
    route.shuffle(rng);
    route
}
