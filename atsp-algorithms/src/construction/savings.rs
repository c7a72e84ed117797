use crate::problem::Problem;

const DEPOT: usize = 0;

/// Directed Clarke-Wright savings around node 0. Linking `i -> j` saves
/// `c(i, 0) + c(0, j) - c(i, j)`. Links are drawn from the successor lists in order of
/// decreasing saving; the path fragments left over are chained greedily from the depot.
pub fn savings(problem: &Problem) -> Vec<usize> {
    let n = problem.size();
    if n < 3 {
        return (0..n).collect();
    }
    let matrix = problem.matrix();

    let mut links: Vec<(f64, usize, usize)> = Vec::new();
    for i in 1..n {
        for &j in problem.candidates.successors(i) {
            if j != DEPOT {
                let saving = matrix.c(i, DEPOT) + matrix.c(DEPOT, j) - matrix.c(i, j);
                links.push((saving, i, j));
            }
        }
    }
    links.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut next: Vec<Option<usize>> = vec![None; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    // for a fragment endpoint, the fragment's other endpoint
    let mut end: Vec<usize> = (0..n).collect();
    for (_, i, j) in links {
        if next[i].is_some() || prev[j].is_some() || end[i] == j {
            continue;
        }
        next[i] = Some(j);
        prev[j] = Some(i);
        let (head, tail) = (end[i], end[j]);
        end[head] = tail;
        end[tail] = head;
    }

    let mut heads: Vec<usize> = (1..n).filter(|&v| prev[v].is_none()).collect();
    let mut route = Vec::with_capacity(n);
    route.push(DEPOT);
    let mut current = DEPOT;
    while !heads.is_empty() {
        let k = (0..heads.len())
            .min_by(|&a, &b| {
                matrix
                    .c(current, heads[a])
                    .total_cmp(&matrix.c(current, heads[b]))
                    .then(heads[a].cmp(&heads[b]))
            })
            .unwrap_or(0);
        let mut v = heads.swap_remove(k);
        loop {
            route.push(v);
            current = v;
            match next[v] {
                Some(w) => v = w,
                None => break,
            }
        }
    }
    route
}
