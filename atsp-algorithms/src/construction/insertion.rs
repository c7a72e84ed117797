use atsp_challenges::CostMatrix;

/// Index at which inserting `v` into the closed `route` adds the least directed cost.
fn cheapest_position(matrix: &CostMatrix, route: &[usize], v: usize) -> usize {
    let len = route.len();
    let mut best_pos = 0;
    let mut best_delta = f64::INFINITY;
    for pos in 0..len {
        let a = route[pos];
        let b = route[(pos + 1) % len];
        let delta = matrix.c(a, v) + matrix.c(v, b) - matrix.c(a, b);
        if delta < best_delta {
            best_delta = delta;
            best_pos = pos;
        }
    }
    best_pos + 1
}

/// Farthest insertion in O(n^2). Each unvisited node tracks its distance to the nearest
/// sub-tour node; the farthest one is inserted where it adds the least directed cost.
pub fn farthest_insertion(matrix: &CostMatrix) -> Vec<usize> {
    let n = matrix.size();
    if n < 3 {
        return (0..n).collect();
    }
    let dist = |i: usize, j: usize| matrix.c(i, j).min(matrix.c(j, i));

    let mut in_tour = vec![false; n];
    let mut far = 1;
    for j in 2..n {
        if dist(0, j) > dist(0, far) {
            far = j;
        }
    }
    let mut route = vec![0, far];
    in_tour[0] = true;
    in_tour[far] = true;

    let mut nearest: Vec<f64> = (0..n).map(|v| dist(0, v).min(dist(far, v))).collect();

    while route.len() < n {
        let mut pick = usize::MAX;
        for v in 0..n {
            if !in_tour[v] && (pick == usize::MAX || nearest[v] > nearest[pick]) {
                pick = v;
            }
        }
        let at = cheapest_position(matrix, &route, pick);
        route.insert(at, pick);
        in_tour[pick] = true;

        for v in 0..n {
            if !in_tour[v] {
                nearest[v] = nearest[v].min(dist(pick, v));
            }
        }
    }
    route
}

/// Nearest addition: grows the tour from `start` by the unvisited node with the cheapest
/// edge out of any tour node, inserted at its cheapest directed position.
pub fn nearest_addition(matrix: &CostMatrix, start: usize) -> Vec<usize> {
    let n = matrix.size();
    if n < 3 {
        return (0..n).collect();
    }
    let mut route = vec![start];
    let mut in_tour = vec![false; n];
    in_tour[start] = true;
    let mut nearest: Vec<f64> = (0..n).map(|v| matrix.c(start, v)).collect();

    while route.len() < n {
        let mut pick = usize::MAX;
        for v in 0..n {
            if !in_tour[v] && (pick == usize::MAX || nearest[v] < nearest[pick]) {
                pick = v;
            }
        }
        let at = cheapest_position(matrix, &route, pick);
        route.insert(at, pick);
        in_tour[pick] = true;

        for v in 0..n {
            if !in_tour[v] {
                nearest[v] = nearest[v].min(matrix.c(pick, v));
            }
        }
    }
    route
}

/// Cheapest insertion from the triangle of `start` and its two cheapest successors.
/// Each unvisited node caches its cheapest directed insertion edge, keyed by the edge's
/// tail; only nodes whose cached edge was split by the last insertion rescan the tour.
pub fn cheapest_insertion(matrix: &CostMatrix, start: usize) -> Vec<usize> {
    let n = matrix.size();
    if n < 3 {
        return (0..n).collect();
    }
    let mut order: Vec<usize> = (0..n).filter(|&j| j != start).collect();
    order.sort_by(|&a, &b| {
        matrix
            .c(start, a)
            .total_cmp(&matrix.c(start, b))
            .then(a.cmp(&b))
    });
    let (first, second) = (order[0], order[1]);

    // next[v] is the successor of tour node v
    let mut next = vec![usize::MAX; n];
    next[start] = first;
    next[first] = second;
    next[second] = start;
    let mut members = vec![start, first, second];
    let mut in_tour = vec![false; n];
    for &v in &members {
        in_tour[v] = true;
    }

    let increase = |tail: usize, head: usize, v: usize| {
        matrix.c(tail, v) + matrix.c(v, head) - matrix.c(tail, head)
    };
    let scan = |members: &[usize], next: &[usize], v: usize| -> (f64, usize) {
        let mut best = (f64::INFINITY, usize::MAX);
        for &tail in members {
            let delta = increase(tail, next[tail], v);
            if delta < best.0 {
                best = (delta, tail);
            }
        }
        best
    };
    let mut best: Vec<(f64, usize)> = (0..n)
        .map(|v| {
            if in_tour[v] {
                (f64::INFINITY, usize::MAX)
            } else {
                scan(&members, &next, v)
            }
        })
        .collect();

    while members.len() < n {
        let mut pick = usize::MAX;
        for v in 0..n {
            if !in_tour[v] && (pick == usize::MAX || best[v].0 < best[pick].0) {
                pick = v;
            }
        }
        let tail = match best[pick].1 {
            usize::MAX => start,
            t => t,
        };
        let head = next[tail];
        next[tail] = pick;
        next[pick] = head;
        in_tour[pick] = true;
        members.push(pick);

        for v in 0..n {
            if in_tour[v] {
                continue;
            }
            if best[v].1 == tail {
                best[v] = scan(&members, &next, v);
            } else {
                for t in [tail, pick] {
                    let delta = increase(t, next[t], v);
                    if delta < best[v].0 {
                        best[v] = (delta, t);
                    }
                }
            }
        }
    }

    let mut route = Vec::with_capacity(n);
    let mut v = start;
    for _ in 0..n {
        route.push(v);
        v = next[v];
    }
    route
}
