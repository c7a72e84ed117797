/// Visits points by polar angle around their centroid.
pub fn circle_order(points: &[(f64, f64)]) -> Vec<usize> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
    let mut order: Vec<(f64, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| ((y - cy).atan2(x - cx), i))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    order.into_iter().map(|(_, i)| i).collect()
}

/// Groups points into rows of equal length, sorted by y then x. `None` when the points
/// do not form a full rectangular lattice.
pub fn lattice_rows(points: &[(f64, f64)]) -> Option<Vec<Vec<usize>>> {
    if points.len() < 4 {
        return None;
    }
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.0).min(p.1), hi.max(p.0).max(p.1))
    });
    let tolerance = (hi - lo).abs().max(1.0) * 1e-6;

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| points[a].1.total_cmp(&points[b].1).then(a.cmp(&b)));

    let mut rows: Vec<Vec<usize>> = Vec::new();
    for i in order {
        match rows.last_mut() {
            Some(row) if (points[row[0]].1 - points[i].1).abs() <= tolerance => row.push(i),
            _ => rows.push(vec![i]),
        }
    }
    for row in rows.iter_mut() {
        row.sort_by(|&a, &b| points[a].0.total_cmp(&points[b].0).then(a.cmp(&b)));
    }
    let cols = rows[0].len();
    if rows.len() < 2 || cols < 2 || rows.iter().any(|r| r.len() != cols) {
        return None;
    }
    let aligned = (0..cols).all(|c| {
        rows.iter()
            .all(|r| (points[r[c]].0 - points[rows[0][c]].0).abs() <= tolerance)
    });
    aligned.then_some(rows)
}

/// Closed serpentine over a lattice: across the first row, snake back through the
/// remaining columns, and return up the first column. Exact when a side is even.
pub fn grid_order(points: &[(f64, f64)]) -> Option<Vec<usize>> {
    let mut rows = lattice_rows(points)?;
    let (r, c) = (rows.len(), rows[0].len());
    if r % 2 == 1 && c % 2 == 0 {
        rows = (0..c).map(|j| rows.iter().map(|row| row[j]).collect()).collect();
    }
    let r = rows.len();

    let mut route: Vec<usize> = rows[0].clone();
    for (i, row) in rows.iter().enumerate().skip(1) {
        let body = &row[1..];
        if i % 2 == 1 {
            route.extend(body.iter().rev());
        } else {
            route.extend(body.iter());
        }
    }
    route.extend((1..r).rev().map(|i| rows[i][0]));
    Some(route)
}
