/// Downsample `series` to at most `target` points. First and last samples
/// are kept as-is; interior points are bucket averages.
pub fn resample(series: &[f64], target: usize) -> Vec<f64> {
    if target == 0 || series.is_empty() {
        return Vec::new();
    }
    if series.len() <= target {
        return series.to_vec();
    }
    if target == 1 {
        return vec![series[series.len() - 1]];
    }

    let interior = &series[1..series.len() - 1];
    let buckets = target - 2;
    let mut out = Vec::with_capacity(target);
    out.push(series[0]);
    for i in 0..buckets {
        let start = i * interior.len() / buckets;
        let end = ((i + 1) * interior.len() / buckets).max(start + 1);
        let bucket = &interior[start..end];
        out.push(bucket.iter().sum::<f64>() / bucket.len() as f64);
    }
    out.push(series[series.len() - 1]);
    out
}

const MAX_TICKS: usize = 50;

fn nice_number(x: f64, round: bool) -> f64 {
    let exp = x.log10().floor();
    let fraction = x / 10f64.powf(exp);
    let nice = if round {
        if fraction < 1.5 { 1.0 } else if fraction < 3.0 { 2.0 } else if fraction < 7.0 { 5.0 } else { 10.0 }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * 10f64.powf(exp)
}

/// Axis ticks on a 1/2/5×10ⁿ step that cover `[min, max]` with roughly
/// `count` divisions.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if min == max {
        return vec![min];
    }

    let span = max - min;
    if !span.is_finite() {
        return Vec::new();
    }

    let count = count.clamp(2, MAX_TICKS);
    let range = nice_number(span, false);
    let step = nice_number(range / (count - 1) as f64, true);
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let lo = (min / step).floor() * step;
    let hi = (max / step).ceil() * step;
    let divisions = ((hi - lo) / step).round();
    if !divisions.is_finite() || divisions > (2 * MAX_TICKS) as f64 {
        return Vec::new();
    }
    let n = divisions as usize;

    let decimals = (-step.log10().floor()).max(0.0) as i32;
    let scale = 10f64.powi(decimals);
    (0..=n)
        .map(|i| ((lo + i as f64 * step) * scale).round() / scale)
        .collect()
}
