use crate::Error;

/// Get the value at `x` of the piecewise linear function going through all
/// the `(xs[i], ys[i])` points.
///
/// The points do not need to be sorted. `x` must be inside the range covered
/// by `xs`, no extrapolation is performed.
pub fn linear_interpolated_value(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, Error> {
    if xs.len() != ys.len() {
        return Err(Error::InvalidParameter(format!(
            "got {} x values but {} y values for linear interpolation", xs.len(), ys.len()
        )));
    }

    if xs.len() < 2 {
        return Err(Error::InvalidParameter(format!(
            "linear interpolation requires at least 2 points, got {}", xs.len()
        )));
    }

    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(Error::InvalidParameter(
            "linear interpolation table contains non-finite values".into()
        ));
    }

    let mut table = xs.iter().copied().zip(ys.iter().copied()).collect::<Vec<_>>();
    table.sort_by(|a, b| a.0.total_cmp(&b.0));

    let first = table[0].0;
    let last = table[table.len() - 1].0;
    if !(x >= first && x <= last) {
        return Err(Error::Domain(format!(
            "can not interpolate at x={}, values are only available between {} and {}",
            x, first, last
        )));
    }

    // first point strictly after x, or the last point
    let upper = table.partition_point(|&(value, _)| value <= x).min(table.len() - 1);
    let (x_1, y_1) = table[upper];
    let (x_0, y_0) = table[upper - 1];

    if x_1 == x_0 {
        return Ok(y_0);
    }

    return Ok(y_0 + (y_1 - y_0) * (x - x_0) / (x_1 - x_0));
}
