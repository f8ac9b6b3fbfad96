//! Vectorized expression evaluation using Arrow SIMD kernels

use arrow::array::{AsArray, Float64Array, Scalar};
use arrow::compute::kernels::numeric;
use arrow::datatypes::Float64Type;

use crate::error::TaxiResult;
use crate::types::Point;

/// Squared planar distance (in degrees²) from `center` to every `(xs[i], ys[i])`:
///   (x - center.longitude)² + (y - center.latitude)²
pub fn squared_distance(
    xs: &Float64Array,
    ys: &Float64Array,
    center: Point,
) -> TaxiResult<Float64Array> {
    let cx = Scalar::new(Float64Array::from(vec![center.longitude]));
    let cy = Scalar::new(Float64Array::from(vec![center.latitude]));

    // Vectorized: x - cx, y - cy
    let dx_arc = numeric::sub(xs, &cx)?;
    let dx = dx_arc.as_primitive::<Float64Type>();
    let dy_arc = numeric::sub(ys, &cy)?;
    let dy = dy_arc.as_primitive::<Float64Type>();

    // Vectorized: dx² + dy²
    let dx2 = numeric::mul(dx, dx)?;
    let dy2 = numeric::mul(dy, dy)?;
    let sum = numeric::add(&dx2, &dy2)?;

    Ok(sum.as_primitive::<Float64Type>().clone())
}
