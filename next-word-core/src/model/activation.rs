pub(crate) fn sigmoid(x: f32) -> f32 {
	1.0 / (1.0 + (-x).exp())
}

/// Numerically stable softmax, in place.
pub(crate) fn softmax(values: &mut [f32]) {
	let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let mut sum = 0.0;
	for v in values.iter_mut() {
		*v = (*v - max).exp();
		sum += *v;
	}
	if sum > 0.0 {
		for v in values.iter_mut() {
			*v /= sum;
		}
	}
}
