use ndarray::{s, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::activation::sigmoid;
use crate::error::ModelError;

/// One LSTM layer, gates ordered i, f, c, o along the columns.
///
/// For `units` hidden units and an input of size `input_size`:
///   z_t = x_t · kernel + h_{t-1} · recurrent_kernel + bias
///   i = σ(z_i), f = σ(z_f), g = tanh(z_c), o = σ(z_o)
///   c_t = f * c_{t-1} + i * g
///   h_t = o * tanh(c_t)
///
/// ## Invariants
/// - `kernel` is `[input_size, 4 * units]`
/// - `recurrent_kernel` is `[units, 4 * units]`
/// - `bias` is `[4 * units]`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LstmLayer {
	kernel: Array2<f32>,
	recurrent_kernel: Array2<f32>,
	bias: Array1<f32>,
}

impl LstmLayer {
	/// Creates a layer from its trained weights.
	///
	/// The number of units is a quarter of the bias length.
	///
	/// # Errors
	/// Returns an error if the shapes do not chain together.
	pub fn new(kernel: Array2<f32>, recurrent_kernel: Array2<f32>, bias: Array1<f32>) -> Result<Self, ModelError> {
		let layer = Self { kernel, recurrent_kernel, bias };
		layer.validate()?;
		Ok(layer)
	}

	/// Checks every weight shape against the bias length.
	pub(crate) fn validate(&self) -> Result<(), ModelError> {
		let gates = self.bias.len();
		if gates == 0 || gates % 4 != 0 {
			return Err(ModelError::InvalidConfig(format!(
				"LSTM bias length must be a positive multiple of 4, got {gates}"
			)));
		}
		if self.kernel.nrows() == 0 {
			return Err(ModelError::InvalidConfig("LSTM input size must be positive".to_owned()));
		}
		let units = gates / 4;
		check_shape("lstm kernel", &[self.kernel.nrows(), gates], self.kernel.shape())?;
		check_shape("lstm recurrent kernel", &[units, gates], self.recurrent_kernel.shape())
	}

	pub fn input_size(&self) -> usize {
		self.kernel.nrows()
	}

	pub fn units(&self) -> usize {
		self.bias.len() / 4
	}

	/// Runs the recurrence over the rows of `inputs` starting from zero states.
	///
	/// Returns the hidden state after every timestep, one row per step.
	pub(crate) fn forward(&self, inputs: &Array2<f32>) -> Array2<f32> {
		let units = self.units();
		let mut h = Array1::<f32>::zeros(units);
		let mut c = Array1::<f32>::zeros(units);
		let mut outputs = Array2::<f32>::zeros((inputs.nrows(), units));

		for (x, mut out) in inputs.rows().into_iter().zip(outputs.rows_mut()) {
			let z = x.dot(&self.kernel) + h.dot(&self.recurrent_kernel) + &self.bias;

			let i = z.slice(s![..units]).mapv(sigmoid);
			let f = z.slice(s![units..2 * units]).mapv(sigmoid);
			let g = z.slice(s![2 * units..3 * units]).mapv(f32::tanh);
			let o = z.slice(s![3 * units..]).mapv(sigmoid);

			c = &f * &c + &i * &g;
			h = &o * &c.mapv(f32::tanh);
			out.assign(&h);
		}

		outputs
	}
}

/// Fails with `ShapeMismatch` when `got` differs from `expected`.
pub(crate) fn check_shape(name: &str, expected: &[usize], got: &[usize]) -> Result<(), ModelError> {
	if expected != got {
		return Err(ModelError::ShapeMismatch { name: name.to_owned(), expected: expected.to_vec(), got: got.to_vec() });
	}
	Ok(())
}

/// Last row of `states`, the hidden state of the final timestep.
pub(crate) fn last_state(states: &Array2<f32>) -> Option<ArrayView1<'_, f32>> {
	let rows = states.nrows();
	if rows == 0 {
		return None;
	}
	Some(states.row(rows - 1))
}
