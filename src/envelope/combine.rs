/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Summation of the sub-band envelopes into one combined envelope.

use alloc::vec::Vec;

/// Element-wise `accumulator += addend`.
///
/// # Panics
/// If both slices have different lengths. Reconciling lengths is the job of
/// the caller, see [`combine`].
pub fn add(accumulator: &mut [f64], addend: &[f64]) {
    assert_eq!(
        accumulator.len(),
        addend.len(),
        "envelopes must have the same length"
    );
    accumulator
        .iter_mut()
        .zip(addend)
        .for_each(|(acc, value)| *acc += value);
}

/// Sums all envelopes element-wise.
///
/// The decimated lengths of the levels may differ slightly because of
/// integer rounding. All envelopes are truncated to the shortest one before
/// they are summed. Returns an empty vector if there are no envelopes.
#[must_use]
pub fn combine(envelopes: Vec<Vec<f64>>) -> Vec<f64> {
    let Some(shortest) = envelopes.iter().map(Vec::len).min() else {
        return Vec::new();
    };

    if envelopes.iter().any(|envelope| envelope.len() != shortest) {
        log::trace!(
            "truncating envelopes of lengths {:?} to {shortest}",
            envelopes.iter().map(Vec::len).collect::<Vec<_>>()
        );
    }

    let mut envelopes = envelopes.into_iter();
    let mut combined = envelopes.next().unwrap_or_default();
    combined.truncate(shortest);
    for envelope in envelopes {
        add(&mut combined, &envelope[..shortest]);
    }
    combined
}
