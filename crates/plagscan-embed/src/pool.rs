use anyhow::{ensure, Result};
use candle_core::Tensor;

/// Mean of the unmasked token states, then L2 normalization.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]` (1 = real token).
/// Returns `[B, H]` unit rows.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, seq, hidden_dim) = hidden.dims3()?;
    ensure!(attention_mask.dims() == [batch, seq], "mask shape {:?} does not match hidden [{batch}, {seq}, _]", attention_mask.dims());

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let lengths = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
    let mean = summed.broadcast_div(&lengths)?;

    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12f32, f32::MAX)?;
    let out = mean.broadcast_div(&norm)?;
    ensure!(out.dims() == [batch, hidden_dim]);
    Ok(out)
}
