use crate::multiindex::unflatten_index;
use crate::tensor::Tensor;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use npyz::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn load_npy<P: AsRef<Path>>(path: P) -> Result<Tensor> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("reading reference {}", path.display()))?;

    let npy = npyz::NpyFile::new(&bytes[..])
        .with_context(|| format!("{} is not a valid npy file", path.display()))?;
    let tensor = convert_npy(npy).with_context(|| format!("decoding {}", path.display()))?;
    info!(
        "loaded {} with shape {:?}",
        path.display(),
        tensor.get_shape()
    );
    Ok(tensor)
}

pub fn save_npy<P: AsRef<Path>>(path: P, tensor: &Tensor) -> Result<()> {
    let path = path.as_ref();
    let out_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out_file = BufWriter::new(out_file);
    let out_shape: Vec<u64> = tensor.get_shape().iter().map(|dim| *dim as u64).collect();
    let mut wtr = npyz::WriteOptions::new()
        .dtype(npyz::DType::Plain(
            "<f8".parse::<npyz::TypeStr>()
                .map_err(|e| anyhow!("{}", e))?,
        ))
        .shape(out_shape.as_slice())
        .writer(&mut out_file)
        .begin_nd()?;

    wtr.extend(tensor.get_values())?;
    wtr.finish()?;
    out_file.flush()?;
    info!("saved {} with shape {:?}", path.display(), tensor.get_shape());
    Ok(())
}

fn convert_npy<R>(npy: npyz::NpyFile<R>) -> Result<Tensor>
where
    R: std::io::Read,
{
    match npy.dtype() {
        npyz::DType::Plain(s) => match &s.to_string()[1..] {
            "f4" => convert_typed_npy::<R, f32>(npy),
            "f8" => convert_typed_npy::<R, f64>(npy),
            "i1" => convert_typed_npy::<R, i8>(npy),
            "i2" => convert_typed_npy::<R, i16>(npy),
            "i4" => convert_typed_npy::<R, i32>(npy),
            "i8" => convert_typed_npy::<R, i64>(npy),
            "u1" => convert_typed_npy::<R, u8>(npy),
            "u2" => convert_typed_npy::<R, u16>(npy),
            "u4" => convert_typed_npy::<R, u32>(npy),
            "u8" => convert_typed_npy::<R, u64>(npy),
            _ => bail!("Unsupported scalar dtype {}", s),
        },
        _ => bail!("Non-scalar dtypes are not supported"),
    }
}

fn convert_typed_npy<R, T>(npy: npyz::NpyFile<R>) -> Result<Tensor>
where
    R: std::io::Read,
    T: npyz::Deserialize + num::ToPrimitive,
{
    let shape: Vec<usize> = npy.shape().iter().map(|x| *x as usize).collect();
    let order = npy.order();
    let values = npy
        .data::<T>()?
        .map(|x| {
            x?.to_f64()
                .ok_or_else(|| anyhow!("Input not representable as 64-bit floating point"))
        })
        .collect::<Result<Vec<f64>>>()?;

    let values = match order {
        npyz::Order::C => values,
        npyz::Order::Fortran => fortran_to_c(&shape, &values),
    };
    Ok(Tensor::new(shape, values))
}

// column-major data is laid out with the first axis varying fastest
fn fortran_to_c(shape: &[usize], values: &[f64]) -> Vec<f64> {
    let reversed: Vec<usize> = shape.iter().rev().copied().collect();
    let mut out = vec![0.; values.len()];
    for (i, value) in values.iter().enumerate() {
        let mut index = unflatten_index(i, &reversed);
        index.reverse();
        let mut offset = 0;
        for (dim, k) in shape.iter().zip(index.iter()) {
            offset = offset * dim + k;
        }
        out[offset] = *value;
    }
    out
}
