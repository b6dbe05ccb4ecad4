use std::fmt;

/// Dense row-major tensor of double precision values.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Tensor {
        assert_eq!(
            shape.iter().product::<usize>(),
            values.len(),
            "Tensor shape {:?} does not match data length {}",
            shape,
            values.len()
        );

        Tensor { shape, values }
    }

    pub fn empty(shape: Vec<usize>) -> Tensor {
        let data_len = shape.iter().product::<usize>();

        Tensor {
            shape,
            values: Vec::with_capacity(data_len),
        }
    }

    /// Builds a matrix from equally long rows. No rows gives a rank-1 tensor
    /// of length zero.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Tensor {
        let n_rows = rows.len();
        if n_rows == 0 {
            return Tensor::empty(vec![0]);
        }
        let n_cols = rows[0].len();
        Tensor::new(vec![n_rows, n_cols], rows.into_iter().flatten().collect())
    }

    pub fn get_rank(&self) -> usize {
        self.shape.len()
    }

    pub fn get_size(&self) -> usize {
        self.shape.iter().product::<usize>()
    }

    pub fn get_shape(&self) -> &Vec<usize> {
        &self.shape
    }

    pub fn get_values(&self) -> &Vec<f64> {
        &self.values
    }
}

fn fmt_axis(f: &mut fmt::Formatter<'_>, shape: &[usize], values: &[f64]) -> fmt::Result {
    match shape.split_first() {
        None => write!(f, "{}", values[0]),
        Some((&dim, rest)) => {
            let stride = rest.iter().product::<usize>();
            write!(f, "[")?;
            for k in 0..dim {
                if k > 0 {
                    write!(f, ", ")?;
                }
                fmt_axis(f, rest, &values[k * stride..(k + 1) * stride])?;
            }
            write!(f, "]")
        }
    }
}

/// Nested-bracket rendering, one bracket level per axis.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_axis(f, &self.shape, &self.values)
    }
}
