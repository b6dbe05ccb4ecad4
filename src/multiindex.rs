/*
    Conversion of flat row-major offsets into multi-indices of a shape
*/

pub fn unflatten_index(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut multi_index = Vec::with_capacity(shape.len());
    let mut index = index;
    for dim in shape.iter().rev() {
        multi_index.push(index % dim);
        index /= dim;
    }
    multi_index.reverse();
    multi_index
}
