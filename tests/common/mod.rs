use npyz::WriterBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const FIXTURE_SHAPE: [u64; 2] = [3, 5];

pub fn fixture_pressures() -> Vec<f64> {
    vec![
        4012.35, 4008.91, 4003.27, 3998.64, 3991.02, //
        4031.78, 4027.40, 4021.93, 4016.55, 4010.18, //
        4050.12, 4046.67, 4041.05, 4035.89, 4029.74,
    ]
}

pub fn fixture_report() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data/assignment18.txt");
    path
}

pub fn copy_report(dir: &Path) {
    fs::copy(fixture_report(), dir.join("assignment18.txt")).unwrap();
}

pub fn save_gold(path: &Path, shape: &[u64], values: &[f64]) {
    let mut out_file = File::create(path).unwrap();
    let mut wtr = npyz::WriteOptions::new()
        .dtype(npyz::DType::Plain("<f8".parse::<npyz::TypeStr>().unwrap()))
        .shape(shape)
        .writer(&mut out_file)
        .begin_nd()
        .unwrap();
    wtr.extend(values).unwrap();
    wtr.finish().unwrap();
}

pub fn load_gold(path: &Path) -> (Vec<u64>, Vec<f64>) {
    let bytes = fs::read(path).unwrap();
    let npy = npyz::NpyFile::new(&bytes[..]).unwrap();
    let shape = npy.shape().to_vec();
    (shape, npy.into_vec::<f64>().unwrap())
}
