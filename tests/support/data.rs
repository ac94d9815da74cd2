use std::path::{Path, PathBuf};

/// Two symmetric clusters around the origin, label last.
pub const TRAIN_ROWS: &[[f64; 3]] = &[
    [1.0, 2.0, 1.0],
    [2.0, 1.0, 1.0],
    [3.0, 3.0, 1.0],
    [-1.0, -2.0, 0.0],
    [-2.0, -1.0, 0.0],
    [-3.0, -3.0, 0.0],
];

pub const TEST_ROWS: &[[f64; 3]] = &[
    [1.5, 1.5, 1.0],
    [2.5, 0.5, 1.0],
    [-1.5, -1.5, 0.0],
    [-0.5, -2.5, 0.0],
];

pub fn write_csv(dir: &Path, name: &str, rows: &[[f64; 3]]) -> PathBuf {
    write_delimited(dir, name, rows, ',')
}

pub fn write_delimited(dir: &Path, name: &str, rows: &[[f64; 3]], sep: char) -> PathBuf {
    let text: String = rows
        .iter()
        .map(|row| format!("{}{sep}{}{sep}{}\n", row[0], row[1], row[2]))
        .collect();
    write_text(dir, name, &text)
}

/// `0`/`1` lines printed by `logit-predict`, skipping log output.
pub fn prediction_lines(stdout: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| match line.trim() {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        })
        .collect()
}

pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write text");
    path
}
