use crate::error::{Error, Result};
use csv::{ReaderBuilder, Trim};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Raw table as read from disk. Cells stay strings so columns the model
/// never looks at pass through untouched.
#[derive(Clone, Debug)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::shape(
                    format!("{} cells in row {}", columns.len(), i),
                    row.len(),
                ));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Load a comma-separated file whose first record is the header.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading csv");
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(columns, rows)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Distinct values of a column in first-seen order.
    pub fn unique(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for value in self.column(name)? {
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }

    /// Copy of the frame without the named columns. Unknown names are ignored.
    pub fn drop_columns(&self, names: &[&str]) -> Frame {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();

        Frame {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    pub fn head(&self, n: usize) -> String {
        render_table(
            &self.columns,
            self.rows.iter().take(n).enumerate().map(|(i, row)| (i, row.clone())),
        )
    }
}

/// Right-aligned text table with a leading index column.
pub(crate) fn render_table<I>(header: &[String], rows: I) -> String
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
{
    let rows: Vec<(String, Vec<String>)> = rows
        .into_iter()
        .map(|(idx, cells)| (idx.to_string(), cells))
        .collect();

    let index_width = rows.iter().map(|(idx, _)| idx.len()).max().unwrap_or(0);
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for (_, cells) in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (h, w) in header.iter().zip(&widths) {
        out.push_str(&format!("  {:>w$}", h, w = w));
    }
    for (idx, cells) in &rows {
        out.push('\n');
        out.push_str(&format!("{:<w$}", idx, w = index_width));
        for (cell, w) in cells.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", cell, w = w));
        }
    }
    out
}

/// Row indices of one train/holdout partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles row indices and cuts them into a leading training share and a
/// trailing holdout share. Not stratified.
#[derive(Clone, Debug)]
pub struct ShuffleSplit {
    train_fraction: f64,
    random_state: Option<u64>,
}

impl ShuffleSplit {
    pub fn new(train_fraction: f64) -> Self {
        Self {
            train_fraction,
            random_state: None,
        }
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn n_train(&self, n_samples: usize) -> usize {
        (n_samples as f64 * self.train_fraction).floor() as usize
    }

    pub fn split(&self, n_samples: usize) -> Result<Split> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(Error::InvalidParameter {
                name: "train_fraction".to_string(),
                value: self.train_fraction.to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }

        let mut rng = match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rng);

        let test = indices.split_off(self.n_train(n_samples));
        Ok(Split {
            train: indices,
            test,
        })
    }
}

impl Default for ShuffleSplit {
    fn default() -> Self {
        Self::new(0.70)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTO: &str = "\
mpg,cylinders,displacement,year,origin
18,8,307,70,1
15,8,350,70,1
24,4,113,70,3
26,4,97,70,2
";

    fn frame() -> Frame {
        Frame::from_reader(AUTO.as_bytes()).unwrap()
    }

    #[test]
    fn test_frame_from_csv() {
        let frame = frame();
        assert_eq!(frame.n_rows(), 4);
        assert_eq!(frame.n_columns(), 5);
        assert_eq!(frame.column("origin").unwrap(), vec!["1", "1", "3", "2"]);
    }

    #[test]
    fn test_unique_keeps_first_seen_order() {
        assert_eq!(frame().unique("origin").unwrap(), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_missing_column() {
        let err = frame().require_columns(&["origin", "weight"]).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "weight"));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_ragged_csv_is_rejected() {
        let data = "a,b\n1,2\n3\n";
        let err = Frame::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Frame::from_csv_path("does/not/exist.csv").unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_drop_columns() {
        let dropped = frame().drop_columns(&["cylinders", "year"]);
        assert_eq!(dropped.columns(), &["mpg", "displacement", "origin"]);
        assert_eq!(dropped.rows()[2], vec!["24", "113", "3"]);
    }

    #[test]
    fn test_head_limits_rows() {
        let head = frame().head(2);
        assert_eq!(head.lines().count(), 3);
        assert!(head.lines().next().unwrap().contains("origin"));
    }

    #[test]
    fn test_split_sizes() {
        let split = ShuffleSplit::new(0.7).split(100).unwrap();
        assert_eq!(split.train.len(), 70);
        assert_eq!(split.test.len(), 30);

        let split = ShuffleSplit::new(0.7).split(7).unwrap();
        assert_eq!(split.train.len(), 4);
        assert_eq!(split.test.len(), 3);
    }

    #[test]
    fn test_split_is_a_permutation() {
        let split = ShuffleSplit::new(0.7).split(50).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let a = ShuffleSplit::new(0.7).random_state(42).split(200).unwrap();
        let b = ShuffleSplit::new(0.7).random_state(42).split(200).unwrap();
        let c = ShuffleSplit::new(0.7).random_state(7).split(200).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_invalid_fraction() {
        assert!(ShuffleSplit::new(0.0).split(10).is_err());
        assert!(ShuffleSplit::new(1.0).split(10).is_err());
    }
}
