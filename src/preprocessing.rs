use crate::dataset::{Frame, render_table};
use crate::error::{Error, Result};
use crate::Matrix;

/// Expands one integer-valued column into one 0/1 column per distinct value.
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    column: String,
    prefix: String,
    categories: Option<Vec<i64>>,
}

impl OneHotEncoder {
    pub fn new(column: &str, prefix: &str) -> Self {
        Self {
            column: column.to_string(),
            prefix: prefix.to_string(),
            categories: None,
        }
    }

    pub fn categories(&self) -> Option<&[i64]> {
        self.categories.as_deref()
    }

    pub fn feature_names(&self) -> Result<Vec<String>> {
        let categories = self.categories.as_ref().ok_or(Error::NotFitted)?;
        Ok(categories
            .iter()
            .map(|c| format!("{}_{}", self.prefix, c))
            .collect())
    }

    pub fn fit(&mut self, frame: &Frame) -> Result<()> {
        let mut categories = self.parse(frame)?;
        categories.sort_unstable();
        categories.dedup();
        self.categories = Some(categories);
        Ok(())
    }

    pub fn transform(&self, frame: &Frame) -> Result<Matrix> {
        let categories = self.categories.as_ref().ok_or(Error::NotFitted)?;
        let values = self.parse(frame)?;

        let mut indicators = Matrix::zeros((values.len(), categories.len()));
        for (i, value) in values.into_iter().enumerate() {
            let j = categories
                .binary_search(&value)
                .map_err(|_| Error::UnknownCategory {
                    column: self.column.clone(),
                    value,
                })?;
            indicators[[i, j]] = 1.0;
        }
        Ok(indicators)
    }

    pub fn fit_transform(&mut self, frame: &Frame) -> Result<Matrix> {
        self.fit(frame)?;
        self.transform(frame)
    }

    fn parse(&self, frame: &Frame) -> Result<Vec<i64>> {
        frame
            .column(&self.column)?
            .into_iter()
            .map(|cell| {
                cell.parse::<i64>().map_err(|_| Error::InvalidCategory {
                    column: self.column.clone(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

/// A frame whose categorical columns have been replaced by indicator columns.
#[derive(Clone, Debug)]
pub struct EncodedFrame {
    /// Every raw column except the encoded ones, in the original order.
    pub passthrough: Frame,
    pub feature_names: Vec<String>,
    /// One row per observation, one 0/1 column per entry of `feature_names`.
    pub features: Matrix,
}

impl EncodedFrame {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn head(&self, n: usize) -> String {
        let mut header: Vec<String> = self.passthrough.columns().to_vec();
        header.extend(self.feature_names.iter().cloned());

        let rows = self
            .passthrough
            .rows()
            .iter()
            .zip(self.features.rows())
            .take(n)
            .enumerate()
            .map(|(i, (raw, indicators))| {
                let mut cells = raw.clone();
                cells.extend(indicators.iter().map(|v| format!("{}", *v as u8)));
                (i, cells)
            });

        render_table(&header, rows)
    }
}

/// One-hot encode `(column, prefix)` pairs over the whole frame and drop the
/// source columns. Indicator blocks follow each other in argument order.
pub fn encode_frame(frame: &Frame, columns: &[(&str, &str)]) -> Result<EncodedFrame> {
    let mut feature_names = Vec::new();
    let mut blocks = Vec::with_capacity(columns.len());

    for &(column, prefix) in columns {
        let mut encoder = OneHotEncoder::new(column, prefix);
        blocks.push(encoder.fit_transform(frame)?);
        feature_names.extend(encoder.feature_names()?);
    }

    let mut features = Matrix::zeros((frame.n_rows(), feature_names.len()));
    let mut offset = 0;
    for block in blocks {
        let width = block.ncols();
        features
            .slice_mut(ndarray::s![.., offset..offset + width])
            .assign(&block);
        offset += width;
    }

    let dropped: Vec<&str> = columns.iter().map(|&(column, _)| column).collect();
    Ok(EncodedFrame {
        passthrough: frame.drop_columns(&dropped),
        feature_names,
        features,
    })
}
