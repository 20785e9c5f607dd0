//! Loading embedding spaces from disk.
//!
//! One directory per grain, one model file per time slice. The slice label
//! is the file-name prefix before the first `_`, as produced by the
//! training step (`1850_d100-w5-f5-sg.txt` → `1850`).
//!
//! Model files use the word2vec text format:
//!
//! ```text
//! <vocab_size> <dim>
//! green::nn 0.12 -0.03 ...
//! house::nn 0.44 0.10 ...
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::model::{Grain, TimeLabel};
use crate::{Error, Result};
use super::{EmbeddingSpace, MemorySpace};

/// One space and the label it is reported under.
#[derive(Debug, Clone)]
pub struct Slice<S> {
    pub label: TimeLabel,
    pub space: S,
}

/// All slices of one grain, ordered by label.
#[derive(Debug, Clone)]
pub struct GrainSeries<S> {
    pub grain: Grain,
    /// Appended to every measure name (e.g. `-run2`); empty for none.
    pub run_tag: String,
    slices: Vec<Slice<S>>,
}

impl<S> GrainSeries<S> {
    /// Slices are sorted by label. Fails with `EmptyGrain` when there are none.
    pub fn new(grain: Grain, run_tag: impl Into<String>, mut slices: Vec<Slice<S>>) -> Result<Self> {
        if slices.is_empty() {
            return Err(Error::EmptyGrain { grain, dir: None });
        }
        slices.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(Self { grain, run_tag: run_tag.into(), slices })
    }

    pub fn slices(&self) -> &[Slice<S>] { &self.slices }

    /// Adjacent `(earlier, later)` slice pairs.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&Slice<S>, &Slice<S>)> {
        self.slices.windows(2).map(|w| (&w[0], &w[1]))
    }
}

/// How model files are discovered in a grain directory.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Only files whose name ends with this suffix are loaded.
    pub suffix: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { suffix: ".txt".to_string() }
    }
}

/// Run tag for a model directory: `-<name>` when the directory's own name
/// starts with `run`, otherwise empty. Keeps measures from repeated runs
/// with different hyperparameters apart in the output.
pub fn run_tag_for(dir: &Path) -> String {
    match dir.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.starts_with("run") => format!("-{name}"),
        _ => String::new(),
    }
}

/// Load every model file of one grain directory.
pub fn load_grain(dir: &Path, grain: Grain, options: &LoadOptions) -> Result<GrainSeries<MemorySpace>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(&options.suffix))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::EmptyGrain { grain, dir: Some(dir.to_path_buf()) });
    }
    tracing::info!(%grain, dir = %dir.display(), files = files.len(), "loading models");

    let mut slices = Vec::with_capacity(files.len());
    for path in &files {
        let label = slice_label(path);
        let space = read_word2vec_text(path)?;
        tracing::debug!(%grain, time = %label, vocab = space.vocab_len(), dim = space.dim(), "loaded model");
        slices.push(Slice { label, space });
    }

    GrainSeries::new(grain, run_tag_for(dir), slices)
}

fn slice_label(path: &Path) -> TimeLabel {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    TimeLabel(name.split('_').next().unwrap_or(name).to_string())
}

/// Parse a word2vec text-format file.
pub fn read_word2vec_text(path: &Path) -> Result<MemorySpace> {
    let file = std::fs::File::open(path)?;
    parse_word2vec_text(std::io::BufReader::new(file), path)
}

pub(crate) fn parse_word2vec_text<R: BufRead>(reader: R, path: &Path) -> Result<MemorySpace> {
    let parse_err = |line: usize, message: String| Error::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(parse_err(1, "empty file".into())),
    };
    let mut fields = header.split_whitespace().map(str::parse::<usize>);
    let (count, dim) = match (fields.next(), fields.next(), fields.next()) {
        (Some(Ok(count)), Some(Ok(dim)), None) => (count, dim),
        _ => return Err(parse_err(1, format!("expected `<count> <dim>` header, got {header:?}"))),
    };

    let mut space = MemorySpace::with_capacity(dim, count);
    let mut vector = Vec::with_capacity(dim);
    for (i, line) in lines.enumerate() {
        let line_no = i + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let token = parts.next().unwrap_or_default();
        vector.clear();
        for part in parts {
            let value = part
                .parse::<f32>()
                .map_err(|e| parse_err(line_no, format!("bad component {part:?}: {e}")))?;
            vector.push(value);
        }
        if vector.len() != dim {
            return Err(parse_err(line_no, format!("expected {dim} components, got {}", vector.len())));
        }
        space.insert(token, &vector)?;
    }

    if space.vocab_len() != count {
        tracing::warn!(
            path = %path.display(),
            header = count,
            found = space.vocab_len(),
            "vocabulary size differs from header"
        );
    }
    Ok(space)
}
