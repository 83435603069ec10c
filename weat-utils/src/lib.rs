use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};

use weat::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingFormat {
    Word2Vec,
    Text,
    TextDims,
}

impl EmbeddingFormat {
    pub fn try_from(format: impl AsRef<str>) -> Result<Self> {
        use EmbeddingFormat::*;

        match format.as_ref() {
            "word2vec" => Ok(Word2Vec),
            "text" => Ok(Text),
            "textdims" => Ok(TextDims),
            unknown => bail!("Unknown embedding format: {}", unknown),
        }
    }
}

pub fn read_embeddings(
    filename: &str,
    embedding_format: EmbeddingFormat,
) -> Result<Embeddings<SimpleVocab, NdArray>> {
    let f = File::open(filename)
        .with_context(|| format!("Cannot open embeddings file: {}", filename))?;
    let mut reader = BufReader::new(f);

    use EmbeddingFormat::*;
    let embeddings: Embeddings<SimpleVocab, NdArray> = match embedding_format {
        Word2Vec => ReadWord2Vec::read_word2vec_binary(&mut reader),
        Text => ReadText::read_text(&mut reader),
        TextDims => ReadTextDims::read_text_dims(&mut reader),
    }
    .context("Cannot read embeddings")?;

    Ok(embeddings)
}

/// Read the configuration from a TOML file, defaults without a file.
pub fn read_config(filename: Option<&str>) -> Result<WeatConfig> {
    match filename {
        Some(filename) => {
            let f = File::open(filename)
                .with_context(|| format!("Cannot open configuration file: {}", filename))?;
            WeatConfig::read_toml(f).context("Cannot read configuration")
        }
        None => Ok(WeatConfig::default()),
    }
}

/// Derive a model identifier from the embeddings file name.
pub fn model_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_owned())
}
