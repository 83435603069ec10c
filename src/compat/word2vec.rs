//! Reader for the word2vec binary format.
//!
//! Embeddings in the word2vec binary format are read as follows:
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use weat::prelude::*;
//!
//! let mut reader = BufReader::new(File::open("vectors.bin").unwrap());
//!
//! // Read the embeddings.
//! let embeddings = Embeddings::read_word2vec_binary(&mut reader)
//!     .unwrap();
//!
//! // Look up an embedding.
//! let embedding = embeddings.embedding("flower");
//! ```

use std::io::BufRead;

use byteorder::{LittleEndian, ReadBytesExt};
use fnv::FnvHashSet;
use ndarray::Array2;
use tracing::warn;

use crate::embeddings::Embeddings;
use crate::error::{Error, Result};
use crate::storage::NdArray;
use crate::util::{header_capacity, read_number, read_string};
use crate::vocab::SimpleVocab;

/// Method to construct `Embeddings` from a word2vec binary file.
///
/// This trait defines an extension to `Embeddings` to read the word embeddings
/// from a file in word2vec binary format.
pub trait ReadWord2Vec<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read the embeddings from the given buffered reader.
    fn read_word2vec_binary(reader: &mut R) -> Result<Self>;

    /// Read the embeddings from the given buffered reader.
    ///
    /// Invalid UTF-8 in tokens is replaced by the replacement character.
    fn read_word2vec_binary_lossy(reader: &mut R) -> Result<Self>;
}

impl<R> ReadWord2Vec<R> for Embeddings<SimpleVocab, NdArray>
where
    R: BufRead,
{
    fn read_word2vec_binary(reader: &mut R) -> Result<Self> {
        read_word2vec_embeds(reader, false)
    }

    fn read_word2vec_binary_lossy(reader: &mut R) -> Result<Self> {
        read_word2vec_embeds(reader, true)
    }
}

fn read_word2vec_embeds<R>(reader: &mut R, lossy: bool) -> Result<Embeddings<SimpleVocab, NdArray>>
where
    R: BufRead,
{
    let n_words = read_number(reader, b' ')?;
    let embed_len = read_number(reader, b'\n')?;

    let (words_capacity, data_capacity) = header_capacity(n_words, embed_len)?;
    let mut words = Vec::with_capacity(words_capacity);
    let mut data = Vec::with_capacity(data_capacity);
    let mut seen = FnvHashSet::default();
    let mut embedding = vec![0f32; embed_len];

    for idx in 0..n_words {
        let word = read_string(reader, b' ', lossy)?;
        // Vectors may be followed by a newline.
        let word = word.trim();
        if word.is_empty() {
            return Err(Error::Format(format!("Empty token for embedding {}", idx)));
        }

        reader
            .read_f32_into::<LittleEndian>(&mut embedding)
            .map_err(|e| Error::io_error("Cannot read word embedding", e))?;

        if !seen.insert(word.to_owned()) {
            warn!("Duplicate word '{}' at embedding {}, skipping", word, idx);
            continue;
        }

        words.push(word.to_owned());
        data.extend_from_slice(&embedding);
    }

    let matrix = Array2::from_shape_vec((words.len(), embed_len), data)?;

    Ok(Embeddings::new(SimpleVocab::new(words), NdArray::new(matrix)))
}
