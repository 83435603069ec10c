//! Readers for text formats.
//!
//! This module provides two readers:
//!
//! 1. `ReadText`: word embeddings in text format. In this format, each
//!    line contains a word followed by its embedding. The word and the
//!    embedding vector components are separated by a space. This format
//!    is used by GloVe.
//! 2. `ReadTextDims`: this format is the same as (1), but the data is
//!    preceded by a line with the shape of the embedding matrix. This
//!    format is used by word2vec's and fastText's text output.
//!
//! For example:
//!
//! ```
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use weat::prelude::*;
//!
//! let mut reader = BufReader::new(File::open("testdata/toy.dims").unwrap());
//! let embeddings = Embeddings::read_text_dims(&mut reader).unwrap();
//!
//! // Look up an embedding.
//! let embedding = embeddings.embedding("rose");
//! ```

use std::io::BufRead;

use fnv::FnvHashSet;
use ndarray::Array2;
use tracing::warn;

use crate::embeddings::Embeddings;
use crate::error::{Error, Result};
use crate::storage::NdArray;
use crate::util::{bytes_to_string, header_capacity, read_number};
use crate::vocab::SimpleVocab;

/// Method to construct `Embeddings` from a text file.
///
/// This trait defines an extension to `Embeddings` to read the word embeddings
/// from a text stream. The text should contain one word embedding per line in
/// the following format:
///
/// *word0 component_1 component_2 ... component_n*
pub trait ReadText<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read the embeddings from the given buffered reader.
    fn read_text(reader: &mut R) -> Result<Self>;

    /// Read the embeddings from the given buffered reader.
    ///
    /// In contrast to `read_text`, this constructor does not
    /// fail if a token contains invalid UTF-8. Instead, it will
    /// replace invalid UTF-8 characters by the replacement
    /// character.
    fn read_text_lossy(reader: &mut R) -> Result<Self>;
}

impl<R> ReadText<R> for Embeddings<SimpleVocab, NdArray>
where
    R: BufRead,
{
    fn read_text(reader: &mut R) -> Result<Self> {
        read_embeds(reader, None, false)
    }

    fn read_text_lossy(reader: &mut R) -> Result<Self> {
        read_embeds(reader, None, true)
    }
}

/// Method to construct `Embeddings` from a text file with dimensions.
///
/// This trait defines an extension to `Embeddings` to read the word embeddings
/// from a text stream. The text must contain as the first line the shape of
/// the embedding matrix:
///
/// *vocab_size n_components*
///
/// The remainder of the stream should contain one word embedding per line in
/// the following format:
///
/// *word0 component_1 component_2 ... component_n*
pub trait ReadTextDims<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read the embeddings from the given buffered reader.
    fn read_text_dims(reader: &mut R) -> Result<Self>;

    /// Read the embeddings from the given buffered reader.
    ///
    /// In contrast to `read_text_dims`, this constructor does not
    /// fail if a token contains invalid UTF-8. Instead, it will
    /// replace invalid UTF-8 characters by the replacement
    /// character.
    fn read_text_dims_lossy(reader: &mut R) -> Result<Self>;
}

impl<R> ReadTextDims<R> for Embeddings<SimpleVocab, NdArray>
where
    R: BufRead,
{
    fn read_text_dims(reader: &mut R) -> Result<Self> {
        let n_words = read_number(reader, b' ')?;
        let embed_len = read_number(reader, b'\n')?;

        read_embeds(reader, Some((n_words, embed_len)), false)
    }

    fn read_text_dims_lossy(reader: &mut R) -> Result<Self> {
        let n_words = read_number(reader, b' ')?;
        let embed_len = read_number(reader, b'\n')?;

        read_embeds(reader, Some((n_words, embed_len)), true)
    }
}

fn read_embeds<R>(
    reader: &mut R,
    shape: Option<(usize, usize)>,
    lossy: bool,
) -> Result<Embeddings<SimpleVocab, NdArray>>
where
    R: BufRead,
{
    let (mut words, mut data) = if let Some((n_words, dims)) = shape {
        let (words_capacity, data_capacity) = header_capacity(n_words, dims)?;
        (
            Vec::with_capacity(words_capacity),
            Vec::with_capacity(data_capacity),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let mut seen = FnvHashSet::default();
    let mut dims = shape.map(|(_, dims)| dims);
    let mut n_lines = 0;

    loop {
        let mut buf = Vec::new();
        match reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io_error("Cannot read line from embedding file", e))?
        {
            0 => break,
            n => {
                if buf[n - 1] == b'\n' {
                    buf.pop();
                }
            }
        };
        n_lines += 1;

        let line = bytes_to_string(buf, lossy)?;

        let mut parts = line
            .split(|c: char| c.is_ascii_whitespace())
            .filter(|part| !part.is_empty());

        let word = parts
            .next()
            .ok_or_else(|| Error::Format(format!("Spurious empty line {}", n_lines)))?;

        let components = parts
            .map(|part| {
                part.parse::<f32>().map_err(|e| {
                    Error::Format(format!("Cannot parse vector component '{}': {}", part, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        match dims {
            Some(dims) if dims != components.len() => {
                return Err(Error::Format(format!(
                    "Incorrect embedding dimensionality on line {}, expected: {}, got: {}",
                    n_lines,
                    dims,
                    components.len()
                )))
            }
            Some(_) => (),
            None => dims = Some(components.len()),
        }

        // Keep the first occurrence of a word.
        if !seen.insert(word.to_owned()) {
            warn!("Duplicate word '{}' on line {}, skipping", word, n_lines);
            continue;
        }

        words.push(word.to_owned());
        data.extend(components);
    }

    if let Some((n_words, _)) = shape {
        if n_lines != n_words {
            return Err(Error::Format(format!(
                "Incorrect vocabulary size, expected: {}, got: {}",
                n_words, n_lines
            )));
        }
    }

    let matrix = Array2::from_shape_vec((words.len(), dims.unwrap_or(0)), data)?;

    Ok(Embeddings::new(SimpleVocab::new(words), NdArray::new(matrix)))
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::{BufReader, Cursor};

    use ndarray::arr1;

    use super::{ReadText, ReadTextDims};
    use crate::embeddings::Embeddings;
    use crate::error::Error;
    use crate::storage::{Storage, StorageView};
    use crate::vocab::Vocab;

    #[test]
    fn read_text() {
        let f = File::open("testdata/toy.txt").unwrap();
        let mut reader = BufReader::new(f);
        let embeddings = Embeddings::read_text(&mut reader).unwrap();

        assert_eq!(embeddings.len(), 8);
        assert_eq!(embeddings.dims(), 2);
        assert_eq!(
            embeddings.embedding("rose").unwrap().view(),
            arr1(&[1f32, 1.]).view()
        );
    }

    #[test]
    fn read_text_dims_matches_text() {
        let mut reader = BufReader::new(File::open("testdata/toy.txt").unwrap());
        let text = Embeddings::read_text(&mut reader).unwrap();

        let mut reader = BufReader::new(File::open("testdata/toy.dims").unwrap());
        let text_dims = Embeddings::read_text_dims(&mut reader).unwrap();

        assert_eq!(text.vocab().words(), text_dims.vocab().words());
        assert_eq!(text.storage().view(), text_dims.storage().view());
    }

    #[test]
    fn fails_on_invalid_utf8() {
        let mut reader = Cursor::new(b"meren 1 2\nzee\xc3n 3 4\n".to_vec());
        assert!(Embeddings::read_text(&mut reader).is_err());
    }

    #[test]
    fn read_lossy() {
        let mut reader = Cursor::new(b"meren 1 2\nzee\xc3n 3 4\n".to_vec());
        let embeddings = Embeddings::read_text_lossy(&mut reader).unwrap();
        assert_eq!(embeddings.vocab().words(), &["meren", "zee\u{FFFD}n"]);
    }

    #[test]
    fn fails_on_ragged_lines() {
        let mut reader = Cursor::new("rose 1 1\nant 0 2 3\n");
        match Embeddings::read_text(&mut reader) {
            Err(Error::Format(desc)) => assert!(desc.contains("line 2")),
            other => panic!("Expected format error, got: {:?}", other.map(|e| e.len())),
        }
    }

    #[test]
    fn fails_on_incorrect_vocab_size() {
        let mut reader = Cursor::new("3 2\nrose 1 1\nant 0 2\n");
        assert!(Embeddings::read_text_dims(&mut reader).is_err());
    }

    #[test]
    fn fails_on_overflowing_header() {
        let mut reader = Cursor::new(format!("{} 3\nrose 1 1 1\n", usize::MAX / 2));
        assert!(matches!(
            Embeddings::read_text_dims(&mut reader),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn bogus_header_does_not_preallocate() {
        let mut reader = Cursor::new(format!("{} 2\nrose 1 1\n", usize::MAX / 2));
        assert!(matches!(
            Embeddings::read_text_dims(&mut reader),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let mut reader = Cursor::new("rose 1 1\nant 0 2\nrose 5 5\n");
        let embeddings = Embeddings::read_text(&mut reader).unwrap();
        assert_eq!(embeddings.vocab().words(), &["rose", "ant"]);
        assert_eq!(embeddings.storage().shape(), (2, 2));
        assert_eq!(
            embeddings.embedding("rose").unwrap().view(),
            arr1(&[1f32, 1.]).view()
        );
    }
}
