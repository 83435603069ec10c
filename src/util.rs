use std::io::BufRead;

use crate::error::{Error, Result};

/// Upper bound on the number of elements allocated up front from a
/// file header.
const MAX_PREALLOC: usize = 1 << 24;

/// Get the capacities for the words and the components of an embedding
/// matrix of the shape given in a file header.
pub fn header_capacity(n_words: usize, dims: usize) -> Result<(usize, usize)> {
    let n_components = n_words.checked_mul(dims).ok_or_else(|| {
        Error::Format(format!(
            "Embedding matrix shape is too large: {} x {}",
            n_words, dims
        ))
    })?;

    Ok((n_words.min(MAX_PREALLOC), n_components.min(MAX_PREALLOC)))
}

pub fn read_number(reader: &mut dyn BufRead, delim: u8) -> Result<usize> {
    let field_str = read_string(reader, delim, false)?;
    field_str.trim().parse().map_err(|e| {
        Error::Format(format!(
            "Cannot parse shape component '{}': {}",
            field_str, e
        ))
    })
}

pub fn read_string(reader: &mut dyn BufRead, delim: u8, lossy: bool) -> Result<String> {
    let mut buf = Vec::new();
    reader
        .read_until(delim, &mut buf)
        .map_err(|e| Error::io_error("Cannot read string", e))?;
    if buf.last() == Some(&delim) {
        buf.pop();
    }

    bytes_to_string(buf, lossy)
}

pub fn bytes_to_string(buf: Vec<u8>, lossy: bool) -> Result<String> {
    if lossy {
        Ok(String::from_utf8_lossy(&buf).into_owned())
    } else {
        String::from_utf8(buf)
            .map_err(|e| Error::Format(format!("Token contains invalid UTF-8: {}", e)))
    }
}
