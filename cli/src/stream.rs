//! Input and output plumbing: files or the standard streams.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use cdnstrip_common::error::StripError;
use cdnstrip_common::warn;

pub type Input = Box<dyn BufRead + Send>;
pub type Output = Box<dyn Write + Send>;

fn is_std(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn open_input(path: &Path) -> Result<Input, StripError> {
    if is_std(path) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|source| StripError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Creates (or truncates) the output file.
pub fn open_output(path: &Path) -> Result<Output, StripError> {
    if is_std(path) {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(path).map_err(|source| StripError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(file))
}

/// Lazy lines of `reader`. Invalid UTF-8 is replaced; a read error ends the stream.
pub struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

pub fn lines<R: BufRead>(reader: R) -> Lines<R> {
    Lines {
        reader,
        buf: Vec::new(),
        done: false,
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        self.buf.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => return Some(String::from_utf8_lossy(&self.buf).into_owned()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("Stopped reading input: {e}");
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
