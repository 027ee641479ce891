/// Incremental line splitter for upstream stream bodies. Both upstream
/// framings this relay understands (SSE `data:` lines and newline-delimited
/// JSON) are line-oriented, so the decoder only has to re-chunk bytes into
/// complete lines; dialect-specific parsing happens per line downstream.
///
/// Buffers raw bytes and splits on `\n` before any UTF-8 conversion, so a
/// chunk boundary falling inside a multibyte character loses nothing.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk of upstream bytes, returning every complete line it
    /// closes. Blank lines are dropped; a trailing `\r` is stripped. Lines
    /// that are not valid UTF-8 are skipped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&byte| byte == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }
            if let Ok(text) = String::from_utf8(line) {
                lines.push(text);
            }
        }
        lines
    }

    /// Drains a final unterminated line once the upstream body ends.
    pub fn finish(&mut self) -> Option<String> {
        let mut line = std::mem::take(&mut self.buffer);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            return None;
        }
        String::from_utf8(line).ok()
    }
}
