//! Destinations for the declaration sequence.

use std::io;

use crate::{translator::declaration::Declaration, Result};

/// Receives declarations in emission order.
pub trait DeclarationSink {
    /// Accepts the next declaration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] if the destination cannot be written.
    fn emit(&mut self, declaration: Declaration) -> Result<()>;
}

/// Collects declarations in memory.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    declarations: Vec<Declaration>,
}

impl VecSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declarations received so far.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Consumes the sink.
    #[must_use]
    pub fn into_declarations(self) -> Vec<Declaration> {
        self.declarations
    }

    /// Textual rendering of every declaration, one per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.declarations.iter().map(ToString::to_string).collect()
    }
}

impl DeclarationSink for VecSink {
    fn emit(&mut self, declaration: Declaration) -> Result<()> {
        self.declarations.push(declaration);
        Ok(())
    }
}

/// Writes the textual rendering of each declaration to a writer.
#[derive(Debug)]
pub struct TextSink<W: io::Write> {
    writer: W,
    written: usize,
}

impl<W: io::Write> TextSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        TextSink { writer, written: 0 }
    }

    /// Number of declarations written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] if flushing fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: io::Write> DeclarationSink for TextSink<W> {
    fn emit(&mut self, declaration: Declaration) -> Result<()> {
        writeln!(self.writer, "{declaration}")?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_sink_writes_lines() {
        let mut sink = TextSink::new(Vec::new());
        sink.emit(Declaration::DeclareNamespace {
            path: "App".to_string(),
        })
        .unwrap();
        sink.emit(Declaration::SealType {
            parent: "App".to_string(),
            name: "T".to_string(),
        })
        .unwrap();
        assert_eq!(sink.written(), 2);

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "JSIL.DeclareNamespace(\"App\");\nJSIL.SealType(App, \"T\");\n"
        );
    }
}
