//! Source locations attached to AST nodes.

use serde::{Deserialize, Serialize};

/// Location of a node's text in the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileLocation {
    pub file: String,
    pub offset: u32,
    pub length: u32,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Text produced by expanding the named macro's body.
    MacroExpansion,
    /// Text passed as an argument to the named macro.
    MacroArgument,
}

/// Where a node's text appears in the preprocessed image, when that differs from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLocation {
    pub kind: ImageKind,
    pub macro_name: String,
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageLocation>,
}

impl NodeLocation {
    pub fn in_file(file: &str, offset: u32, length: u32, line: u32, column: u32) -> Self {
        Self {
            file: Some(FileLocation {
                file: file.to_string(),
                offset,
                length,
                line,
                column,
            }),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageLocation) -> Self {
        self.image = Some(image);
        self
    }

    /// Line and column, defaulting to the start of the file.
    pub fn line_column(&self) -> (u32, u32) {
        self.file
            .as_ref()
            .map(|f| (f.line, f.column))
            .unwrap_or((1, 1))
    }

    pub fn is_macro_expansion(&self) -> bool {
        self.image.is_some()
    }
}
