//! Errors raised while ingesting uploaded documents.

use std::fmt;

use thiserror::Error;

/// Which of the two uploaded documents an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
	/// The nodes document.
	Nodes,
	/// The links document.
	Links,
}

impl fmt::Display for DocumentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DocumentKind::Nodes => f.write_str("nodes"),
			DocumentKind::Links => f.write_str("links"),
		}
	}
}

/// A rejected upload. The previously loaded dataset stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
	/// The file contents are not valid JSON.
	#[error("error parsing {kind} file {file}: {message}")]
	Parse {
		/// Uploaded file name.
		file: String,
		/// Document being parsed.
		kind: DocumentKind,
		/// Parser message.
		message: String,
	},
	/// The top-level JSON value is not an array.
	#[error("error parsing {kind} file {file}: {kind} file must contain an array")]
	Shape {
		/// Uploaded file name.
		file: String,
		/// Document being parsed.
		kind: DocumentKind,
	},
	/// An array element does not match the expected record shape.
	#[error("error parsing {kind} file {file}: entry {index}: {message}")]
	Record {
		/// Uploaded file name.
		file: String,
		/// Document being parsed.
		kind: DocumentKind,
		/// Position of the offending element.
		index: usize,
		/// Parser message.
		message: String,
	},
	/// Two nodes share the same id.
	#[error("error parsing nodes file {file}: duplicate node id \"{id}\"")]
	DuplicateNodeId {
		/// Uploaded file name.
		file: String,
		/// The repeated id.
		id: String,
	},
	/// The browser could not read the file.
	#[error("error reading {kind} file {file}")]
	Read {
		/// Uploaded file name.
		file: String,
		/// Document being read.
		kind: DocumentKind,
	},
}
