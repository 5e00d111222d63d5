//! Parsing of uploaded node and link documents.

use std::collections::HashSet;

use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{GraphLink, GraphNode};
use crate::error::{DocumentKind, IngestError};

/// Parses a nodes document: a JSON array of node records with unique ids.
pub fn parse_nodes(file: &str, text: &str) -> Result<Vec<GraphNode>, IngestError> {
	let nodes: Vec<GraphNode> = parse_array(file, text, DocumentKind::Nodes)?;

	let mut seen = HashSet::with_capacity(nodes.len());
	for node in &nodes {
		if !seen.insert(node.id.as_str()) {
			return Err(IngestError::DuplicateNodeId {
				file: file.to_string(),
				id: node.id.clone(),
			});
		}
	}

	info!("ingest: loaded {} nodes from {}", nodes.len(), file);
	Ok(nodes)
}

/// Parses a links document: a JSON array of link records.
pub fn parse_links(file: &str, text: &str) -> Result<Vec<GraphLink>, IngestError> {
	let links: Vec<GraphLink> = parse_array(file, text, DocumentKind::Links)?;
	info!("ingest: loaded {} links from {}", links.len(), file);
	Ok(links)
}

fn parse_array<T: DeserializeOwned>(
	file: &str,
	text: &str,
	kind: DocumentKind,
) -> Result<Vec<T>, IngestError> {
	let value: Value = serde_json::from_str(text).map_err(|e| IngestError::Parse {
		file: file.to_string(),
		kind,
		message: e.to_string(),
	})?;

	let Value::Array(items) = value else {
		return Err(IngestError::Shape {
			file: file.to_string(),
			kind,
		});
	};

	items
		.into_iter()
		.enumerate()
		.map(|(index, item)| {
			serde_json::from_value(item).map_err(|e| IngestError::Record {
				file: file.to_string(),
				kind,
				index,
				message: e.to_string(),
			})
		})
		.collect()
}
