//! File upload cards for the nodes and links documents.

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, HtmlInputElement};

use crate::error::{DocumentKind, IngestError};

/// An uploaded file's name and text contents.
pub type Upload = (String, String);

/// Upload card with a hidden `.json` file input.
///
/// `on_load` receives the file name and its text; `on_error` receives read
/// failures. Parsing is left to the caller.
#[component]
pub fn UploadCard(
	/// Which document this card accepts.
	kind: DocumentKind,
	/// Name of the last successfully loaded file.
	#[prop(into)]
	file_name: Signal<Option<String>>,
	/// Number of records currently loaded.
	#[prop(into)]
	loaded: Signal<usize>,
	/// Receives the file name and text of a read file.
	on_load: Callback<Upload>,
	/// Receives read failures.
	on_error: Callback<IngestError>,
) -> impl IntoView {
	let input_id = format!("{kind}-upload");
	let title = match kind {
		DocumentKind::Nodes => "Nodes Data",
		DocumentKind::Links => "Links Data",
	};

	let on_change = move |ev: web_sys::Event| {
		let input: HtmlInputElement = event_target(&ev);
		if let Some(file) = input.files().and_then(|files| files.get(0)) {
			read_file(file, kind, on_load, on_error);
		}
	};

	view! {
		<div class="card">
			<div class="card-header">
				<h3 class="card-title">{title}</h3>
				<p class="card-description">{format!("Upload {kind}.json file")}</p>
			</div>
			<div class="card-content">
				<label for=input_id.clone() class="upload-drop">
					<p>
						{move || {
							file_name
								.get()
								.unwrap_or_else(|| format!("Click to upload {kind}.json"))
						}}
					</p>
				</label>
				<input
					id=input_id
					type="file"
					accept=".json"
					style="display: none;"
					on:change=on_change
				/>
				<Show when=move || file_name.with(Option::is_some)>
					<p class="muted">{move || format!("✓ Loaded {} {}", loaded.get(), kind)}</p>
				</Show>
			</div>
		</div>
	}
}

/// Reads `file` as text via `FileReader`, reporting through the callbacks.
fn read_file(file: File, kind: DocumentKind, on_load: Callback<Upload>, on_error: Callback<IngestError>) {
	let name = file.name();
	let read_error = {
		let name = name.clone();
		move || IngestError::Read {
			file: name.clone(),
			kind,
		}
	};

	let reader = match FileReader::new() {
		Ok(reader) => reader,
		Err(_) => {
			on_error.run(read_error());
			return;
		}
	};

	let (reader_load, name_load, read_error_load) = (reader.clone(), name.clone(), read_error.clone());
	let onload = Closure::once_into_js(move || {
		match reader_load.result().ok().and_then(|value| value.as_string()) {
			Some(text) => on_load.run((name_load, text)),
			None => on_error.run(read_error_load()),
		}
	});
	reader.set_onload(Some(onload.unchecked_ref()));

	let read_error_cb = read_error.clone();
	let onerror = Closure::once_into_js(move || on_error.run(read_error_cb()));
	reader.set_onerror(Some(onerror.unchecked_ref()));

	if reader.read_as_text(&file).is_err() {
		warn!("upload: could not start reading {}", name);
		on_error.run(read_error());
	}
}
