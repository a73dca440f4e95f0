//! Manifest XML output
//!
//! The document is written compactly: the XML declaration directly followed
//! by `<plugin>`, no indentation. Sections without content are left out.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{ManifestError, Result};
use crate::types::{PluginData, ResourceFile};

/// Serialise a manifest to a string
pub fn to_xml_string(data: &PluginData) -> Result<String> {
    let mut out = ManifestWriter::new();
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let attributes = &data.attributes;
    let version_long = attributes.version_long.to_string();
    let mut root = vec![
        ("name", attributes.name.as_str()),
        ("version_human", attributes.version_human.as_str()),
        ("version_long", version_long.as_str()),
    ];
    if let Some(website) = &attributes.website {
        root.push(("website", website.as_str()));
    }
    out.start("plugin", &root)?;

    out.section("hooks", &data.hooks, |out, hook| {
        out.cdata_element(
            "hook",
            &[
                ("type", hook.hook_type.as_str()),
                ("class", hook.class.as_str()),
                ("filename", hook.filename.as_str()),
            ],
            &hook.code,
        )
    })?;
    out.section("settings", &data.settings, |out, setting| {
        out.start("setting", &[])?;
        out.text_element("key", &[], &setting.key)?;
        out.text_element("default", &[], &setting.default)?;
        out.end("setting")
    })?;
    if let Some(code) = &data.uninstall {
        out.cdata_element("uninstall", &[], code)?;
    }
    if let Some(code) = &data.settings_code {
        out.cdata_element("settingsCode", &[], code)?;
    }
    out.section("tasks", &data.tasks, |out, task| {
        out.cdata_element(
            "task",
            &[("key", task.key.as_str()), ("frequency", task.frequency.as_str())],
            &task.code,
        )
    })?;
    out.section("widgets", &data.widgets, |out, widget| {
        let mut attrs = vec![("key", widget.key.as_str())];
        attrs.extend(
            widget
                .attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        out.cdata_element("widget", &attrs, &widget.code)
    })?;
    out.files("htmlFiles", "html", &data.html_files)?;
    out.files("cssFiles", "css", &data.css_files)?;
    out.files("jsFiles", "js", &data.js_files)?;
    out.files("resourcesFiles", "resources", &data.resource_files)?;
    out.section("lang", &data.lang, |out, word| {
        let js = if word.js { "1" } else { "0" };
        out.text_element("word", &[("key", word.key.as_str()), ("js", js)], &word.value)
    })?;
    out.section("versions", &data.versions, |out, version| {
        let long = version.long.to_string();
        let attrs = [("human", version.human.as_str()), ("long", long.as_str())];
        match &version.code {
            Some(code) => out.cdata_element("version", &attrs, code),
            None => out.empty("version", &attrs),
        }
    })?;

    out.end("plugin")?;
    out.finish()
}

/// Serialise a manifest and write it to `output_path`
pub fn write_to_path(data: &PluginData, output_path: &Path) -> Result<()> {
    debug!("Writing manifest to: {:?}", output_path);

    let xml = to_xml_string(data)?;
    fs::write(output_path, &xml).map_err(|source| ManifestError::Io {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Manifest written successfully to: {:?}", output_path);
    info!("Manifest size: {} bytes", xml.len());
    Ok(())
}

struct ManifestWriter {
    inner: Writer<Vec<u8>>,
}

impl ManifestWriter {
    fn new() -> Self {
        ManifestWriter {
            inner: Writer::new(Vec::new()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| ManifestError::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(tag(name, attrs)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(tag(name, attrs)))
    }

    fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        if !text.is_empty() {
            self.event(Event::Text(BytesText::new(text)))?;
        }
        self.end(name)
    }

    /// `]]>` cannot appear inside CDATA, so it is split across two sections
    fn cdata_element(&mut self, name: &str, attrs: &[(&str, &str)], code: &str) -> Result<()> {
        self.start(name, attrs)?;
        let pieces: Vec<&str> = code.split("]]>").collect();
        let last = pieces.len() - 1;
        for (i, piece) in pieces.iter().enumerate() {
            let opening = if i == 0 { "" } else { ">" };
            let closing = if i == last { "" } else { "]]" };
            let chunk = format!("{}{}{}", opening, piece, closing);
            self.event(Event::CData(BytesCData::new(chunk.as_str())))?;
        }
        self.end(name)
    }

    fn section<T>(
        &mut self,
        name: &str,
        items: &[T],
        mut write_item: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.start(name, &[])?;
        for item in items {
            write_item(self, item)?;
        }
        self.end(name)
    }

    fn files(&mut self, section: &str, element: &str, files: &[ResourceFile]) -> Result<()> {
        self.section(section, files, |out, file| {
            out.text_element(element, &[("filename", file.filename.as_str())], &file.contents)
        })
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(|e| ManifestError::Xml(e.to_string()))
    }
}

fn tag<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attrs {
        start.push_attribute((*key, *value));
    }
    start
}
