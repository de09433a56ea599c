//! Prepares phpDocumentor input in the cache directory.
//!
//! - [`stage_template`] copies the bundled wiki template into
//!   `<cache>/template` and points the settings at it.
//! - [`synthesize_config`] fills the bundled `phpdoc.template.xml`, injects
//!   the list-valued settings and writes `<cache>/phpdoc-auto.xml`.
//!
//! Neither operation rolls back partial output; the cache directory is
//! disposable and rebuilt on the next run.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, error, info};
use walkdir::WalkDir;
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::SynthError;
use crate::resources::{Resources, TEMPLATE_DIR};
use crate::settings::Settings;

/// File name of the synthesized generator config inside the cache path.
pub const AUTO_CONFIG: &str = "phpdoc-auto.xml";

/// Copies the bundled template into `<cache>/template`, overwriting existing
/// files, and stores the destination in `settings.template`.
pub fn stage_template(resources: &Resources, settings: &mut Settings) -> Result<(), SynthError> {
    let source = resources.template_dir();
    if !source.exists() {
        return Err(SynthError::TemplateMissing(source));
    }
    if !source.is_dir() {
        return Err(SynthError::TemplateNotDirectory(source));
    }
    let has_entries = fs::read_dir(&source)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if !has_entries {
        return Err(SynthError::TemplateEmpty(source));
    }

    let destination = settings.cache_path.join(TEMPLATE_DIR);
    if !destination.exists() {
        fs::create_dir_all(&destination)
            .map_err(|_| SynthError::CreateTemplateDir(destination.clone()))?;
    }
    copy_tree(&source, &destination)?;

    info!(from = %source.display(), to = %destination.display(), "Staged phpDocumentor template");
    settings.template = Some(destination);
    Ok(())
}

fn copy_tree(source: &Path, destination: &Path) -> Result<(), SynthError> {
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| SynthError::Copy {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e.into(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);
        let copied = if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
        } else {
            fs::copy(entry.path(), &target).map(|_| ())
        };
        copied.map_err(|e| SynthError::Copy {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        debug!(file = %target.display(), "Copied template entry");
    }
    Ok(())
}

/// Builds `<cache>/phpdoc-auto.xml` from the bundled config template and
/// stores its path in `settings.phpdoc_config`.
pub fn synthesize_config(resources: &Resources, settings: &mut Settings) -> Result<(), SynthError> {
    let template_path = resources.config_template();
    let template = fs::read_to_string(&template_path).map_err(|e| {
        error!(error = ?e, path = %template_path.display(), "Cannot read phpdoc config template");
        SynthError::ConfigTemplateUnreadable(template_path.clone())
    })?;

    let xml = fill_placeholders(&template, settings);
    let mut root =
        Element::parse(xml.as_bytes()).map_err(|e| SynthError::MalformedDocument(e.to_string()))?;

    append_children(&mut root, "source", "path", &settings.source_paths);
    append_children(&mut root, "ignore-tags", "ignore-tag", &settings.ignore_tags);
    append_children(&mut root, "api", "visibility", &settings.visibilities);

    let target = settings.cache_path.join(AUTO_CONFIG);
    let file = File::create(&target).map_err(|_| SynthError::Write(target.clone()))?;
    root.write_with_config(BufWriter::new(file), EmitterConfig::new().perform_indent(true))
        .map_err(|e| {
            error!(error = ?e, path = %target.display(), "Cannot write phpdoc config");
            SynthError::Write(target.clone())
        })?;

    info!(path = %target.display(), "Synthesized phpDocumentor config");
    settings.phpdoc_config = Some(target);
    Ok(())
}

/// Replaces the five `{...}` tokens of the config template.
pub fn fill_placeholders(template: &str, settings: &Settings) -> String {
    let output = settings
        .wiki_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let template_dir = settings
        .template
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let replacements = [
        ("{title}", settings.title.clone()),
        ("{path.output}", output),
        ("{path.cache}", settings.cache_path.display().to_string()),
        ("{path.project}", settings.project_path.display().to_string()),
        ("{template}", template_dir),
    ];
    replacements
        .iter()
        .fold(template.to_string(), |xml, (token, value)| {
            xml.replace(token, &escape_xml(value))
        })
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Appends one `<child>value</child>` per value to the element named
/// `parent`, but only if exactly one such element exists.
fn append_children(root: &mut Element, parent: &str, child: &str, values: &[String]) {
    let matches = count_elements(root, parent);
    if matches != 1 {
        debug!(parent, matches, "Skipping child injection");
        return;
    }
    if let Some(parent_element) = find_element_mut(root, parent) {
        for value in values {
            let mut element = Element::new(child);
            element.children.push(XMLNode::Text(value.clone()));
            parent_element.children.push(XMLNode::Element(element));
        }
    }
}

fn count_elements(element: &Element, name: &str) -> usize {
    let own = usize::from(element.name == name);
    own + element
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .map(|child| count_elements(child, name))
        .sum::<usize>()
}

fn find_element_mut<'a>(element: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    if element.name == name {
        return Some(element);
    }
    for node in element.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            if let Some(found) = find_element_mut(child, name) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NullConfig;
    use crate::settings::Overrides;

    fn settings() -> Settings {
        Settings::materialize(&NullConfig, &Overrides::default())
    }

    #[test]
    fn placeholder_values_are_xml_escaped() {
        let mut s = settings();
        s.title = "Tom & Jerry <API>".into();
        let filled = fill_placeholders("<title>{title}</title>", &s);
        assert_eq!(filled, "<title>Tom &amp; Jerry &lt;API&gt;</title>");
    }

    #[test]
    fn injection_requires_a_unique_parent() {
        let mut root = Element::parse(
            "<root><source/><api/><api/></root>".as_bytes(),
        )
        .unwrap();
        append_children(&mut root, "source", "path", &["a".into(), "b".into()]);
        append_children(&mut root, "api", "visibility", &["public".into()]);
        append_children(&mut root, "ignore-tags", "ignore-tag", &["x".into()]);

        let source = root.get_child("source").unwrap();
        let paths: Vec<_> = source
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .map(|e| e.get_text().unwrap_or_default().into_owned())
            .collect();
        assert_eq!(paths, vec!["a", "b"]);
        assert_eq!(count_elements(&root, "visibility"), 0);
        assert_eq!(count_elements(&root, "ignore-tag"), 0);
    }
}
