//! Command implementations. Each returns the text to print.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::ValueEnum;
use console::Style;
use swatch::{validate, AttrKey, Attribute, Catalog, FileStorage, SnapshotStorage, ThemeEditor};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}

struct Styles {
    header: Style,
    key: Style,
    raw: Style,
    ok: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Style::new().bold(),
            key: Style::new().dim(),
            raw: Style::new().cyan(),
            ok: Style::new().green(),
            error: Style::new().red(),
        }
    }
}

/// Where the CLI reads its catalog and keeps its state.
pub struct Host {
    storage: FileStorage,
    catalog: Option<PathBuf>,
    styles: Styles,
}

impl Host {
    pub fn new(state: PathBuf, catalog: Option<PathBuf>) -> Self {
        Self {
            storage: FileStorage::new(state),
            catalog,
            styles: Styles::new(),
        }
    }

    fn editor(&self) -> anyhow::Result<ThemeEditor> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::builtin(),
        };
        debug!(state = %self.storage.path().display(), "loading theme");
        ThemeEditor::load(catalog, &self.storage)
            .with_context(|| format!("failed to load {}", self.storage.path().display()))
    }

    pub fn show(&self, only: Option<&str>) -> anyhow::Result<String> {
        let editor = self.editor()?;
        let store = editor.store();

        if let Some(id) = only {
            if store.group(id).is_none() {
                bail!("unknown group '{id}'");
            }
        }

        let mut out = String::new();
        for group in store.groups().iter().filter(|g| only.map_or(true, |id| g.id() == id)) {
            writeln!(
                out,
                "{} {}",
                self.styles.header.apply_to(group.title()),
                self.styles.key.apply_to(format!("({})", group.id()))
            )?;
            for (key, attribute) in store.group_attributes(group.id()) {
                writeln!(out, "{}", self.attribute_line(key, attribute))?;
            }
            writeln!(out)?;
        }
        Ok(out)
    }

    fn attribute_line(&self, key: &AttrKey, attribute: &Attribute) -> String {
        let mut line = format!(
            "  {:<34} {} {}",
            attribute.label(),
            self.styles.key.apply_to(format!("{:<28}", key.to_string())),
            attribute.resolved_value()
        );
        if attribute.raw_input() != attribute.resolved_value() {
            line.push_str(&format!("  {}", self.styles.raw.apply_to(attribute.raw_input())));
        }
        let style = attribute.style_value();
        if style != attribute.resolved_value() {
            line.push_str(&format!("  -> {style}"));
        }
        line
    }

    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let editor = self.editor()?;
        let key: AttrKey = key.parse()?;
        let view = editor.view(&key)?;

        let mut out = String::new();
        writeln!(out, "{}", self.styles.header.apply_to(view.key))?;
        writeln!(out, "  label:    {}", view.label)?;
        writeln!(out, "  type:     {}", view.attr_type)?;
        writeln!(out, "  raw:      {}", view.raw_input)?;
        writeln!(out, "  resolved: {}", view.resolved_value)?;
        writeln!(out, "  style:    {}", view.style)?;
        Ok(out)
    }

    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<String> {
        let mut editor = self.editor()?;
        let key: AttrKey = key.parse()?;

        let commit = editor.apply(&key, value)?;
        editor.save(&self.storage)?;

        let mut out = String::new();
        for updated in &commit.updated {
            let attribute = editor.store().get(updated)?;
            writeln!(
                out,
                "{} {}",
                self.styles.key.apply_to(format!("{:<28}", updated.to_string())),
                attribute.resolved_value()
            )?;
        }
        Ok(out)
    }

    pub fn check(&self, key: &str, value: &str) -> anyhow::Result<String> {
        let editor = self.editor()?;
        let key: AttrKey = key.parse()?;
        editor.store().get(&key)?;

        let errors = validate(value, &key);
        if errors.is_empty() {
            return Ok(format!("{}\n", self.styles.ok.apply_to("ok")));
        }

        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("{}", self.styles.error.apply_to(messages.join(" ")));
    }

    pub fn export(&self, format: ExportFormat) -> anyhow::Result<String> {
        let snapshot = self.editor()?.store().to_snapshot();
        let mut out = match format {
            ExportFormat::Json => snapshot.to_json()?,
            ExportFormat::Yaml => snapshot.to_yaml()?,
        };
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    pub fn reset(&self) -> anyhow::Result<String> {
        self.storage.clear()?;
        Ok(format!(
            "removed saved edits in {}\n",
            self.storage.path().display()
        ))
    }
}
