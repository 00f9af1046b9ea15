//! The interface controller.
//!
//! A session owns the base, the record shown in the interface file and the
//! flags that keep the watch loop sane.  Every change notification goes
//! through [`Session::handle_change`], one at a time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notekeeper_config::AppConfig;
use notekeeper_store::{
    NAME_FIELD, Note, RecordStore, TAGS_FIELD, TEXT_FIELD, merge_tags, merge_text, prettify_list,
};
use notekeeper_template::{FieldValue, Record, Schema};
use notekeeper_tree::{TreeError, TreeItem, TreeOptions, build_tree};
use tracing::{debug, info, warn};

use crate::command::{Command, command_line};
use crate::files::FileSystem;
use crate::messages;
use crate::templates::Templates;
use crate::view::render_tree;

pub const COMMAND_FIELD: &str = "command";
pub const TAGS_USED_FIELD: &str = "tags_used";

/// Text given to a note created from `add NAME TAGS` with no body.
const PLACEHOLDER_TEXT: &str = "...";

/// What the watch loop should do after a change was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceState {
    Ready,
    /// The file stopped matching the interface template.  The next broken
    /// save restores the last good rendering.
    Broken,
}

#[derive(Debug, Default)]
struct Outcome {
    message: Option<String>,
    rewrite: Option<&'static str>,
    exit: bool,
}

impl Outcome {
    fn silent() -> Self {
        Self::default()
    }

    fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::default()
        }
    }

    /// Replaces the typed command line with `command` so the next save runs it.
    fn rewrite(command: &'static str, text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            rewrite: Some(command),
            exit: false,
        }
    }

    fn exit() -> Self {
        Self {
            exit: true,
            ..Self::default()
        }
    }
}

pub struct Session<F: FileSystem> {
    files: F,
    config: AppConfig,
    templates: Templates,
    store: RecordStore,
    base_path: PathBuf,
    interface_path: PathBuf,
    interface: Record,
    state: InterfaceState,
    ignore_next: bool,
    backed_up: bool,
}

impl<F: FileSystem> Session<F> {
    /// Prepares the home directory, templates and base, then writes a fresh
    /// interface file.
    pub fn start(files: F, config: AppConfig) -> Result<Self> {
        let home = config.home_dir();
        files.create_dir_all(&home)?;

        let templates = Templates::load(&files, &config)?;
        let base_path = config.base_path();
        let store = load_store(&files, &base_path, &templates.base)?;
        let interface_path = config.interface_path();
        let interface = templates.interface.defaults();

        let mut session = Self {
            files,
            config,
            templates,
            store,
            base_path,
            interface_path,
            interface,
            state: InterfaceState::Ready,
            ignore_next: false,
            backed_up: false,
        };
        session.render()?;
        // Nothing is watching yet, so the startup write raises no event.
        session.ignore_next = false;

        info!(
            home = %home.display(),
            base = %session.base_path.display(),
            records = session.store.len(),
            "session started"
        );
        Ok(session)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn interface(&self) -> &Record {
        &self.interface
    }

    pub fn state(&self) -> InterfaceState {
        self.state
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn interface_path(&self) -> &Path {
        &self.interface_path
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    /// Whether the next change notification will be swallowed.
    pub fn is_ignoring_next(&self) -> bool {
        self.ignore_next
    }

    /// Writes the current interface record, refreshing the used-tags list.
    pub fn render(&mut self) -> Result<()> {
        let used = self.store.used_tags();
        if used.is_empty() {
            self.interface.remove(TAGS_USED_FIELD);
        } else {
            self.interface.set(TAGS_USED_FIELD, used);
        }

        let text = self.templates.interface.stringify(&self.interface);
        self.files
            .write(&self.interface_path, &text)
            .context("failed to render the interface")?;
        self.ignore_next = true;
        self.state = InterfaceState::Ready;
        debug!(path = %self.interface_path.display(), "interface rendered");
        Ok(())
    }

    /// Handles one change notification for the interface file.
    pub fn handle_change(&mut self) -> Result<Flow> {
        if std::mem::take(&mut self.ignore_next) {
            debug!("skipping change caused by our own write");
            return Ok(Flow::Continue);
        }

        let text = self.files.read(&self.interface_path)?;
        let mut records = self.templates.interface.parse(&text).into_vec();
        if records.is_empty() {
            self.interface_broken()?;
            return Ok(Flow::Continue);
        }
        if records.len() > 1 {
            warn!(
                records = records.len(),
                "interface holds several records; using the first"
            );
        }
        let record = records.swap_remove(0);
        self.apply(record)
    }

    fn interface_broken(&mut self) -> Result<()> {
        match self.state {
            InterfaceState::Ready => {
                warn!(
                    path = %self.interface_path.display(),
                    "interface does not match its template"
                );
                self.files
                    .append(&self.interface_path, messages::BROKEN_BANNER)?;
                self.ignore_next = true;
                self.state = InterfaceState::Broken;
            }
            InterfaceState::Broken => {
                warn!("interface still broken; restoring the last good state");
                self.render()?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, mut record: Record) -> Result<Flow> {
        let tags = prettify_list(&record.text(TAGS_FIELD));
        record.set(TAGS_FIELD, tags);
        self.interface = record;

        let field = self.interface.text(COMMAND_FIELD);
        let line = command_line(&field).to_string();
        let command = Command::parse(&line);
        info!(command = command.keyword(), line = %line, "executing command");

        let outcome = self.execute(command)?;
        if outcome.exit {
            info!("exit requested");
            return Ok(Flow::Exit);
        }

        let line = outcome.rewrite.map(str::to_string).unwrap_or(line);
        let field = match outcome.message {
            Some(message) => format!("{line}\n{message}"),
            None => line,
        };
        self.interface.set(COMMAND_FIELD, field);
        self.render()?;
        Ok(Flow::Continue)
    }

    fn execute(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Empty => Ok(Outcome::silent()),
            Command::Add { name, tags } => self.add(name, tags),
            Command::Edit { name } => self.edit(name),
            Command::Delete { name } => self.delete(name),
            Command::Mix => Ok(self.mix()),
            Command::Clear => {
                self.interface.set(NAME_FIELD, "");
                self.interface.set(TAGS_FIELD, Vec::<String>::new());
                self.interface.set(TEXT_FIELD, "");
                Ok(Outcome::silent())
            }
            Command::Tree { root } => Ok(self.tree(root.as_deref())),
            Command::Load { alias } => self.load(alias),
            Command::Exit => Ok(Outcome::exit()),
            Command::Unknown(token) => {
                warn!(token = %token, "unknown command");
                Ok(Outcome::message(messages::wrong_command(&token)))
            }
        }
    }

    // ── Handlers ──────────────────────────────────────────────────────────────

    fn add(&mut self, name: Option<String>, tags: Vec<String>) -> Result<Outcome> {
        let has_args = name.is_some() || !tags.is_empty();
        if let Some(name) = name {
            self.interface.set(NAME_FIELD, name);
        }
        if !tags.is_empty() {
            let merged = merge_tags(&self.interface_tags(), &tags);
            self.interface.set(TAGS_FIELD, merged);
        }

        let name = self.interface_name();
        if self.store.find(&name).is_some() {
            return Ok(Outcome::rewrite("mix", messages::exists_mix(&name)));
        }
        // Only a record that is about to be pushed gets the filler text.
        if has_args && self.interface_text().trim().is_empty() {
            self.interface.set(TEXT_FIELD, PLACEHOLDER_TEXT);
        }
        if self.interface_text().trim().is_empty() {
            return Ok(Outcome::message(messages::EMPTY_TEXT));
        }

        self.store.insert(self.interface_note());
        self.persist()?;
        if name.trim().is_empty() {
            Ok(Outcome::message(messages::NEW_UNNAMED))
        } else {
            Ok(Outcome::message(messages::new_named(&name)))
        }
    }

    /// Folds the stored record of the same name into the interface.  The
    /// base itself is untouched until `edit` runs.
    fn mix(&mut self) -> Outcome {
        let name = self.interface_name();
        let Some(stored) = self.store.find(&name).and_then(|i| self.store.get(i)) else {
            return Outcome::rewrite("add", messages::ADD_NEW);
        };

        let tags = merge_tags(&stored.tags, &self.interface_tags());
        let text = merge_text(&stored.text, &self.interface_text());
        self.interface.set(TAGS_FIELD, tags);
        self.interface.set(TEXT_FIELD, text);
        Outcome::rewrite("edit", messages::mixed(&name))
    }

    fn edit(&mut self, name: Option<String>) -> Result<Outcome> {
        if let Some(target) = name {
            let Some(stored) = self.store.find(&target).and_then(|i| self.store.get(i)) else {
                return Ok(Outcome::rewrite("add", messages::ADD_NEW));
            };
            let stored = stored.clone();
            self.show_note(&stored);
            return Ok(Outcome::rewrite(
                "edit",
                messages::ready_for_editing(stored.name.trim()),
            ));
        }

        let name = self.interface_name();
        let Some(index) = self.store.find(&name) else {
            return Ok(Outcome::rewrite("add", messages::ADD_NEW));
        };

        let mut note = self.interface_note();
        if let Some(old) = self.store.get(index) {
            for (field, value) in old.extra.iter() {
                if !note.extra.contains(field) {
                    note.extra.set(field, value.clone());
                }
            }
        }
        self.store.replace(index, note);
        self.persist()?;
        Ok(Outcome::message(messages::edited(&name)))
    }

    fn delete(&mut self, name: Option<String>) -> Result<Outcome> {
        let target = name.unwrap_or_else(|| self.interface_name());
        let Some(index) = self.store.find(&target) else {
            return Ok(Outcome::rewrite("add", messages::ADD_NEW));
        };

        self.store.delete(index);
        self.persist()?;
        Ok(Outcome::message(messages::deleted(target.trim())))
    }

    fn tree(&mut self, root: Option<&str>) -> Outcome {
        let notes: &[Note] = if self.store.is_placeholder() {
            &[]
        } else {
            self.store.records()
        };
        let items: Vec<TreeItem<'_>> = notes
            .iter()
            .map(|note| TreeItem {
                name: &note.name,
                tags: &note.tags,
                text: &note.text,
            })
            .collect();
        let options = TreeOptions {
            skip_empty_text: self.config.tree.skip_empty_text,
        };

        match build_tree(&items, root, &options) {
            Ok(nodes) if nodes.is_empty() => {
                self.interface.set(TEXT_FIELD, "");
                Outcome::message(messages::EMPTY_TREE)
            }
            Ok(nodes) => {
                let text = render_tree(&nodes, &self.templates.tree, &self.config.tree.indent);
                self.interface.set(TEXT_FIELD, text);
                Outcome::message(messages::tree_shown(nodes.len()))
            }
            Err(TreeError::Circular {
                victim,
                victim_name,
                offending_parent,
            }) => {
                let victim = notes[victim].clone();
                self.show_note(&victim);
                Outcome::rewrite("edit", messages::circular(&victim_name, &offending_parent))
            }
            Err(TreeError::NoRoot) => Outcome::message(messages::NO_ROOT),
            Err(TreeError::UnknownRoot(name)) => Outcome::message(messages::unknown_root(&name)),
        }
    }

    fn load(&mut self, alias: Option<String>) -> Result<Outcome> {
        let (path, message) = match alias {
            None => (
                self.config.base_path(),
                messages::PRIMARY_LOADED.to_string(),
            ),
            Some(alias) => match self.config.find_base(&alias) {
                Some(base) => (self.config.resolve(&base.path), messages::base_loaded(&base.alias)),
                None => {
                    let known: Vec<&str> = self
                        .config
                        .bases
                        .iter()
                        .map(|base| base.alias.as_str())
                        .collect();
                    warn!(alias = %alias, "unknown base alias");
                    return Ok(Outcome::message(messages::unknown_base(&alias, &known)));
                }
            },
        };

        self.store = load_store(&self.files, &path, &self.templates.base)?;
        self.base_path = path;
        self.backed_up = false;
        info!(
            base = %self.base_path.display(),
            records = self.store.len(),
            "switched base"
        );
        Ok(Outcome::message(message))
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn interface_name(&self) -> String {
        self.interface.text(NAME_FIELD)
    }

    fn interface_text(&self) -> String {
        self.interface.text(TEXT_FIELD)
    }

    fn interface_tags(&self) -> Vec<String> {
        match self.interface.get(TAGS_FIELD) {
            Some(FieldValue::List(tags)) => tags.clone(),
            Some(FieldValue::Text(line)) => prettify_list(line),
            None => Vec::new(),
        }
    }

    /// The interface record restricted to the base template's fields.
    fn interface_note(&self) -> Note {
        Note::from_record(&self.templates.base.project(&self.interface))
    }

    fn show_note(&mut self, note: &Note) {
        self.interface.set(NAME_FIELD, note.name.as_str());
        self.interface.set(TAGS_FIELD, note.tags.clone());
        self.interface.set(TEXT_FIELD, note.text.as_str());
    }

    fn persist(&mut self) -> Result<()> {
        if !self.backed_up {
            self.files.backup(&self.base_path)?;
            self.backed_up = true;
        }
        let text = self.store.serialize();
        self.files
            .write(&self.base_path, &text)
            .with_context(|| format!("failed to write base {}", self.base_path.display()))?;
        info!(
            base = %self.base_path.display(),
            records = self.store.len(),
            "base written"
        );
        Ok(())
    }
}

fn load_store(files: &impl FileSystem, path: &Path, schema: &Schema) -> Result<RecordStore> {
    let (text, created) = files.read_or_create(path, "")?;
    if created {
        info!(path = %path.display(), "created empty base file");
    }
    Ok(RecordStore::load(schema.clone(), &text))
}
