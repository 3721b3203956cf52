//! Typed reading of editor attributes.
//!
//! Editors configure themselves from a property's attributes: numeric
//! bounds, option names, dialog settings. [`EditorHints`] reads them with
//! the same soft fallbacks as the display code, so a missing attribute or
//! one with the wrong shape yields the editor's default.

use crate::model::{names, AttributeStore, PropertyId, PropertyTree, PropertyValue};
use std::ops::RangeInclusive;
use std::path::{Component, Path, PathBuf};

/// Dialog shown by a file editor, from the `fileDialogType` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileDialogKind {
    #[default]
    Open,
    Save,
    Directory,
}

impl FileDialogKind {
    /// Unknown codes fall back to [`FileDialogKind::Open`].
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => FileDialogKind::Save,
            2 => FileDialogKind::Directory,
            _ => FileDialogKind::Open,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            FileDialogKind::Open => 0,
            FileDialogKind::Save => 1,
            FileDialogKind::Directory => 2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FileDialogKind::Open => "Open File",
            FileDialogKind::Save => "Save File",
            FileDialogKind::Directory => "Open Directory",
        }
    }
}

/// File dialog configuration of a file property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDialogSpec {
    pub kind: FileDialogKind,
    /// Name filter passed to the dialog, e.g. `"Images (*.png *.jpg)"`
    pub filter: String,
    /// Directory chosen paths are stored relative to
    pub relative_to: Option<PathBuf>,
}

impl FileDialogSpec {
    /// Path to store for a path picked in the dialog.
    pub fn resolve_selection(&self, selected: &Path) -> PathBuf {
        match &self.relative_to {
            Some(base) => relative_path(base, selected),
            None => selected.to_path_buf(),
        }
    }
}

/// `path` expressed relative to the directory `base`.
///
/// Returns `path` unchanged when the two cannot be related, e.g. one is
/// absolute and the other is not.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    if base.is_absolute() != path.is_absolute() {
        return path.to_path_buf();
    }

    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = path.components().filter(|c| *c != Component::CurDir).collect();

    // Different roots or drive prefixes
    if let (Some(Component::Prefix(a)), Some(Component::Prefix(b))) = (base.first(), target.first()) {
        if a != b {
            return path.to_path_buf();
        }
    }

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// Flag value with the bits at `indices` set. Indices past bit 63 are ignored.
pub fn flag_value_from_indices(indices: &[usize]) -> i64 {
    indices
        .iter()
        .filter(|i| **i < 64)
        .fold(0i64, |bits, i| bits | (1i64 << i))
}

/// Indices of the set bits of `value` among the first `count` flags.
pub fn flag_indices(value: i64, count: usize) -> Vec<usize> {
    (0..count.min(64))
        .filter(|i| value & (1i64 << i) != 0)
        .collect()
}

/// Editor-facing view over one property's attributes
#[derive(Debug, Clone, Copy)]
pub struct EditorHints<'a> {
    attributes: &'a AttributeStore,
}

impl<'a> EditorHints<'a> {
    pub fn new(attributes: &'a AttributeStore) -> Self {
        Self { attributes }
    }

    /// Bounds for integer editors.
    pub fn int_range(&self) -> RangeInclusive<i64> {
        let min = self.attributes.int_or(names::MIN_VALUE, i64::MIN);
        let max = self.attributes.int_or(names::MAX_VALUE, i64::MAX);
        min..=max
    }

    /// Bounds for float editors.
    pub fn float_range(&self) -> RangeInclusive<f64> {
        let min = self.attributes.float_or(names::MIN_VALUE, f64::MIN);
        let max = self.attributes.float_or(names::MAX_VALUE, f64::MAX);
        min..=max
    }

    /// Decimals for float editors, `default` when unset or negative.
    pub fn decimals(&self, default: u32) -> u32 {
        let decimals = self.attributes.int_or(names::DECIMALS, default as i64);
        u32::try_from(decimals).unwrap_or(default)
    }

    /// Only a boolean `readOnly` counts.
    pub fn read_only(&self) -> bool {
        self.attributes.bool_or(names::READ_ONLY, false)
    }

    pub fn enum_names(&self) -> Vec<String> {
        self.attributes.string_list(names::ENUM_NAMES)
    }

    /// Values paired with `enumNames` by an enum-pair property.
    pub fn enum_values(&self) -> &'a [PropertyValue] {
        self.attributes.list(names::ENUM_VALUES)
    }

    pub fn flag_names(&self) -> Vec<String> {
        self.attributes.string_list(names::FLAG_NAMES)
    }

    /// Element count of a float list, zero when unset.
    pub fn size(&self) -> usize {
        usize::try_from(self.attributes.int_or(names::SIZE, 0)).unwrap_or(0)
    }

    pub fn file_dialog(&self) -> FileDialogSpec {
        FileDialogSpec {
            kind: FileDialogKind::from_code(self.attributes.int_or(names::FILE_DIALOG_TYPE, 0)),
            filter: self
                .attributes
                .str(names::FILE_DIALOG_FILTER)
                .unwrap_or_default()
                .to_string(),
            relative_to: self
                .attributes
                .str(names::FILE_RELATIVE_PATH)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn clamp_int(&self, value: i64) -> i64 {
        let range = self.int_range();
        if range.start() > range.end() {
            return value;
        }
        value.clamp(*range.start(), *range.end())
    }
}

impl PropertyTree {
    pub fn editor_hints(&self, id: PropertyId) -> Option<EditorHints<'_>> {
        self.get(id).map(|node| EditorHints::new(node.attributes()))
    }

    /// Store a path picked in a file dialog, relativised per the property's
    /// `fileRelativePath`.
    pub fn select_file(&mut self, id: PropertyId, selected: &Path) {
        let Some(hints) = self.editor_hints(id) else {
            return;
        };
        let path = hints.file_dialog().resolve_selection(selected);
        tracing::debug!("File selected for {:?}: {:?}", id, path);
        self.set_value(id, path);
    }

    /// Set a flag property from the indices of its checked options.
    pub fn set_flag_indices(&mut self, id: PropertyId, indices: &[usize]) {
        self.set_value(id, flag_value_from_indices(indices));
    }
}
