//! # propsheet-rs: Reflective Property Model
//!
//! A hierarchical, observable property model for building property-sheet
//! editors. Properties are typed, named nodes in a tree; containers derive
//! their values from their children and every change is announced
//! synchronously to subscribed observers.
//!
//! ## Architecture
//!
//! - **Model**: Property tree, typed leaves, containers, dynamic lists, the
//!   type factory and notification dispatch
//! - **Browser**: Headless row model of a tree view that follows the model
//! - **Editor hints**: Typed reading of editor attributes (bounds, options,
//!   file dialogs)
//! - **Config**: Display settings and type aliases loaded from TOML
//!
//! ## Configuration
//!
//! The model configuration is read from the platform config directory under
//! `dev.hxyulin.propsheet-rs`:
//!
//! - **Linux**: `~/.config/dev.hxyulin.propsheet-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.propsheet-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.propsheet-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use propsheet_rs::{property_type, PropertyTree, TreeBrowser};
//!
//! let mut tree = PropertyTree::new();
//! let root = tree.create(property_type::GROUP, "root");
//! let name = tree.create(property_type::STRING, "name");
//! tree.add_child(root, name);
//!
//! tree.observe(root, |_tree, _, event| {
//!     println!("{} on {:?}", event.name(), event.subject());
//! });
//! tree.set_child_value(root, "name", "Jack");
//!
//! let browser = TreeBrowser::new(&mut tree);
//! browser.attach(&mut tree, root);
//! println!("{}", browser.render_text());
//! ```

pub mod browser;
pub mod config;
pub mod editor_hints;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use browser::{BrowserRow, TreeBrowser};
pub use config::{DisplaySettings, ModelConfig};
pub use editor_hints::{EditorHints, FileDialogKind, FileDialogSpec};
pub use error::{PropsheetError, Result};
pub use model::{
    names, property_type, Color, PropertyEvent, PropertyFactory, PropertyId, PropertyObserver,
    PropertyTree, PropertyValue,
};
